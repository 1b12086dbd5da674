// handlers/mod.rs - two security tiers
//
// Public (no auth) → Protected (JWT auth)
pub mod public; // No authentication required (/api/auth/*)
pub mod protected; // JWT authentication required (/api/cliente, /api/logradouro)
