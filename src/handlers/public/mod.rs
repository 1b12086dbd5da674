// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Token acquisition and account registration. Every input is untrusted here,
// so handlers validate all fields themselves.

pub mod auth;
