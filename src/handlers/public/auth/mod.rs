// handlers/public/auth/mod.rs - token acquisition endpoints

pub mod login; // POST /api/auth/login - authenticate and get JWT
pub mod register; // POST /api/auth/register - create new account

pub use login::login;
pub use register::register;
