pub mod cliente;
pub mod logradouro;
pub mod user;

pub use cliente::{Cliente, ClienteRow, NewCliente};
pub use logradouro::{Logradouro, NewLogradouro};
pub use user::{NewUser, User};
