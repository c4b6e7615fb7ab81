//! Outbound adapters implementing the domain's driven ports.

mod argon2_hasher;
pub mod persistence;

pub use argon2_hasher::Argon2PasswordHasher;
