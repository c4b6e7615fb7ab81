//! Inventory stocktaking backend.
//!
//! The crate follows a ports-and-adapters layout:
//!
//! - [`domain`] holds entities, validation, services and the port traits.
//! - [`inbound`] adapts HTTP requests onto the domain.
//! - [`outbound`] implements the driven ports (storage, password hashing).
//! - [`server`] wires configuration, stores and services together.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
