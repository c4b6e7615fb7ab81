//! User account data model.
//!
//! The password digest never leaves this module through serialisation; only
//! explicit accessors expose it to the session service.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::Role;

/// Stable user identifier assigned by the credential store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored user account.
///
/// ## Invariants
/// - `name` is unique within the credential store.
/// - `password_digest` is an opaque PHC string produced by the configured
///   password hasher; it is never compared directly against secrets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: String,
    display_name: String,
    role: Role,
    password_digest: String,
}

impl User {
    /// Assemble a user from stored fields.
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        display_name: impl Into<String>,
        role: Role,
        password_digest: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            display_name: display_name.into(),
            role,
            password_digest: password_digest.into(),
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    /// Unique login name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Human readable name shown in token claims and listings.
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Opaque digest for password verification.
    pub fn password_digest(&self) -> &str {
        self.password_digest.as_str()
    }
}

/// Fields required to insert a user; the store assigns the identifier.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub display_name: String,
    pub role: Role,
    pub password_digest: String,
}
