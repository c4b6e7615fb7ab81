//! Authentication primitives: login credentials and the closed role set.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::Error;

/// Access level attached to a user account.
///
/// Stored and serialised as a lowercase string but kept closed in the type
/// system so a typo in a role can never silently grant or deny access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Canonical lowercase name used in tokens and responses.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }

    /// Whether a holder of `self` satisfies a gate requiring `required`.
    ///
    /// Admins satisfy every gate; plain users only satisfy the user gate.
    pub fn satisfies(self, required: Role) -> bool {
        match (self, required) {
            (Self::Admin, _) | (Self::User, Self::User) => true,
            (Self::User, Self::Admin) => false,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Name was missing or blank once trimmed.
    EmptyName,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

impl From<CredentialsValidationError> for Error {
    fn from(value: CredentialsValidationError) -> Self {
        Error::invalid_request(value.to_string())
    }
}

/// Validated login credentials used by the session service.
///
/// ## Invariants
/// - `name` is trimmed and non-empty after trimming.
/// - `password` is non-empty but retains caller-provided whitespace to avoid
///   surprising credential comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    name: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw name/password inputs.
    pub fn try_from_parts(name: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let normalized = name.trim();
        if normalized.is_empty() {
            return Err(CredentialsValidationError::EmptyName);
        }
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            name: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Account name suitable for credential-store lookups.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", CredentialsValidationError::EmptyName)]
    #[case("   ", "pw", CredentialsValidationError::EmptyName)]
    #[case("admin", "", CredentialsValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] name: &str,
        #[case] password: &str,
        #[case] expected: CredentialsValidationError,
    ) {
        let err =
            LoginCredentials::try_from_parts(name, password).expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("  admin  ", "secret")]
    #[case("alice", "correct horse battery staple")]
    fn valid_credentials_trim_name(#[case] name: &str, #[case] password: &str) {
        let creds =
            LoginCredentials::try_from_parts(name, password).expect("valid inputs should succeed");
        assert_eq!(creds.name(), name.trim());
        assert_eq!(creds.password(), password);
    }

    #[rstest]
    #[case(Role::Admin, Role::Admin, true)]
    #[case(Role::Admin, Role::User, true)]
    #[case(Role::User, Role::User, true)]
    #[case(Role::User, Role::Admin, false)]
    fn role_gates(#[case] held: Role, #[case] required: Role, #[case] expected: bool) {
        assert_eq!(held.satisfies(required), expected);
    }

    #[test]
    fn roles_serialise_lowercase() {
        assert_eq!(
            serde_json::to_value(Role::Admin).expect("serialises"),
            serde_json::json!("admin")
        );
    }
}
