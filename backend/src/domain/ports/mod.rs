//! Driven ports: the traits outbound adapters implement.
//!
//! Services depend on these traits only, never on a concrete store, so the
//! whole domain is testable against in-memory doubles and the storage engine
//! stays swappable.

mod clock;
mod master_repository;
mod password_hasher;
mod record_repository;
mod stocktaking_repository;
mod user_repository;

pub use clock::{Clock, FixedClock, SystemClock};
pub use master_repository::MasterDataRepository;
pub use password_hasher::PasswordHasher;
pub use record_repository::StockRecordRepository;
pub use stocktaking_repository::StocktakingRepository;
pub use user_repository::UserRepository;

use crate::domain::Error;

/// Failures surfaced by storage adapters.
///
/// Adapters classify their backend's failures here; services translate them
/// into domain errors without knowing which engine is behind the port.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The backend timed out or refused the connection.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    /// The backend failed mid-operation; any open transaction rolled back.
    #[error("storage failure: {0}")]
    Backend(String),
    /// A foreign reference or addressed row does not exist.
    #[error("missing row: {0}")]
    MissingRow(String),
    /// A uniqueness constraint was violated.
    #[error("duplicate: {0}")]
    Duplicate(String),
}

impl From<StoreError> for Error {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Unavailable(message) => Error::unavailable(message),
            StoreError::Backend(message) => Error::internal(message),
            StoreError::MissingRow(message) => Error::not_found(message),
            StoreError::Duplicate(message) => Error::conflict(message),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(StoreError::Unavailable("t".into()), ErrorCode::ServiceUnavailable)]
    #[case(StoreError::Backend("b".into()), ErrorCode::InternalError)]
    #[case(StoreError::MissingRow("m".into()), ErrorCode::NotFound)]
    #[case(StoreError::Duplicate("d".into()), ErrorCode::Conflict)]
    fn store_errors_map_to_domain_codes(#[case] input: StoreError, #[case] expected: ErrorCode) {
        let error: Error = input.into();
        assert_eq!(error.code(), expected);
    }
}
