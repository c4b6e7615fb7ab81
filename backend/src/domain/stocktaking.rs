//! Stocktaking snapshots: named, dated inventory counts.
//!
//! Exactly one stocktaking is active at any committed instant. The `active`
//! flag is the only mutable field and it is only ever flipped inside the
//! atomic create-new-snapshot transaction.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stable stocktaking identifier assigned by the snapshot store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct StocktakingId(pub i64);

impl fmt::Display for StocktakingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A committed stocktaking snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stocktaking {
    pub id: StocktakingId,
    pub name: String,
    pub date: NaiveDate,
    pub active: bool,
}

/// Validation failures raised when preparing a new stocktaking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StocktakingValidationError {
    /// Name was missing or blank once trimmed.
    EmptyName,
}

impl fmt::Display for StocktakingValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "stocktaking name must not be empty"),
        }
    }
}

impl std::error::Error for StocktakingValidationError {}

/// Validated fields for a stocktaking about to be created.
///
/// The identifier and the `active` flag are assigned by the snapshot store
/// inside the creation transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStocktaking {
    name: String,
    date: NaiveDate,
}

impl NewStocktaking {
    /// Validate the display name and capture the snapshot date.
    pub fn try_from_parts(name: &str, date: NaiveDate) -> Result<Self, StocktakingValidationError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(StocktakingValidationError::EmptyName);
        }
        Ok(Self {
            name: trimmed.to_owned(),
            date,
        })
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn date(s: &str) -> NaiveDate {
        s.parse().expect("valid date literal")
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_names_are_rejected(#[case] name: &str) {
        let err = NewStocktaking::try_from_parts(name, date("2024-06-01"))
            .expect_err("blank name must fail");
        assert_eq!(err, StocktakingValidationError::EmptyName);
    }

    #[test]
    fn name_is_trimmed() {
        let draft = NewStocktaking::try_from_parts("  Q2  ", date("2024-06-01"))
            .expect("valid draft");
        assert_eq!(draft.name(), "Q2");
        assert_eq!(draft.date(), date("2024-06-01"));
    }
}
