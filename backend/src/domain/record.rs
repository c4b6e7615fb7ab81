//! Stock records: the ledger rows owned by stocktaking snapshots.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::master::{ItemId, LocationId, UnitId};
use crate::domain::stocktaking::StocktakingId;

/// Stable record identifier assigned by the ledger store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single stock record.
///
/// ## Invariants
/// - Every reference resolves to an existing row at write time.
/// - `created_at` is assigned once on insert (or on clone during snapshot
///   creation) and never updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockRecord {
    pub id: RecordId,
    pub item_id: ItemId,
    pub location_id: LocationId,
    pub unit_id: UnitId,
    pub stocktaking_id: StocktakingId,
    pub quantity: u32,
    pub expiry: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Upsert payload for the ledger.
///
/// With `id` set the existing record's mutable fields are updated in place;
/// without it a new record is inserted. The stocktaking reference is part of
/// the mutable field set, so an update may move a record between snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockRecordDraft {
    pub id: Option<RecordId>,
    pub item_id: ItemId,
    pub location_id: LocationId,
    pub unit_id: UnitId,
    pub stocktaking_id: StocktakingId,
    pub quantity: u32,
    pub expiry: Option<NaiveDate>,
}

/// A stock record joined with the display names of its references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockRecordDetail {
    pub record: StockRecord,
    pub item_name: String,
    pub location_name: String,
    pub unit_name: String,
}
