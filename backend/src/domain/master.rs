//! Master data: storage locations, units and the item catalog.
//!
//! These are append-only reference rows. They carry no state machine; the
//! store only ever inserts and lists them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier for a catalog item ("bichikuhin").
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ItemId(pub i64);

/// Identifier for a storage location.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct LocationId(pub i64);

/// Identifier for a measurement unit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct UnitId(pub i64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Catalog entry describing a stockable item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// Unit pre-selected when entering new records for this item.
    pub default_unit: Option<UnitId>,
}

/// Physical place where stock is held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLocation {
    pub id: LocationId,
    pub name: String,
}

/// Measurement unit for record quantities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
}
