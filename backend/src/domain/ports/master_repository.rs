//! Driven port for master data: items, locations, units.

use async_trait::async_trait;

use crate::domain::ports::StoreError;
use crate::domain::{Item, StorageLocation, Unit, UnitId};

/// Append-only registration and listing of master rows.
#[async_trait]
pub trait MasterDataRepository: Send + Sync {
    /// Catalog items, optionally filtered by a name substring.
    async fn list_items(&self, name_filter: Option<&str>) -> Result<Vec<Item>, StoreError>;

    /// Register a catalog item. A `default_unit` must resolve to an
    /// existing unit.
    async fn create_item(
        &self,
        name: String,
        default_unit: Option<UnitId>,
    ) -> Result<Item, StoreError>;

    async fn list_locations(&self) -> Result<Vec<StorageLocation>, StoreError>;

    async fn create_location(&self, name: String) -> Result<StorageLocation, StoreError>;

    async fn list_units(&self) -> Result<Vec<Unit>, StoreError>;

    async fn create_unit(&self, name: String) -> Result<Unit, StoreError>;
}
