//! Driven port for the record ledger.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::ports::StoreError;
use crate::domain::{StockRecord, StockRecordDetail, StockRecordDraft, StocktakingId};

/// Access to stock records.
#[async_trait]
pub trait StockRecordRepository: Send + Sync {
    /// Insert or update a record. Every foreign reference must resolve at
    /// write time; a dangling one fails with [`StoreError::MissingRow`].
    async fn upsert(&self, draft: StockRecordDraft) -> Result<StockRecord, StoreError>;

    /// Records of one stocktaking joined with their item, unit and location
    /// names, ordered by creation timestamp descending.
    async fn list_detailed(
        &self,
        stocktaking_id: StocktakingId,
    ) -> Result<Vec<StockRecordDetail>, StoreError>;

    /// Records of one stocktaking whose expiry is set and strictly before
    /// `today`, ordered by expiry ascending.
    async fn list_expired(
        &self,
        stocktaking_id: StocktakingId,
        today: NaiveDate,
    ) -> Result<Vec<StockRecordDetail>, StoreError>;
}
