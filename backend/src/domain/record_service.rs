//! Record ledger use-cases: upserts, listings and the expiry feed.

use std::sync::Arc;

use crate::domain::ports::{Clock, StockRecordRepository, StocktakingRepository};
use crate::domain::{Error, StockRecord, StockRecordDetail, StockRecordDraft, StocktakingId};

/// Orchestrates stock record reads and writes.
pub struct RecordService {
    records: Arc<dyn StockRecordRepository>,
    stocktakings: Arc<dyn StocktakingRepository>,
    clock: Arc<dyn Clock>,
}

impl RecordService {
    pub fn new(
        records: Arc<dyn StockRecordRepository>,
        stocktakings: Arc<dyn StocktakingRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            records,
            stocktakings,
            clock,
        }
    }

    /// Insert or update a record. The store enforces that every reference
    /// resolves; dangling references surface as not-found.
    pub async fn upsert(&self, draft: StockRecordDraft) -> Result<StockRecord, Error> {
        Ok(self.records.upsert(draft).await?)
    }

    /// Records of one stocktaking with joined names, newest first.
    pub async fn list(&self, stocktaking_id: StocktakingId) -> Result<Vec<StockRecordDetail>, Error> {
        Ok(self.records.list_detailed(stocktaking_id).await?)
    }

    /// Expired records of the currently active stocktaking, soonest-expired
    /// first. With no active stocktaking the feed is empty rather than an
    /// error, since the poller consuming it cannot act on a 404.
    pub async fn expired_in_active(&self) -> Result<Vec<StockRecordDetail>, Error> {
        let Some(active) = self.stocktakings.active().await? else {
            return Ok(Vec::new());
        };
        let today = self.clock.now().date_naive();
        Ok(self.records.list_expired(active.id, today).await?)
    }
}
