//! Driven port for the snapshot store.

use async_trait::async_trait;

use crate::domain::ports::StoreError;
use crate::domain::{NewStocktaking, Stocktaking, StocktakingId};

/// Access to stocktaking snapshots and the single-active invariant.
#[async_trait]
pub trait StocktakingRepository: Send + Sync {
    /// All stocktakings ordered by date descending.
    async fn list(&self) -> Result<Vec<Stocktaking>, StoreError>;

    /// The currently active stocktaking, if one exists.
    async fn active(&self) -> Result<Option<Stocktaking>, StoreError>;

    /// Atomically deactivate every stocktaking, insert `draft` as the new
    /// active one, and — when `copy_from` is set — clone that snapshot's
    /// records into the new one with fresh identities and timestamps.
    ///
    /// The three steps commit together or not at all: no reader may observe
    /// zero active snapshots, two active snapshots, or a partially cloned
    /// ledger. A `copy_from` that matches no snapshot clones zero records
    /// and is not an error.
    async fn create_active(
        &self,
        draft: NewStocktaking,
        copy_from: Option<StocktakingId>,
    ) -> Result<Stocktaking, StoreError>;
}
