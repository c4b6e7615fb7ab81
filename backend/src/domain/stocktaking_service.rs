//! Snapshot lifecycle controller.
//!
//! Validation lives here; the atomic deactivate/insert/clone transaction is
//! the snapshot store's contract (see
//! [`StocktakingRepository::create_active`]).

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;

use crate::domain::ports::StocktakingRepository;
use crate::domain::{Error, NewStocktaking, Stocktaking, StocktakingId};

/// Orchestrates stocktaking creation and reads.
pub struct StocktakingService {
    store: Arc<dyn StocktakingRepository>,
}

impl StocktakingService {
    pub fn new(store: Arc<dyn StocktakingRepository>) -> Self {
        Self { store }
    }

    /// Open a new active stocktaking, optionally seeding it with a copy of
    /// another snapshot's records.
    ///
    /// A `copy_from` that matches no snapshot yields an empty new snapshot,
    /// not an error.
    pub async fn create(
        &self,
        name: &str,
        date: NaiveDate,
        copy_from: Option<StocktakingId>,
    ) -> Result<Stocktaking, Error> {
        let draft = NewStocktaking::try_from_parts(name, date)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let created = self.store.create_active(draft, copy_from).await?;
        info!(
            id = %created.id,
            name = %created.name,
            copied_from = copy_from.map(|id| id.0),
            "stocktaking created and activated"
        );
        Ok(created)
    }

    /// All stocktakings, date descending.
    pub async fn list(&self) -> Result<Vec<Stocktaking>, Error> {
        Ok(self.store.list().await?)
    }

    /// The currently active stocktaking, if any.
    pub async fn active(&self) -> Result<Option<Stocktaking>, Error> {
        Ok(self.store.active().await?)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::StoreError;

    #[derive(Default)]
    struct StubStore {
        created: Mutex<Vec<(NewStocktaking, Option<StocktakingId>)>>,
        fail_with: Option<StoreError>,
    }

    #[async_trait]
    impl StocktakingRepository for StubStore {
        async fn list(&self) -> Result<Vec<Stocktaking>, StoreError> {
            Ok(Vec::new())
        }

        async fn active(&self) -> Result<Option<Stocktaking>, StoreError> {
            Ok(None)
        }

        async fn create_active(
            &self,
            draft: NewStocktaking,
            copy_from: Option<StocktakingId>,
        ) -> Result<Stocktaking, StoreError> {
            if let Some(err) = &self.fail_with {
                return Err(err.clone());
            }
            let stocktaking = Stocktaking {
                id: StocktakingId(1),
                name: draft.name().to_owned(),
                date: draft.date(),
                active: true,
            };
            self.created.lock().expect("lock").push((draft, copy_from));
            Ok(stocktaking)
        }
    }

    fn date(s: &str) -> NaiveDate {
        s.parse().expect("valid date literal")
    }

    #[tokio::test]
    async fn blank_name_never_reaches_the_store() {
        let store = Arc::new(StubStore::default());
        let service = StocktakingService::new(store.clone());
        let err = service
            .create("   ", date("2024-06-01"), None)
            .await
            .expect_err("blank name must fail");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert!(store.created.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn create_passes_copy_source_through() {
        let store = Arc::new(StubStore::default());
        let service = StocktakingService::new(store.clone());
        let created = service
            .create("Q2", date("2024-06-01"), Some(StocktakingId(7)))
            .await
            .expect("creates");
        assert!(created.active);
        let calls = store.created.lock().expect("lock");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, Some(StocktakingId(7)));
    }

    #[tokio::test]
    async fn rolled_back_transaction_surfaces_as_internal_error() {
        let store = Arc::new(StubStore {
            fail_with: Some(StoreError::Backend("transaction rolled back".into())),
            ..StubStore::default()
        });
        let service = StocktakingService::new(store);
        let err = service
            .create("Q2", date("2024-06-01"), None)
            .await
            .expect_err("backend failure must surface");
        assert_eq!(err.code(), ErrorCode::InternalError);
    }
}
