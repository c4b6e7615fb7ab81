//! In-memory transactional store backing every repository port.
//!
//! One `RwLock` guards the whole dataset. Writers stage multi-step mutations
//! on a copy of the state and swap it in under the write lock, so readers
//! only ever observe fully committed states: never zero or two active
//! stocktakings, never a partially cloned ledger.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::domain::ports::{
    Clock, MasterDataRepository, StockRecordRepository, StocktakingRepository, StoreError,
    UserRepository,
};
use crate::domain::{
    Item, ItemId, LocationId, NewStocktaking, NewUser, RecordId, StockRecord, StockRecordDetail,
    StockRecordDraft, Stocktaking, StocktakingId, StorageLocation, Unit, UnitId, User, UserId,
};

#[derive(Debug, Default, Clone)]
struct Sequences {
    users: i64,
    items: i64,
    locations: i64,
    units: i64,
    stocktakings: i64,
    records: i64,
}

#[derive(Debug, Default, Clone)]
struct State {
    users: Vec<User>,
    items: Vec<Item>,
    locations: Vec<StorageLocation>,
    units: Vec<Unit>,
    stocktakings: Vec<Stocktaking>,
    records: Vec<StockRecord>,
    sequences: Sequences,
}

impl State {
    fn detail(&self, record: &StockRecord) -> Result<StockRecordDetail, StoreError> {
        let item = self
            .items
            .iter()
            .find(|i| i.id == record.item_id)
            .ok_or_else(|| dangling("item", record.id))?;
        let location = self
            .locations
            .iter()
            .find(|l| l.id == record.location_id)
            .ok_or_else(|| dangling("location", record.id))?;
        let unit = self
            .units
            .iter()
            .find(|u| u.id == record.unit_id)
            .ok_or_else(|| dangling("unit", record.id))?;
        Ok(StockRecordDetail {
            record: record.clone(),
            item_name: item.name.clone(),
            location_name: location.name.clone(),
            unit_name: unit.name.clone(),
        })
    }

    /// Referential invariant: every draft reference must resolve at write
    /// time.
    fn check_references(&self, draft: &StockRecordDraft) -> Result<(), StoreError> {
        if !self.items.iter().any(|i| i.id == draft.item_id) {
            return Err(StoreError::MissingRow(format!("item {}", draft.item_id)));
        }
        if !self.locations.iter().any(|l| l.id == draft.location_id) {
            return Err(StoreError::MissingRow(format!(
                "location {}",
                draft.location_id
            )));
        }
        if !self.units.iter().any(|u| u.id == draft.unit_id) {
            return Err(StoreError::MissingRow(format!("unit {}", draft.unit_id)));
        }
        if !self
            .stocktakings
            .iter()
            .any(|s| s.id == draft.stocktaking_id)
        {
            return Err(StoreError::MissingRow(format!(
                "stocktaking {}",
                draft.stocktaking_id
            )));
        }
        Ok(())
    }
}

fn dangling(kind: &str, record: RecordId) -> StoreError {
    StoreError::Backend(format!("record {record} holds a dangling {kind} reference"))
}

/// Process-local store implementing every repository port.
pub struct MemoryStore {
    clock: Arc<dyn Clock>,
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: RwLock::new(State::default()),
        }
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_name(&self, name: &str) -> Result<Option<User>, StoreError> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.name() == name).cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let state = self.state.read().await;
        Ok(state.users.iter().find(|u| u.id() == id).cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, StoreError> {
        let mut state = self.state.write().await;
        if state.users.iter().any(|u| u.name() == user.name) {
            return Err(StoreError::Duplicate(format!(
                "user name {:?} already taken",
                user.name
            )));
        }
        state.sequences.users += 1;
        let created = User::new(
            UserId(state.sequences.users),
            user.name,
            user.display_name,
            user.role,
            user.password_digest,
        );
        state.users.push(created.clone());
        Ok(created)
    }

    async fn set_password_digest(&self, id: UserId, digest: String) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let Some(position) = state.users.iter().position(|u| u.id() == id) else {
            return Err(StoreError::MissingRow(format!("user {id}")));
        };
        let old = state.users[position].clone();
        state.users[position] = User::new(
            old.id(),
            old.name(),
            old.display_name(),
            old.role(),
            digest,
        );
        Ok(())
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let state = self.state.read().await;
        Ok(state.users.len() as u64)
    }
}

#[async_trait]
impl StocktakingRepository for MemoryStore {
    async fn list(&self) -> Result<Vec<Stocktaking>, StoreError> {
        let state = self.state.read().await;
        let mut rows = state.stocktakings.clone();
        rows.sort_by(|a, b| b.date.cmp(&a.date).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn active(&self) -> Result<Option<Stocktaking>, StoreError> {
        let state = self.state.read().await;
        Ok(state.stocktakings.iter().find(|s| s.active).cloned())
    }

    async fn create_active(
        &self,
        draft: NewStocktaking,
        copy_from: Option<StocktakingId>,
    ) -> Result<Stocktaking, StoreError> {
        let mut guard = self.state.write().await;
        // Stage the whole transaction on a copy and swap it in at the end;
        // nothing half-done can become visible.
        let mut staged = guard.clone();

        // Deactivating everything unconditionally is idempotent whether one
        // or zero snapshots were active before.
        for stocktaking in &mut staged.stocktakings {
            stocktaking.active = false;
        }

        staged.sequences.stocktakings += 1;
        let created = Stocktaking {
            id: StocktakingId(staged.sequences.stocktakings),
            name: draft.name().to_owned(),
            date: draft.date(),
            active: true,
        };
        staged.stocktakings.push(created.clone());

        if let Some(source) = copy_from {
            // A source that matches nothing copies zero records by design.
            let now = self.clock.now();
            let sources: Vec<StockRecord> = staged
                .records
                .iter()
                .filter(|r| r.stocktaking_id == source)
                .cloned()
                .collect();
            for original in sources {
                staged.sequences.records += 1;
                staged.records.push(StockRecord {
                    id: RecordId(staged.sequences.records),
                    stocktaking_id: created.id,
                    created_at: now,
                    ..original
                });
            }
        }

        *guard = staged;
        Ok(created)
    }
}

#[async_trait]
impl StockRecordRepository for MemoryStore {
    async fn upsert(&self, draft: StockRecordDraft) -> Result<StockRecord, StoreError> {
        let mut state = self.state.write().await;
        state.check_references(&draft)?;

        match draft.id {
            Some(id) => {
                let Some(position) = state.records.iter().position(|r| r.id == id) else {
                    return Err(StoreError::MissingRow(format!("stock record {id}")));
                };
                let existing = &state.records[position];
                let updated = StockRecord {
                    id,
                    item_id: draft.item_id,
                    location_id: draft.location_id,
                    unit_id: draft.unit_id,
                    stocktaking_id: draft.stocktaking_id,
                    quantity: draft.quantity,
                    expiry: draft.expiry,
                    created_at: existing.created_at,
                };
                state.records[position] = updated.clone();
                Ok(updated)
            }
            None => {
                state.sequences.records += 1;
                let created = StockRecord {
                    id: RecordId(state.sequences.records),
                    item_id: draft.item_id,
                    location_id: draft.location_id,
                    unit_id: draft.unit_id,
                    stocktaking_id: draft.stocktaking_id,
                    quantity: draft.quantity,
                    expiry: draft.expiry,
                    created_at: self.clock.now(),
                };
                state.records.push(created.clone());
                Ok(created)
            }
        }
    }

    async fn list_detailed(
        &self,
        stocktaking_id: StocktakingId,
    ) -> Result<Vec<StockRecordDetail>, StoreError> {
        let state = self.state.read().await;
        let mut rows: Vec<StockRecordDetail> = state
            .records
            .iter()
            .filter(|r| r.stocktaking_id == stocktaking_id)
            .map(|r| state.detail(r))
            .collect::<Result<_, _>>()?;
        rows.sort_by(|a, b| {
            b.record
                .created_at
                .cmp(&a.record.created_at)
                .then(b.record.id.cmp(&a.record.id))
        });
        Ok(rows)
    }

    async fn list_expired(
        &self,
        stocktaking_id: StocktakingId,
        today: NaiveDate,
    ) -> Result<Vec<StockRecordDetail>, StoreError> {
        let state = self.state.read().await;
        let mut rows: Vec<StockRecordDetail> = state
            .records
            .iter()
            .filter(|r| r.stocktaking_id == stocktaking_id)
            .filter(|r| r.expiry.is_some_and(|expiry| expiry < today))
            .map(|r| state.detail(r))
            .collect::<Result<_, _>>()?;
        rows.sort_by(|a, b| {
            a.record
                .expiry
                .cmp(&b.record.expiry)
                .then(a.record.id.cmp(&b.record.id))
        });
        Ok(rows)
    }
}

#[async_trait]
impl MasterDataRepository for MemoryStore {
    async fn list_items(&self, name_filter: Option<&str>) -> Result<Vec<Item>, StoreError> {
        let state = self.state.read().await;
        Ok(state
            .items
            .iter()
            .filter(|item| name_filter.is_none_or(|needle| item.name.contains(needle)))
            .cloned()
            .collect())
    }

    async fn create_item(
        &self,
        name: String,
        default_unit: Option<UnitId>,
    ) -> Result<Item, StoreError> {
        let mut state = self.state.write().await;
        if let Some(unit) = default_unit {
            if !state.units.iter().any(|u| u.id == unit) {
                return Err(StoreError::MissingRow(format!("unit {unit}")));
            }
        }
        state.sequences.items += 1;
        let created = Item {
            id: ItemId(state.sequences.items),
            name,
            default_unit,
        };
        state.items.push(created.clone());
        Ok(created)
    }

    async fn list_locations(&self) -> Result<Vec<StorageLocation>, StoreError> {
        let state = self.state.read().await;
        Ok(state.locations.clone())
    }

    async fn create_location(&self, name: String) -> Result<StorageLocation, StoreError> {
        let mut state = self.state.write().await;
        state.sequences.locations += 1;
        let created = StorageLocation {
            id: LocationId(state.sequences.locations),
            name,
        };
        state.locations.push(created.clone());
        Ok(created)
    }

    async fn list_units(&self) -> Result<Vec<Unit>, StoreError> {
        let state = self.state.read().await;
        Ok(state.units.clone())
    }

    async fn create_unit(&self, name: String) -> Result<Unit, StoreError> {
        let mut state = self.state.write().await;
        state.sequences.units += 1;
        let created = Unit {
            id: UnitId(state.sequences.units),
            name,
        };
        state.units.push(created.clone());
        Ok(created)
    }
}
