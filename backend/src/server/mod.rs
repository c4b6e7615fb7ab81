//! Server assembly: wires stores, services and HTTP state together.

pub mod config;

use std::sync::Arc;

use crate::domain::ports::{Clock, SystemClock};
use crate::domain::{RecordService, SessionService, StocktakingService, TokenSigner};
use crate::inbound::http::HttpState;
use crate::outbound::Argon2PasswordHasher;
use crate::outbound::persistence::MemoryStore;

pub use config::{AppConfig, ConfigError};

/// Build the HTTP state from configuration.
///
/// One [`MemoryStore`] backs every repository port so the snapshot
/// transaction sees users, records and master data under a single lock.
pub fn build_state(config: &AppConfig) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store = Arc::new(MemoryStore::new(clock.clone()));
    let hasher = Arc::new(Argon2PasswordHasher::default());

    let sessions = Arc::new(SessionService::new(
        store.clone(),
        hasher,
        clock.clone(),
        TokenSigner::new(config.access_secret.clone()),
        TokenSigner::new(config.refresh_secret.clone()),
    ));
    let stocktakings = Arc::new(StocktakingService::new(store.clone()));
    let records = Arc::new(RecordService::new(store.clone(), store.clone(), clock));

    HttpState {
        sessions,
        stocktakings,
        records,
        masters: store,
        records_api_key: config.records_api_key.clone(),
        cookie_secure: config.cookie_secure,
    }
}
