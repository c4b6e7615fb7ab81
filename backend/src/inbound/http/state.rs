//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` so they depend on
//! domain services and ports only and stay testable without real I/O.

use std::sync::Arc;

use crate::domain::ports::MasterDataRepository;
use crate::domain::{RecordService, SessionService, StocktakingService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub sessions: Arc<SessionService>,
    pub stocktakings: Arc<StocktakingService>,
    pub records: Arc<RecordService>,
    pub masters: Arc<dyn MasterDataRepository>,
    /// Shared secret expected in `x-api-key` by the expiry feed.
    pub records_api_key: String,
    /// Whether issued cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
}
