//! Domain entities, validation and services.
//!
//! Types here are transport and storage agnostic. Inbound adapters map them
//! to HTTP payloads; outbound adapters persist them behind the port traits
//! in [`ports`].

pub mod auth;
pub mod error;
pub mod master;
pub mod ports;
pub mod record;
pub mod record_service;
pub mod session_service;
pub mod stocktaking;
pub mod stocktaking_service;
pub mod token;
pub mod user;

pub use self::auth::{CredentialsValidationError, LoginCredentials, Role};
pub use self::error::{Error, ErrorCode};
pub use self::master::{Item, ItemId, LocationId, StorageLocation, Unit, UnitId};
pub use self::record::{RecordId, StockRecord, StockRecordDetail, StockRecordDraft};
pub use self::record_service::RecordService;
pub use self::session_service::{
    DEFAULT_ADMIN_NAME, DEFAULT_ADMIN_PASSWORD, SessionService, TokenPair,
};
pub use self::stocktaking::{
    NewStocktaking, Stocktaking, StocktakingId, StocktakingValidationError,
};
pub use self::stocktaking_service::StocktakingService;
pub use self::token::{AccessClaims, RefreshClaims, TokenSigner};
pub use self::user::{NewUser, User, UserId};
