//! HTTP adapter: handlers, extractors and error mapping.
//!
//! All business routes live under `/api`; the health probes sit at the root
//! so load balancers can reach them without a session.

pub mod auth;
pub mod error;
pub mod health;
pub mod masters;
pub mod records;
pub mod sessions;
pub mod state;
pub mod stocktakings;
pub mod users;

use actix_web::web;

pub use self::auth::Authenticated;
pub use self::error::{ApiError, ApiResult};
pub use self::health::HealthState;
pub use self::state::HttpState;

/// Register every business route under `/api`.
///
/// `records::expired` must precede `records::list` so the literal
/// `/records/expired` segment wins over the `/records/{stocktakingId}`
/// capture.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(sessions::login)
            .service(sessions::refresh)
            .service(sessions::logout)
            .service(users::register)
            .service(users::current_user)
            .service(users::change_password)
            .service(users::force_set_password)
            .service(stocktakings::list)
            .service(stocktakings::create)
            .service(records::expired)
            .service(records::list)
            .service(records::upsert)
            .service(masters::list_items)
            .service(masters::create_item)
            .service(masters::list_masters)
            .service(masters::create_location)
            .service(masters::create_unit),
    );
}

/// Register the unauthenticated health probes.
pub fn configure_health(cfg: &mut web::ServiceConfig) {
    cfg.service(health::ready).service(health::live);
}

/// Serve the OpenAPI document as JSON; registered in debug builds only.
#[cfg(debug_assertions)]
pub fn configure_docs(cfg: &mut web::ServiceConfig) {
    use actix_web::HttpResponse;
    use utoipa::OpenApi as _;

    cfg.route(
        "/api-docs/openapi.json",
        web::get().to(|| async { HttpResponse::Ok().json(crate::doc::ApiDoc::openapi()) }),
    );
}
