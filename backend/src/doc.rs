//! OpenAPI document assembled from the handler annotations.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::{auth, health, masters, records, sessions, stocktakings, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stockbook API",
        description = "Inventory stocktaking backend: snapshot lifecycle, \
                       stock record ledger and signed-session authentication."
    ),
    paths(
        sessions::login,
        sessions::refresh,
        sessions::logout,
        users::register,
        users::current_user,
        users::change_password,
        users::force_set_password,
        stocktakings::list,
        stocktakings::create,
        records::expired,
        records::list,
        records::upsert,
        masters::list_items,
        masters::create_item,
        masters::list_masters,
        masters::create_location,
        masters::create_unit,
        health::ready,
        health::live,
    ),
    components(schemas(
        crate::domain::Error,
        crate::domain::ErrorCode,
        sessions::LoginRequest,
        sessions::Acknowledged,
        users::RegisterRequest,
        users::ChangePasswordRequest,
        users::SetPasswordRequest,
        users::UserResponse,
        users::RegisterResponse,
        users::CurrentUserResponse,
        stocktakings::CreateStocktakingRequest,
        stocktakings::StocktakingResponse,
        records::RecordRequest,
        records::RecordResponse,
        records::RecordWriteResponse,
        masters::CreateItemRequest,
        masters::CreateNamedRequest,
        masters::ItemResponse,
        masters::LocationResponse,
        masters::UnitResponse,
        masters::MastersResponse,
    )),
    modifiers(&SecuritySchemes),
    tags(
        (name = "sessions", description = "Login, refresh and logout"),
        (name = "users", description = "Accounts and passwords"),
        (name = "stocktakings", description = "Snapshot lifecycle"),
        (name = "records", description = "Stock record ledger"),
        (name = "masters", description = "Master data"),
        (name = "health", description = "Probes"),
    )
)]
pub struct ApiDoc;

/// Registers the cookie and api-key security schemes referenced by handlers.
struct SecuritySchemes;

impl Modify for SecuritySchemes {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(auth::ACCESS_COOKIE))),
        );
        components.add_security_scheme(
            "api_key",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(records::API_KEY_HEADER))),
        );
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use utoipa::OpenApi;

    use super::ApiDoc;

    #[test]
    fn document_serialises_and_names_all_routes() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().expect("document serialises");
        for path in [
            "/api/login",
            "/api/refresh",
            "/api/logout",
            "/api/register",
            "/api/user",
            "/api/change_password",
            "/api/users/{id}/password",
            "/api/stocktakings",
            "/api/records/expired",
            "/api/records/{stocktakingId}",
            "/api/records",
            "/api/bichikuhin",
            "/api/masters",
            "/api/masters/locations",
            "/api/masters/units",
            "/health/ready",
            "/health/live",
        ] {
            assert!(json.contains(path), "missing path: {path}");
        }
    }
}
