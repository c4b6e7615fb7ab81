//! Master data endpoints: the item catalog, storage locations and units.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::auth::Authenticated;
use super::error::ApiResult;
use super::state::HttpState;
use crate::domain::{Error, Item, StorageLocation, Unit, UnitId};

/// Optional substring filter for the catalog listing.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ItemQuery {
    pub q: Option<String>,
}

/// Payload for registering a catalog item.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateItemRequest {
    pub name: String,
    pub default_unit_id: Option<i64>,
}

/// Payload for registering a location or unit.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateNamedRequest {
    pub name: String,
}

/// One catalog item.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: i64,
    pub name: String,
    pub default_unit_id: Option<i64>,
}

impl From<&Item> for ItemResponse {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.0,
            name: item.name.clone(),
            default_unit_id: item.default_unit.map(|unit| unit.0),
        }
    }
}

/// One storage location.
#[derive(Debug, Serialize, ToSchema)]
pub struct LocationResponse {
    pub id: i64,
    pub name: String,
}

impl From<&StorageLocation> for LocationResponse {
    fn from(location: &StorageLocation) -> Self {
        Self {
            id: location.id.0,
            name: location.name.clone(),
        }
    }
}

/// One measurement unit.
#[derive(Debug, Serialize, ToSchema)]
pub struct UnitResponse {
    pub id: i64,
    pub name: String,
}

impl From<&Unit> for UnitResponse {
    fn from(unit: &Unit) -> Self {
        Self {
            id: unit.id.0,
            name: unit.name.clone(),
        }
    }
}

/// Locations and units bundled for form population.
#[derive(Debug, Serialize, ToSchema)]
pub struct MastersResponse {
    pub locations: Vec<LocationResponse>,
    pub units: Vec<UnitResponse>,
}

/// List catalog items, optionally filtered by name substring.
#[utoipa::path(
    get,
    path = "/api/bichikuhin",
    params(ItemQuery),
    responses((status = 200, description = "Catalog items", body = [ItemResponse])),
    security(("session_cookie" = [])),
    tag = "masters"
)]
#[get("/bichikuhin")]
pub async fn list_items(
    state: web::Data<HttpState>,
    _auth: Authenticated,
    query: web::Query<ItemQuery>,
) -> ApiResult<HttpResponse> {
    let items = state.masters.list_items(query.q.as_deref()).await?;
    let body: Vec<ItemResponse> = items.iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// Register a catalog item.
#[utoipa::path(
    post,
    path = "/api/bichikuhin",
    request_body = CreateItemRequest,
    responses(
        (status = 201, description = "Item registered", body = ItemResponse),
        (status = 404, description = "Default unit resolves to nothing"),
    ),
    security(("session_cookie" = [])),
    tag = "masters"
)]
#[post("/bichikuhin")]
pub async fn create_item(
    state: web::Data<HttpState>,
    _auth: Authenticated,
    payload: web::Json<CreateItemRequest>,
) -> ApiResult<HttpResponse> {
    let item = state
        .masters
        .create_item(payload.name.clone(), payload.default_unit_id.map(UnitId))
        .await
        .map_err(Error::from)?;
    Ok(HttpResponse::Created().json(ItemResponse::from(&item)))
}

/// Locations and units in one response.
#[utoipa::path(
    get,
    path = "/api/masters",
    responses((status = 200, description = "Locations and units", body = MastersResponse)),
    security(("session_cookie" = [])),
    tag = "masters"
)]
#[get("/masters")]
pub async fn list_masters(
    state: web::Data<HttpState>,
    _auth: Authenticated,
) -> ApiResult<HttpResponse> {
    let locations = state.masters.list_locations().await.map_err(Error::from)?;
    let units = state.masters.list_units().await.map_err(Error::from)?;
    Ok(HttpResponse::Ok().json(MastersResponse {
        locations: locations.iter().map(Into::into).collect(),
        units: units.iter().map(Into::into).collect(),
    }))
}

/// Register a storage location.
#[utoipa::path(
    post,
    path = "/api/masters/locations",
    request_body = CreateNamedRequest,
    responses((status = 201, description = "Location registered", body = LocationResponse)),
    security(("session_cookie" = [])),
    tag = "masters"
)]
#[post("/masters/locations")]
pub async fn create_location(
    state: web::Data<HttpState>,
    _auth: Authenticated,
    payload: web::Json<CreateNamedRequest>,
) -> ApiResult<HttpResponse> {
    let location = state
        .masters
        .create_location(payload.name.clone())
        .await
        .map_err(Error::from)?;
    Ok(HttpResponse::Created().json(LocationResponse::from(&location)))
}

/// Register a measurement unit.
#[utoipa::path(
    post,
    path = "/api/masters/units",
    request_body = CreateNamedRequest,
    responses((status = 201, description = "Unit registered", body = UnitResponse)),
    security(("session_cookie" = [])),
    tag = "masters"
)]
#[post("/masters/units")]
pub async fn create_unit(
    state: web::Data<HttpState>,
    _auth: Authenticated,
    payload: web::Json<CreateNamedRequest>,
) -> ApiResult<HttpResponse> {
    let unit = state
        .masters
        .create_unit(payload.name.clone())
        .await
        .map_err(Error::from)?;
    Ok(HttpResponse::Created().json(UnitResponse::from(&unit)))
}
