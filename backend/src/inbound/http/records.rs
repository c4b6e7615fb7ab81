//! Stock record endpoints: the ledger read/write surface and the expiry
//! feed consumed by the notification poller.

use actix_web::{HttpRequest, HttpResponse, get, route, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use utoipa::ToSchema;

use super::auth::Authenticated;
use super::error::ApiResult;
use super::state::HttpState;
use crate::domain::{
    Error, ItemId, LocationId, RecordId, StockRecordDetail, StockRecordDraft, StocktakingId,
    UnitId,
};

/// Header carrying the shared secret for the expiry feed.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Upsert payload for `/api/records`.
///
/// With `id` present the matching record is updated in place; without it a
/// new record is inserted. `unitId` may be omitted when the item carries a
/// default unit.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordRequest {
    pub id: Option<i64>,
    pub bichikuhin_id: i64,
    pub location_id: i64,
    pub unit_id: Option<i64>,
    pub quantity: u32,
    pub expiry_date: Option<NaiveDate>,
    pub stocktaking_id: i64,
}

/// One ledger row with its reference names joined in.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordResponse {
    pub id: i64,
    pub bichikuhin_id: i64,
    pub bichikuhin_name: String,
    pub location_id: i64,
    pub location_name: String,
    pub unit_id: i64,
    pub unit_name: String,
    pub quantity: u32,
    pub expiry_date: Option<NaiveDate>,
    pub stocktaking_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Write acknowledgement carrying the record as it now stands.
#[derive(Debug, Serialize, ToSchema)]
pub struct RecordWriteResponse {
    pub success: bool,
    pub record: RecordResponse,
}

impl From<&StockRecordDetail> for RecordResponse {
    fn from(detail: &StockRecordDetail) -> Self {
        Self {
            id: detail.record.id.0,
            bichikuhin_id: detail.record.item_id.0,
            bichikuhin_name: detail.item_name.clone(),
            location_id: detail.record.location_id.0,
            location_name: detail.location_name.clone(),
            unit_id: detail.record.unit_id.0,
            unit_name: detail.unit_name.clone(),
            quantity: detail.record.quantity,
            expiry_date: detail.record.expiry,
            stocktaking_id: detail.record.stocktaking_id.0,
            created_at: detail.record.created_at,
        }
    }
}

/// Expired records of the active stocktaking, soonest-expired first.
///
/// Machine-to-machine endpoint: callers authenticate with the `x-api-key`
/// header, not a session. With no active stocktaking the feed is empty.
#[utoipa::path(
    get,
    path = "/api/records/expired",
    responses(
        (status = 200, description = "Expired records", body = [RecordResponse]),
        (status = 403, description = "Missing or wrong api key"),
    ),
    security(("api_key" = [])),
    tag = "records"
)]
#[get("/records/expired")]
pub async fn expired(state: web::Data<HttpState>, req: HttpRequest) -> ApiResult<HttpResponse> {
    let presented = req
        .headers()
        .get(API_KEY_HEADER)
        .map(actix_web::http::header::HeaderValue::as_bytes)
        .unwrap_or_default();
    // Constant-time comparison; a plain `==` would leak prefix matches.
    if !bool::from(presented.ct_eq(state.records_api_key.as_bytes())) {
        return Err(Error::forbidden("api key rejected").into());
    }
    let details = state.records.expired_in_active().await?;
    let body: Vec<RecordResponse> = details.iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// Records of one stocktaking, newest first.
#[utoipa::path(
    get,
    path = "/api/records/{stocktakingId}",
    params(("stocktakingId" = i64, Path, description = "Owning snapshot")),
    responses((status = 200, description = "Snapshot records", body = [RecordResponse])),
    security(("session_cookie" = [])),
    tag = "records"
)]
#[get("/records/{stocktaking_id}")]
pub async fn list(
    state: web::Data<HttpState>,
    _auth: Authenticated,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let details = state
        .records
        .list(StocktakingId(path.into_inner()))
        .await?;
    let body: Vec<RecordResponse> = details.iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// Insert or update a ledger record. POST and PUT share one handler since
/// the payload's `id` field already decides between the two.
#[utoipa::path(
    post,
    path = "/api/records",
    request_body = RecordRequest,
    responses(
        (status = 200, description = "Record written", body = RecordWriteResponse),
        (status = 400, description = "No unit given and the item has no default"),
        (status = 404, description = "A reference resolves to nothing"),
    ),
    security(("session_cookie" = [])),
    tag = "records"
)]
#[route("/records", method = "POST", method = "PUT")]
pub async fn upsert(
    state: web::Data<HttpState>,
    _auth: Authenticated,
    payload: web::Json<RecordRequest>,
) -> ApiResult<HttpResponse> {
    let unit_id = match payload.unit_id {
        Some(id) => UnitId(id),
        None => default_unit_for(&state, ItemId(payload.bichikuhin_id)).await?,
    };
    let draft = StockRecordDraft {
        id: payload.id.map(RecordId),
        item_id: ItemId(payload.bichikuhin_id),
        location_id: LocationId(payload.location_id),
        unit_id,
        stocktaking_id: StocktakingId(payload.stocktaking_id),
        quantity: payload.quantity,
        expiry: payload.expiry_date,
    };
    let record = state.records.upsert(draft).await?;
    let details = state.records.list(record.stocktaking_id).await?;
    let written = details
        .iter()
        .find(|detail| detail.record.id == record.id)
        .map(RecordResponse::from)
        .ok_or_else(|| Error::internal("written record missing from listing"))?;
    Ok(HttpResponse::Ok().json(RecordWriteResponse {
        success: true,
        record: written,
    }))
}

async fn default_unit_for(state: &HttpState, item_id: ItemId) -> Result<UnitId, Error> {
    let items = state.masters.list_items(None).await?;
    let item = items
        .iter()
        .find(|item| item.id == item_id)
        .ok_or_else(|| Error::not_found(format!("item {item_id} not found")))?;
    item.default_unit
        .ok_or_else(|| Error::invalid_request("unitId required: item has no default unit"))
}
