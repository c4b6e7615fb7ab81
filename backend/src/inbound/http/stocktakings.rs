//! Stocktaking snapshot endpoints.

use actix_web::{HttpResponse, get, post, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::auth::Authenticated;
use super::error::ApiResult;
use super::state::HttpState;
use crate::domain::{Stocktaking, StocktakingId};

/// Payload for `POST /api/stocktakings`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStocktakingRequest {
    pub name: String,
    /// ISO-8601 calendar date, e.g. `2024-06-01`.
    pub date: NaiveDate,
    /// Snapshot whose records seed the new one. An id matching nothing
    /// yields an empty snapshot.
    pub copy_from_id: Option<i64>,
}

/// One stocktaking snapshot.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StocktakingResponse {
    pub id: i64,
    pub name: String,
    pub date: NaiveDate,
    pub active: bool,
}

impl From<&Stocktaking> for StocktakingResponse {
    fn from(snapshot: &Stocktaking) -> Self {
        Self {
            id: snapshot.id.0,
            name: snapshot.name.clone(),
            date: snapshot.date,
            active: snapshot.active,
        }
    }
}

/// List every stocktaking, newest date first.
#[utoipa::path(
    get,
    path = "/api/stocktakings",
    responses((status = 200, description = "All snapshots", body = [StocktakingResponse])),
    security(("session_cookie" = [])),
    tag = "stocktakings"
)]
#[get("/stocktakings")]
pub async fn list(state: web::Data<HttpState>, _auth: Authenticated) -> ApiResult<HttpResponse> {
    let snapshots = state.stocktakings.list().await?;
    let body: Vec<StocktakingResponse> = snapshots.iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// Open a new active stocktaking; every other snapshot is deactivated in the
/// same transaction.
#[utoipa::path(
    post,
    path = "/api/stocktakings",
    request_body = CreateStocktakingRequest,
    responses(
        (status = 201, description = "Snapshot created and activated", body = StocktakingResponse),
        (status = 400, description = "Blank name"),
    ),
    security(("session_cookie" = [])),
    tag = "stocktakings"
)]
#[post("/stocktakings")]
pub async fn create(
    state: web::Data<HttpState>,
    _auth: Authenticated,
    payload: web::Json<CreateStocktakingRequest>,
) -> ApiResult<HttpResponse> {
    let copy_from = payload.copy_from_id.map(StocktakingId);
    let created = state
        .stocktakings
        .create(&payload.name, payload.date, copy_from)
        .await?;
    Ok(HttpResponse::Created().json(StocktakingResponse::from(&created)))
}
