//! User account endpoints: registration, profile and password management.

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::auth::Authenticated;
use super::error::ApiResult;
use super::sessions::Acknowledged;
use super::state::HttpState;
use crate::domain::{Error, LoginCredentials, Role, User};

/// Payload for `/api/register`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub password: String,
}

/// Payload for `/api/change_password`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

/// Payload for the administrative password reset.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetPasswordRequest {
    pub password: String,
}

/// Public view of a stored user; the password digest never appears here.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub name: String,
    pub display_name: String,
    pub role: Role,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().0,
            name: user.name().to_owned(),
            display_name: user.display_name().to_owned(),
            role: user.role(),
        }
    }
}

/// Registration envelope: an acknowledgement flag plus the created account.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub success: bool,
    pub user: UserResponse,
}

/// Identity as carried in the caller's access token.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserResponse {
    pub id: i64,
    pub display_name: String,
    pub role: Role,
}

/// Register a new plain-role account.
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Blank name or password"),
        (status = 409, description = "Login name already taken"),
    ),
    tag = "users"
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from_parts(&payload.name, &payload.password)
        .map_err(Error::from)?;
    let user = state.sessions.register(&credentials).await?;
    Ok(HttpResponse::Created().json(RegisterResponse {
        success: true,
        user: UserResponse::from(&user),
    }))
}

/// Report the caller's identity from their access token; no store lookup.
#[utoipa::path(
    get,
    path = "/api/user",
    responses(
        (status = 200, description = "Current identity", body = CurrentUserResponse),
        (status = 401, description = "Missing or expired access token"),
    ),
    security(("session_cookie" = [])),
    tag = "users"
)]
#[get("/user")]
pub async fn current_user(auth: Authenticated) -> HttpResponse {
    HttpResponse::Ok().json(CurrentUserResponse {
        id: auth.0.user_id.0,
        display_name: auth.0.display_name,
        role: auth.0.role,
    })
}

/// Change the caller's own password after verifying the current one.
#[utoipa::path(
    post,
    path = "/api/change_password",
    request_body = ChangePasswordRequest,
    responses(
        (status = 200, description = "Password changed", body = Acknowledged),
        (status = 400, description = "Blank new password"),
        (status = 403, description = "Current password does not match"),
    ),
    security(("session_cookie" = [])),
    tag = "users"
)]
#[post("/change_password")]
pub async fn change_password(
    state: web::Data<HttpState>,
    auth: Authenticated,
    payload: web::Json<ChangePasswordRequest>,
) -> ApiResult<HttpResponse> {
    let old_secret = Zeroizing::new(payload.old_password.clone());
    let new_secret = Zeroizing::new(payload.new_password.clone());
    state
        .sessions
        .change_password(auth.0.user_id, &old_secret, &new_secret)
        .await?;
    Ok(HttpResponse::Ok().json(Acknowledged { success: true }))
}

/// Administrative password reset; no old-password check.
#[utoipa::path(
    put,
    path = "/api/users/{id}/password",
    request_body = SetPasswordRequest,
    params(("id" = i64, Path, description = "User to reset")),
    responses(
        (status = 200, description = "Password reset", body = Acknowledged),
        (status = 403, description = "Caller is not an administrator"),
        (status = 404, description = "No such user"),
    ),
    security(("session_cookie" = [])),
    tag = "users"
)]
#[put("/users/{id}/password")]
pub async fn force_set_password(
    state: web::Data<HttpState>,
    auth: Authenticated,
    path: web::Path<i64>,
    payload: web::Json<SetPasswordRequest>,
) -> ApiResult<HttpResponse> {
    auth.require_role(Role::Admin)?;
    let secret = Zeroizing::new(payload.password.clone());
    state
        .sessions
        .force_set_password(crate::domain::UserId(path.into_inner()), &secret)
        .await?;
    Ok(HttpResponse::Ok().json(Acknowledged { success: true }))
}
