//! Access-token authentication for HTTP handlers.
//!
//! Handlers opt in by taking an [`Authenticated`] parameter. The extractor
//! reads the access cookie, verifies it statelessly, and hands the handler
//! the decoded claims. Role checks stay explicit in the handlers that need
//! them.

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::{Ready, ready};

use super::error::ApiError;
use super::state::HttpState;
use crate::domain::{AccessClaims, Error, Role};

/// Cookie holding the short-lived access token.
pub const ACCESS_COOKIE: &str = "accessToken";
/// Cookie holding the long-lived refresh token.
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Verified access claims of the calling user.
#[derive(Debug, Clone)]
pub struct Authenticated(pub AccessClaims);

impl Authenticated {
    /// Reject callers whose role does not satisfy `required`.
    pub fn require_role(&self, required: Role) -> Result<(), ApiError> {
        if self.0.role.satisfies(required) {
            Ok(())
        } else {
            Err(Error::forbidden(format!("{} role required", required.as_str())).into())
        }
    }
}

impl FromRequest for Authenticated {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<Authenticated, ApiError> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("http state not configured"))?;
    let cookie = req
        .cookie(ACCESS_COOKIE)
        .ok_or_else(|| Error::unauthorized("login required"))?;
    let claims = state.sessions.verify_access(cookie.value())?;
    Ok(Authenticated(claims))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;
    use crate::domain::{ErrorCode, UserId};

    fn claims(role: Role) -> AccessClaims {
        AccessClaims {
            user_id: UserId(7),
            display_name: "staff".to_owned(),
            role,
            jti: Uuid::new_v4(),
            exp: Utc::now().timestamp() + 60,
        }
    }

    #[test]
    fn admin_satisfies_admin_gate() {
        assert!(Authenticated(claims(Role::Admin)).require_role(Role::Admin).is_ok());
    }

    #[test]
    fn plain_user_fails_admin_gate() {
        let denied = Authenticated(claims(Role::User))
            .require_role(Role::Admin)
            .expect_err("plain users must be refused");
        assert_eq!(denied.code(), ErrorCode::Forbidden);
    }
}
