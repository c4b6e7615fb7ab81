//! Signed session tokens.
//!
//! Tokens are tamper-evident, not confidential: a base64url claims payload
//! followed by an HMAC-SHA256 tag over that payload, joined with a dot. The
//! server keeps no session table; verification is a pure signature and
//! deadline check, so a revoked account stays valid until its access token
//! expires. That staleness window is an accepted design limit.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use sha2::Sha256;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::{Role, User, UserId};

type HmacSha256 = Hmac<Sha256>;

/// Access tokens expire five minutes after issue.
pub const ACCESS_TTL_SECS: i64 = 5 * 60;
/// Refresh tokens expire seven days after issue.
pub const REFRESH_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Failures surfaced by the token codec.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The deadline in the claims has passed.
    #[error("token expired")]
    Expired,
    /// Malformed encoding, unknown claims shape, or signature mismatch.
    #[error("token rejected")]
    Invalid,
    /// Claims could not be serialised or the signing key was unusable.
    #[error("token codec failure: {0}")]
    Codec(String),
}

/// Claim sets carry an absolute expiry deadline in Unix seconds.
pub trait ExpiringClaims {
    fn expires_at(&self) -> i64;
}

/// Claims minted into an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessClaims {
    pub user_id: UserId,
    pub display_name: String,
    pub role: Role,
    /// Token id; a future revocation set would key on this.
    pub jti: Uuid,
    pub exp: i64,
}

impl AccessClaims {
    /// Mint access claims for a user as of `now`.
    pub fn for_user(user: &User, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user.id(),
            display_name: user.display_name().to_owned(),
            role: user.role(),
            jti: Uuid::new_v4(),
            exp: now.timestamp() + ACCESS_TTL_SECS,
        }
    }
}

impl ExpiringClaims for AccessClaims {
    fn expires_at(&self) -> i64 {
        self.exp
    }
}

/// Claims minted into a refresh token. Only the user id is embedded; the
/// current display name and role are re-read from the credential store when
/// the token is redeemed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshClaims {
    pub user_id: UserId,
    pub jti: Uuid,
    pub exp: i64,
}

impl RefreshClaims {
    /// Mint refresh claims for a user id as of `now`.
    pub fn for_user(user_id: UserId, now: DateTime<Utc>) -> Self {
        Self {
            user_id,
            jti: Uuid::new_v4(),
            exp: now.timestamp() + REFRESH_TTL_SECS,
        }
    }
}

impl ExpiringClaims for RefreshClaims {
    fn expires_at(&self) -> i64 {
        self.exp
    }
}

/// HMAC-SHA256 signer bound to one secret key.
///
/// Access and refresh tokens use separate signer instances with separate
/// keys, so one kind can never be replayed as the other.
#[derive(Clone)]
pub struct TokenSigner {
    key: Zeroizing<Vec<u8>>,
}

impl TokenSigner {
    pub fn new(key: impl Into<Vec<u8>>) -> Self {
        Self {
            key: Zeroizing::new(key.into()),
        }
    }

    fn mac(&self) -> Result<HmacSha256, TokenError> {
        HmacSha256::new_from_slice(&self.key)
            .map_err(|err| TokenError::Codec(format!("signing key rejected: {err}")))
    }

    /// Encode and sign a claim set.
    pub fn sign<T: Serialize>(&self, claims: &T) -> Result<String, TokenError> {
        let payload = serde_json::to_vec(claims)
            .map_err(|err| TokenError::Codec(format!("claims serialisation failed: {err}")))?;
        let encoded = URL_SAFE_NO_PAD.encode(payload);
        let mut mac = self.mac()?;
        mac.update(encoded.as_bytes());
        let tag = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        Ok(format!("{encoded}.{tag}"))
    }

    /// Verify the signature, decode the claims, and check the deadline.
    ///
    /// A token whose deadline equals `now` is already rejected; expiry
    /// instants are exclusive upper bounds on validity.
    pub fn verify<T>(&self, token: &str, now: DateTime<Utc>) -> Result<T, TokenError>
    where
        T: DeserializeOwned + ExpiringClaims,
    {
        let (encoded, tag) = token.split_once('.').ok_or(TokenError::Invalid)?;
        let tag_bytes = URL_SAFE_NO_PAD
            .decode(tag.as_bytes())
            .map_err(|_| TokenError::Invalid)?;

        let mut mac = self.mac()?;
        mac.update(encoded.as_bytes());
        // Constant-time comparison via the Mac trait.
        mac.verify_slice(&tag_bytes)
            .map_err(|_| TokenError::Invalid)?;

        let payload = URL_SAFE_NO_PAD
            .decode(encoded.as_bytes())
            .map_err(|_| TokenError::Invalid)?;
        let claims: T = serde_json::from_slice(&payload).map_err(|_| TokenError::Invalid)?;

        if now.timestamp() >= claims.expires_at() {
            return Err(TokenError::Expired);
        }
        Ok(claims)
    }
}
