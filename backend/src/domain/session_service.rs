//! Session service: the dual-token issue/verify/refresh protocol.
//!
//! Access tokens are short-lived and fully stateless; refresh tokens are
//! long-lived and only carry the user id. Logout is client-side cookie
//! clearing — the server keeps no session table, so tokens stay
//! cryptographically valid until their natural expiry.

use std::sync::Arc;

use tracing::info;

use crate::domain::ports::{Clock, PasswordHasher, UserRepository};
use crate::domain::token::{AccessClaims, RefreshClaims, TokenError, TokenSigner};
use crate::domain::{Error, LoginCredentials, NewUser, Role, User, UserId};

/// Login name seeded when the credential store is empty.
pub const DEFAULT_ADMIN_NAME: &str = "admin";
/// Bootstrap password for the seeded admin; operators are expected to change
/// it after first login.
pub const DEFAULT_ADMIN_PASSWORD: &str = "password123";

/// The two cookies minted by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Issues, verifies and refreshes session tokens, and manages credentials.
pub struct SessionService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
    access_signer: TokenSigner,
    refresh_signer: TokenSigner,
}

impl SessionService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
        access_signer: TokenSigner,
        refresh_signer: TokenSigner,
    ) -> Self {
        Self {
            users,
            hasher,
            clock,
            access_signer,
            refresh_signer,
        }
    }

    /// Authenticate credentials and mint an access/refresh token pair.
    ///
    /// Unknown names and digest mismatches are indistinguishable to the
    /// caller.
    pub async fn issue_session(&self, credentials: &LoginCredentials) -> Result<TokenPair, Error> {
        let user = self
            .users
            .find_by_name(credentials.name())
            .await?
            .ok_or_else(invalid_credentials)?;

        if !self.hasher.verify(credentials.password(), user.password_digest()) {
            return Err(invalid_credentials());
        }

        let now = self.clock.now();
        let access_token = self
            .access_signer
            .sign(&AccessClaims::for_user(&user, now))
            .map_err(map_codec_error)?;
        let refresh_token = self
            .refresh_signer
            .sign(&RefreshClaims::for_user(user.id(), now))
            .map_err(map_codec_error)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Verify an access token: signature and deadline only, no store lookup.
    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, Error> {
        self.access_signer
            .verify(token, self.clock.now())
            .map_err(|err| match err {
                TokenError::Expired => Error::unauthorized("access token expired"),
                TokenError::Invalid => Error::unauthorized("access token rejected"),
                TokenError::Codec(message) => Error::internal(message),
            })
    }

    /// Redeem a refresh token for a fresh access token.
    ///
    /// The user row is re-read so the new access token carries the account's
    /// current display name and role; a deleted account fails the refresh.
    /// Failures here are forbidden-class: the caller presented a credential
    /// that was understood and rejected.
    pub async fn refresh(&self, refresh_token: &str) -> Result<String, Error> {
        let claims: RefreshClaims = self
            .refresh_signer
            .verify(refresh_token, self.clock.now())
            .map_err(|err| match err {
                TokenError::Expired => Error::forbidden("refresh token expired"),
                TokenError::Invalid => Error::forbidden("refresh token rejected"),
                TokenError::Codec(message) => Error::internal(message),
            })?;

        let user = self
            .users
            .find_by_id(claims.user_id)
            .await?
            .ok_or_else(|| Error::forbidden("refresh token rejected"))?;

        self.access_signer
            .sign(&AccessClaims::for_user(&user, self.clock.now()))
            .map_err(map_codec_error)
    }

    /// Register a new plain-role user. Duplicate names conflict.
    pub async fn register(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let digest = self.hasher.hash(credentials.password())?;
        let user = self
            .users
            .create(NewUser {
                name: credentials.name().to_owned(),
                display_name: credentials.name().to_owned(),
                role: Role::User,
                password_digest: digest,
            })
            .await?;
        info!(user = %user.name(), id = %user.id(), "user registered");
        Ok(user)
    }

    /// Change a user's own password after verifying the old one.
    pub async fn change_password(
        &self,
        user_id: UserId,
        old_secret: &str,
        new_secret: &str,
    ) -> Result<(), Error> {
        if new_secret.is_empty() {
            return Err(Error::invalid_request("new password must not be empty"));
        }
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))?;
        if !self.hasher.verify(old_secret, user.password_digest()) {
            return Err(Error::forbidden("current password does not match"));
        }
        let digest = self.hasher.hash(new_secret)?;
        self.users.set_password_digest(user_id, digest).await?;
        Ok(())
    }

    /// Set a user's password without old-password verification.
    ///
    /// Callers must gate this behind an admin role check at the boundary.
    pub async fn force_set_password(
        &self,
        user_id: UserId,
        new_secret: &str,
    ) -> Result<(), Error> {
        if new_secret.is_empty() {
            return Err(Error::invalid_request("new password must not be empty"));
        }
        let digest = self.hasher.hash(new_secret)?;
        self.users.set_password_digest(user_id, digest).await?;
        info!(user_id = %user_id, "password reset by administrator");
        Ok(())
    }

    /// Seed the default admin account when the store holds no users at all.
    /// Returns the created user, or `None` when seeding was skipped.
    pub async fn seed_default_admin(&self) -> Result<Option<User>, Error> {
        if self.users.count().await? > 0 {
            return Ok(None);
        }
        let digest = self.hasher.hash(DEFAULT_ADMIN_PASSWORD)?;
        let user = self
            .users
            .create(NewUser {
                name: DEFAULT_ADMIN_NAME.to_owned(),
                display_name: DEFAULT_ADMIN_NAME.to_owned(),
                role: Role::Admin,
                password_digest: digest,
            })
            .await?;
        info!(user = %user.name(), "seeded default admin account");
        Ok(Some(user))
    }
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid credentials")
}

fn map_codec_error(err: TokenError) -> Error {
    Error::internal(err.to_string())
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{DateTime, TimeZone, Utc};
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{FixedClock, StoreError};
    use crate::domain::token::ACCESS_TTL_SECS;

    /// Reversible stand-in for the real hasher; digests are `hash:<secret>`.
    struct StubHasher;

    impl PasswordHasher for StubHasher {
        fn hash(&self, secret: &str) -> Result<String, Error> {
            Ok(format!("hash:{secret}"))
        }

        fn verify(&self, secret: &str, digest: &str) -> bool {
            digest == format!("hash:{secret}")
        }
    }

    #[derive(Default)]
    struct StubUsers {
        rows: Mutex<Vec<User>>,
    }

    impl StubUsers {
        fn with_user(user: User) -> Self {
            Self {
                rows: Mutex::new(vec![user]),
            }
        }

        fn remove_all(&self) {
            self.rows.lock().expect("lock").clear();
        }
    }

    #[async_trait]
    impl UserRepository for StubUsers {
        async fn find_by_name(&self, name: &str) -> Result<Option<User>, StoreError> {
            Ok(self
                .rows
                .lock()
                .expect("lock")
                .iter()
                .find(|u| u.name() == name)
                .cloned())
        }

        async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
            Ok(self
                .rows
                .lock()
                .expect("lock")
                .iter()
                .find(|u| u.id() == id)
                .cloned())
        }

        async fn create(&self, user: NewUser) -> Result<User, StoreError> {
            let mut rows = self.rows.lock().expect("lock");
            if rows.iter().any(|u| u.name() == user.name) {
                return Err(StoreError::Duplicate(user.name));
            }
            let id = UserId(rows.len() as i64 + 1);
            let created = User::new(
                id,
                user.name,
                user.display_name,
                user.role,
                user.password_digest,
            );
            rows.push(created.clone());
            Ok(created)
        }

        async fn set_password_digest(
            &self,
            id: UserId,
            digest: String,
        ) -> Result<(), StoreError> {
            let mut rows = self.rows.lock().expect("lock");
            let Some(position) = rows.iter().position(|u| u.id() == id) else {
                return Err(StoreError::MissingRow(format!("user {id}")));
            };
            let old = rows.remove(position);
            rows.push(User::new(
                old.id(),
                old.name(),
                old.display_name(),
                old.role(),
                digest,
            ));
            Ok(())
        }

        async fn count(&self) -> Result<u64, StoreError> {
            Ok(self.rows.lock().expect("lock").len() as u64)
        }
    }

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).single().expect("valid instant")
    }

    fn admin_user() -> User {
        User::new(UserId(1), "admin", "admin", Role::Admin, "hash:password123")
    }

    fn service_with(users: Arc<StubUsers>, now: DateTime<Utc>) -> SessionService {
        SessionService::new(
            users,
            Arc::new(StubHasher),
            Arc::new(FixedClock(now)),
            TokenSigner::new(*b"access-key-access-key-access-key"),
            TokenSigner::new(*b"refresh-key-refresh-key-refresh!"),
        )
    }

    #[tokio::test]
    async fn login_issues_distinct_verifiable_tokens() {
        let users = Arc::new(StubUsers::with_user(admin_user()));
        let service = service_with(users, epoch());

        let creds = LoginCredentials::try_from_parts("admin", "password123").expect("valid");
        let pair = service.issue_session(&creds).await.expect("login succeeds");

        assert_ne!(pair.access_token, pair.refresh_token);
        let claims = service
            .verify_access(&pair.access_token)
            .expect("fresh access token verifies");
        assert_eq!(claims.user_id, UserId(1));
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.display_name, "admin");
    }

    #[rstest]
    #[case("admin", "wrong")]
    #[case("ghost", "password123")]
    #[tokio::test]
    async fn bad_credentials_are_unauthorized(#[case] name: &str, #[case] password: &str) {
        let users = Arc::new(StubUsers::with_user(admin_user()));
        let service = service_with(users, epoch());

        let creds = LoginCredentials::try_from_parts(name, password).expect("valid shape");
        let err = service
            .issue_session(&creds)
            .await
            .expect_err("must reject");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), "invalid credentials");
    }

    #[tokio::test]
    async fn expired_access_token_is_unauthorized() {
        let users = Arc::new(StubUsers::with_user(admin_user()));
        let issue_service = service_with(users.clone(), epoch());
        let creds = LoginCredentials::try_from_parts("admin", "password123").expect("valid");
        let pair = issue_service.issue_session(&creds).await.expect("login");

        let later = epoch() + chrono::Duration::seconds(ACCESS_TTL_SECS);
        let verify_service = service_with(users, later);
        let err = verify_service
            .verify_access(&pair.access_token)
            .expect_err("expired token must fail");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[tokio::test]
    async fn refresh_rereads_current_role_from_store() {
        let users = Arc::new(StubUsers::with_user(admin_user()));
        let service = service_with(users.clone(), epoch());
        let creds = LoginCredentials::try_from_parts("admin", "password123").expect("valid");
        let pair = service.issue_session(&creds).await.expect("login");

        // Demote the account between issue and refresh.
        users.remove_all();
        users
            .rows
            .lock()
            .expect("lock")
            .push(User::new(UserId(1), "admin", "Demoted", Role::User, "hash:x"));

        let access = service
            .refresh(&pair.refresh_token)
            .await
            .expect("refresh succeeds");
        let claims = service.verify_access(&access).expect("new token verifies");
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.display_name, "Demoted");
    }

    #[tokio::test]
    async fn refresh_of_deleted_user_is_forbidden() {
        let users = Arc::new(StubUsers::with_user(admin_user()));
        let service = service_with(users.clone(), epoch());
        let creds = LoginCredentials::try_from_parts("admin", "password123").expect("valid");
        let pair = service.issue_session(&creds).await.expect("login");

        users.remove_all();
        let err = service
            .refresh(&pair.refresh_token)
            .await
            .expect_err("deleted user cannot refresh");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn tampered_refresh_token_is_forbidden() {
        let users = Arc::new(StubUsers::with_user(admin_user()));
        let service = service_with(users, epoch());
        let err = service
            .refresh("bogus.token")
            .await
            .expect_err("garbage must fail");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn register_rejects_duplicate_names() {
        let users = Arc::new(StubUsers::with_user(admin_user()));
        let service = service_with(users, epoch());
        let creds = LoginCredentials::try_from_parts("admin", "whatever").expect("valid");
        let err = service.register(&creds).await.expect_err("duplicate name");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn register_creates_plain_user() {
        let users = Arc::new(StubUsers::default());
        let service = service_with(users, epoch());
        let creds = LoginCredentials::try_from_parts("alice", "secret").expect("valid");
        let user = service.register(&creds).await.expect("registers");
        assert_eq!(user.role(), Role::User);
        assert_eq!(user.name(), "alice");
    }

    #[tokio::test]
    async fn change_password_requires_matching_old_secret() {
        let users = Arc::new(StubUsers::with_user(admin_user()));
        let service = service_with(users.clone(), epoch());

        let err = service
            .change_password(UserId(1), "wrong-old", "new-secret")
            .await
            .expect_err("mismatch must fail");
        assert_eq!(err.code(), ErrorCode::Forbidden);

        service
            .change_password(UserId(1), "password123", "new-secret")
            .await
            .expect("matching old secret succeeds");
        let stored = users
            .find_by_id(UserId(1))
            .await
            .expect("lookup")
            .expect("user present");
        assert_eq!(stored.password_digest(), "hash:new-secret");
    }

    #[tokio::test]
    async fn force_set_password_skips_verification() {
        let users = Arc::new(StubUsers::with_user(admin_user()));
        let service = service_with(users.clone(), epoch());
        service
            .force_set_password(UserId(1), "reset-secret")
            .await
            .expect("reset succeeds");
        let stored = users
            .find_by_id(UserId(1))
            .await
            .expect("lookup")
            .expect("user present");
        assert_eq!(stored.password_digest(), "hash:reset-secret");
    }

    #[tokio::test]
    async fn seeding_only_runs_on_empty_store() {
        let users = Arc::new(StubUsers::default());
        let service = service_with(users.clone(), epoch());

        let seeded = service.seed_default_admin().await.expect("seeds");
        let seeded = seeded.expect("admin created");
        assert_eq!(seeded.name(), DEFAULT_ADMIN_NAME);
        assert_eq!(seeded.role(), Role::Admin);

        let second = service.seed_default_admin().await.expect("no-op");
        assert!(second.is_none());

        let creds = LoginCredentials::try_from_parts(DEFAULT_ADMIN_NAME, DEFAULT_ADMIN_PASSWORD)
            .expect("valid");
        assert!(service.issue_session(&creds).await.is_ok());
    }
}
