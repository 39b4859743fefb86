use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info, instrument, warn};

use super::domain::{AuthSession, AuthUser, LoginInput, NewSession, NewUser, RefreshInput, RegisterInput, Role};
use super::errors::AuthError;
use super::password::{PasswordHashing, ALGORITHM};
use super::repository::AuthRepository;
use super::token::{TokenIssuer, TokenKind};
use crate::clock::{Clock, SystemClock};

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub refresh_token_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    pub password: PasswordHashing,
}

impl AuthConfig {
    /// Default lifetimes: 24 hours for access tokens, 7 days for refresh tokens.
    pub fn new(jwt_secret: impl Into<String>, refresh_token_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            refresh_token_secret: refresh_token_secret.into(),
            access_ttl: Duration::hours(24),
            refresh_ttl: Duration::days(7),
            password: PasswordHashing::default(),
        }
    }
}

/// Session authenticator, independent of web framework.
///
/// Stateless over the injected repository: every operation is a short
/// sequence of independent repository calls, with no locking of its own.
pub struct AuthService<R: AuthRepository + ?Sized> {
    repo: Arc<R>,
    cfg: AuthConfig,
    tokens: TokenIssuer,
    clock: Arc<dyn Clock>,
}

impl<R: AuthRepository + ?Sized> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self {
        Self::with_clock(repo, cfg, Arc::new(SystemClock))
    }

    pub fn with_clock(repo: Arc<R>, cfg: AuthConfig, clock: Arc<dyn Clock>) -> Self {
        let tokens = TokenIssuer::new(cfg.jwt_secret.clone(), cfg.refresh_token_secret.clone(), cfg.access_ttl, cfg.refresh_ttl);
        Self { repo, cfg, tokens, clock }
    }

    /// Register a new user with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterInput, Role};
    /// use service::auth::password::PasswordHashing;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let cfg = AuthConfig { password: PasswordHashing::minimal(), ..AuthConfig::new("secret", "refresh") };
    /// let svc = AuthService::new(repo, cfg);
    /// let input = RegisterInput { name: "Alice".into(), email: "Alice@Hotel.com".into(), password: "pw123".into(), ..Default::default() };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "alice@hotel.com");
    /// assert_eq!(user.role, Role::Guest);
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        let name = input.name.trim();
        let email = input.email.trim().to_lowercase();
        if name.is_empty() || email.is_empty() || input.password.is_empty() {
            return Err(AuthError::MissingFields("Name, email, and password are required".into()));
        }
        if !email.contains('@') {
            return Err(AuthError::Validation("invalid email".into()));
        }
        let role = match input.role.as_deref().map(str::trim) {
            None | Some("") => Role::default(),
            Some(r) => r.parse::<Role>()?,
        };
        if let Some(existing) = self.repo.find_user_by_email(&email).await? {
            debug!(user_id = %existing.id, "email already registered");
            return Err(AuthError::UserExists);
        }

        let hash = self.cfg.password.hash_async(input.password).await?;
        let user = self
            .repo
            .create_user(NewUser { name: name.to_string(), email, role, phone: input.phone.filter(|p| !p.trim().is_empty()) })
            .await?;
        self.repo.upsert_password(user.id, hash, ALGORITHM.to_string()).await?;
        info!(user_id = %user.id, email = %user.email, role = %user.role, "user_registered");
        Ok(user)
    }

    /// Verify email and password, then open a session with a fresh token pair.
    ///
    /// Unknown email and wrong password fail identically.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{service::{AuthService, AuthConfig}, repository::mock::MockAuthRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use service::auth::password::PasswordHashing;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockAuthRepository::default());
    /// let cfg = AuthConfig { password: PasswordHashing::minimal(), ..AuthConfig::new("secret", "refresh") };
    /// let svc = AuthService::new(repo, cfg);
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { name: "N".into(), email: "u@e.com".into(), password: "pw123".into(), ..Default::default() }));
    /// let session = tokio_test::block_on(svc.authenticate(LoginInput { email: "U@E.com".into(), password: "pw123".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert!(session.user.last_login.is_some());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn authenticate(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let email = input.email.trim().to_lowercase();
        if email.is_empty() || input.password.is_empty() {
            return Err(AuthError::MissingCredentials);
        }

        let Some(mut user) = self.repo.find_user_by_email(&email).await? else {
            warn!(reason = "unknown_email", "login_failed");
            return Err(AuthError::InvalidCredentials);
        };
        let Some(cred) = self.repo.get_credentials(user.id).await? else {
            warn!(user_id = %user.id, reason = "no_credentials", "login_failed");
            return Err(AuthError::InvalidCredentials);
        };
        if !self.cfg.password.verify_async(input.password, cred.password_hash).await? {
            warn!(user_id = %user.id, reason = "bad_password", "login_failed");
            return Err(AuthError::InvalidCredentials);
        }

        let now = self.clock.now();
        let access = self.tokens.issue(TokenKind::Access, &user, now)?;
        let refresh = self.tokens.issue(TokenKind::Refresh, &user, now)?;
        let session = self
            .repo
            .create_session(NewSession {
                user_id: user.id,
                token: access.token.clone(),
                refresh_token: refresh.token.clone(),
                expires_at: access.expires_at,
                created_at: now,
            })
            .await?;
        self.repo.touch_last_login(user.id, now).await?;
        user.last_login = Some(now);

        info!(user_id = %user.id, session_id = %session.id, "login_succeeded");
        Ok(AuthSession { token: access.token, refresh_token: refresh.token, user })
    }

    /// Resolve a bearer access token to its user.
    ///
    /// The session record is authoritative: a token with a good signature and
    /// unexpired `exp` still fails once its session is gone.
    #[instrument(skip_all)]
    pub async fn validate(&self, token: &str) -> Result<AuthUser, AuthError> {
        if token.trim().is_empty() {
            return Err(AuthError::Unauthorized);
        }
        let now = self.clock.now();
        if let Err(e) = self.tokens.verify(TokenKind::Access, token, now) {
            debug!(code = e.code(), "token_rejected");
            return Err(e);
        }

        let session = match self.repo.find_session_by_token(token).await? {
            Some(s) if s.expires_at > now => s,
            _ => {
                debug!(code = "INVALID_SESSION", "token_rejected");
                return Err(AuthError::InvalidSession);
            }
        };
        self.repo.find_user_by_id(session.user_id).await?.ok_or_else(|| {
            debug!(user_id = %session.user_id, code = "USER_NOT_FOUND", "token_rejected");
            AuthError::UserNotFound
        })
    }

    /// Exchange a refresh token for a new pair, rotating the session in place.
    ///
    /// A refresh token that has already been rotated no longer matches any
    /// session and fails with [`AuthError::InvalidRefreshToken`]; the user's
    /// other sessions are left untouched.
    #[instrument(skip_all)]
    pub async fn refresh(&self, input: RefreshInput) -> Result<AuthSession, AuthError> {
        let presented = input.refresh_token.trim();
        if presented.is_empty() {
            return Err(AuthError::MissingRefreshToken);
        }
        let now = self.clock.now();
        if let Err(e) = self.tokens.verify(TokenKind::Refresh, presented, now) {
            debug!(code = e.code(), "token_rejected");
            return Err(e);
        }

        let Some(session) = self.repo.find_session_by_refresh_token(presented).await? else {
            warn!("refresh token matches no session");
            return Err(AuthError::InvalidRefreshToken);
        };
        let user = self.repo.find_user_by_id(session.user_id).await?.ok_or(AuthError::UserNotFound)?;

        let access = self.tokens.issue(TokenKind::Access, &user, now)?;
        let refresh = self.tokens.issue(TokenKind::Refresh, &user, now)?;
        // Lost-update race between two concurrent refreshes of one session is accepted.
        self.repo
            .rotate_session(session.id, &access.token, &refresh.token, access.expires_at)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        info!(user_id = %user.id, session_id = %session.id, "session_refreshed");
        Ok(AuthSession { token: access.token, refresh_token: refresh.token, user })
    }

    /// Delete the session behind an access token. Idempotent.
    #[instrument(skip_all)]
    pub async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        let removed = self.repo.delete_session_by_token(token).await?;
        info!(removed, "session_revoked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::policy::authorize;
    use crate::auth::repo::seaorm::SeaOrmAuthRepository;
    use crate::auth::repository::mock::MockAuthRepository;
    use crate::clock::ManualClock;
    use crate::test_support::get_db;
    use chrono::Utc;

    struct Fixture {
        repo: Arc<MockAuthRepository>,
        clock: Arc<ManualClock>,
        svc: AuthService<MockAuthRepository>,
    }

    fn fixture() -> Fixture {
        let repo = Arc::new(MockAuthRepository::default());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cfg = AuthConfig { password: PasswordHashing::minimal(), ..AuthConfig::new("access-secret", "refresh-secret") };
        let svc = AuthService::with_clock(repo.clone(), cfg, clock.clone());
        Fixture { repo, clock, svc }
    }

    fn register_input(email: &str, role: Option<&str>) -> RegisterInput {
        RegisterInput {
            name: "Alice".into(),
            email: email.into(),
            password: "pw123".into(),
            role: role.map(str::to_string),
            phone: None,
        }
    }

    fn login(email: &str, password: &str) -> LoginInput {
        LoginInput { email: email.into(), password: password.into() }
    }

    #[tokio::test]
    async fn alice_registers_and_logs_in_as_guest() {
        let f = fixture();
        let user = f.svc.register(register_input("alice@hotel.com", Some("guest"))).await.unwrap();
        assert_eq!(user.role, Role::Guest);

        let session = f.svc.authenticate(login("alice@hotel.com", "pw123")).await.unwrap();
        assert_eq!(session.user.role, Role::Guest);
        assert!(!authorize(&session.user, &[Role::Admin]));

        let err = f.svc.authenticate(login("alice@hotel.com", "wrongpw")).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_are_indistinguishable() {
        let f = fixture();
        f.svc.register(register_input("alice@hotel.com", None)).await.unwrap();
        let wrong_pw = f.svc.authenticate(login("alice@hotel.com", "nope")).await.unwrap_err();
        let unknown = f.svc.authenticate(login("nobody@hotel.com", "pw123")).await.unwrap_err();
        assert_eq!(wrong_pw.code(), unknown.code());
        assert_eq!(wrong_pw.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn login_token_validates_and_payload_has_no_hash() {
        let f = fixture();
        f.svc.register(register_input("alice@hotel.com", None)).await.unwrap();
        let session = f.svc.authenticate(login("ALICE@hotel.com", "pw123")).await.unwrap();
        let user = f.svc.validate(&session.token).await.unwrap();
        assert_eq!(user.email, "alice@hotel.com");

        let json = serde_json::to_string(&session).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("password"));
        assert!(json.contains("refreshToken"));
    }

    #[tokio::test]
    async fn register_rules() {
        let f = fixture();
        let mut missing = register_input("a@hotel.com", None);
        missing.password.clear();
        assert!(matches!(f.svc.register(missing).await, Err(AuthError::MissingFields(_))));
        assert!(matches!(f.svc.register(register_input("a@hotel.com", Some("manager"))).await, Err(AuthError::InvalidRole(_))));

        let staff = f.svc.register(register_input("  Desk@Hotel.com ", Some("Receptionist"))).await.unwrap();
        assert_eq!(staff.email, "desk@hotel.com");
        assert_eq!(staff.role, Role::Receptionist);
        assert!(matches!(f.svc.register(register_input("desk@hotel.com", None)).await, Err(AuthError::UserExists)));
    }

    #[tokio::test]
    async fn empty_login_fields_are_missing_credentials() {
        let f = fixture();
        assert!(matches!(f.svc.authenticate(login("", "pw")).await, Err(AuthError::MissingCredentials)));
        assert!(matches!(f.svc.authenticate(login("a@hotel.com", "")).await, Err(AuthError::MissingCredentials)));
    }

    #[tokio::test]
    async fn validate_rejects_empty_and_garbage() {
        let f = fixture();
        assert!(matches!(f.svc.validate("").await, Err(AuthError::Unauthorized)));
        assert!(matches!(f.svc.validate("garbage").await, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn revoked_token_fails_before_its_expiry() {
        let f = fixture();
        f.svc.register(register_input("admin@hotel.com", Some("admin"))).await.unwrap();
        let session = f.svc.authenticate(login("admin@hotel.com", "pw123")).await.unwrap();
        f.svc.revoke(&session.token).await.unwrap();
        assert!(matches!(f.svc.validate(&session.token).await, Err(AuthError::InvalidSession)));
        // second revoke is a no-op
        f.svc.revoke(&session.token).await.unwrap();
    }

    #[tokio::test]
    async fn token_expires_with_the_clock() {
        let f = fixture();
        f.svc.register(register_input("alice@hotel.com", None)).await.unwrap();
        let session = f.svc.authenticate(login("alice@hotel.com", "pw123")).await.unwrap();
        f.clock.advance(Duration::hours(23));
        assert!(f.svc.validate(&session.token).await.is_ok());
        f.clock.advance(Duration::hours(1) + Duration::seconds(1));
        let err = f.svc.validate(&session.token).await.unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired | AuthError::InvalidSession));
    }

    #[tokio::test]
    async fn lapsed_session_fails_while_token_is_still_live() {
        let f = fixture();
        f.svc.register(register_input("alice@hotel.com", None)).await.unwrap();
        let s = f.svc.authenticate(login("alice@hotel.com", "pw123")).await.unwrap();
        let stored = f.repo.find_session_by_token(&s.token).await.unwrap().unwrap();
        // cut the stored expiry well below the token's own 24h `exp`
        f.repo
            .rotate_session(stored.id, &s.token, &s.refresh_token, f.clock.now() + Duration::minutes(10))
            .await
            .unwrap();
        f.clock.advance(Duration::minutes(9));
        assert!(f.svc.validate(&s.token).await.is_ok());
        f.clock.advance(Duration::minutes(1));
        assert!(matches!(f.svc.validate(&s.token).await, Err(AuthError::InvalidSession)));
    }

    #[tokio::test]
    async fn refresh_rotates_and_stale_token_is_rejected() {
        let f = fixture();
        f.svc.register(register_input("alice@hotel.com", None)).await.unwrap();
        let first = f.svc.authenticate(login("alice@hotel.com", "pw123")).await.unwrap();

        f.clock.advance(Duration::minutes(5));
        let second = f.svc.refresh(RefreshInput { refresh_token: first.refresh_token.clone() }).await.unwrap();
        assert_ne!(second.token, first.token);
        assert_eq!(f.repo.session_count().unwrap(), 1);

        assert!(f.svc.validate(&second.token).await.is_ok());
        assert!(matches!(f.svc.validate(&first.token).await, Err(AuthError::InvalidSession)));

        let stale = f.svc.refresh(RefreshInput { refresh_token: first.refresh_token }).await.unwrap_err();
        assert!(matches!(stale, AuthError::InvalidRefreshToken));
        // the rotated session survives the stale attempt
        assert!(f.svc.validate(&second.token).await.is_ok());
    }

    #[tokio::test]
    async fn refresh_input_checks() {
        let f = fixture();
        assert!(matches!(f.svc.refresh(RefreshInput::default()).await, Err(AuthError::MissingRefreshToken)));
        f.svc.register(register_input("alice@hotel.com", None)).await.unwrap();
        let s = f.svc.authenticate(login("alice@hotel.com", "pw123")).await.unwrap();
        // an access token is not a refresh token
        assert!(matches!(f.svc.refresh(RefreshInput { refresh_token: s.token }).await, Err(AuthError::InvalidToken)));
        f.clock.advance(Duration::days(8));
        assert!(matches!(f.svc.refresh(RefreshInput { refresh_token: s.refresh_token }).await, Err(AuthError::TokenExpired)));
    }

    #[tokio::test]
    async fn sessions_of_a_removed_user_fail() {
        let f = fixture();
        let user = f.svc.register(register_input("alice@hotel.com", None)).await.unwrap();
        let s = f.svc.authenticate(login("alice@hotel.com", "pw123")).await.unwrap();
        f.repo.remove_user(user.id).unwrap();
        assert!(matches!(f.svc.validate(&s.token).await, Err(AuthError::UserNotFound)));
        assert!(matches!(f.svc.refresh(RefreshInput { refresh_token: s.refresh_token }).await, Err(AuthError::UserNotFound)));
    }

    #[tokio::test]
    async fn concurrent_sessions_are_independent() {
        let f = fixture();
        f.svc.register(register_input("alice@hotel.com", None)).await.unwrap();
        let phone = f.svc.authenticate(login("alice@hotel.com", "pw123")).await.unwrap();
        let laptop = f.svc.authenticate(login("alice@hotel.com", "pw123")).await.unwrap();
        f.svc.revoke(&phone.token).await.unwrap();
        assert!(f.svc.validate(&laptop.token).await.is_ok());
        assert!(f.svc.validate(&phone.token).await.is_err());
    }

    #[tokio::test]
    async fn full_session_lifecycle_over_sqlite() -> Result<(), anyhow::Error> {
        let repo = Arc::new(SeaOrmAuthRepository { db: get_db().await? });
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cfg = AuthConfig { password: PasswordHashing::minimal(), ..AuthConfig::new("access-secret", "refresh-secret") };
        let svc = AuthService::with_clock(repo, cfg, clock.clone());

        svc.register(register_input("desk@hotel.com", Some("receptionist"))).await?;
        let first = svc.authenticate(login("desk@hotel.com", "pw123")).await?;
        assert_eq!(svc.validate(&first.token).await?.role, Role::Receptionist);
        assert!(first.user.last_login.is_some());

        clock.advance(Duration::minutes(1));
        let second = svc.refresh(RefreshInput { refresh_token: first.refresh_token.clone() }).await?;
        assert!(matches!(svc.validate(&first.token).await, Err(AuthError::InvalidSession)));
        assert!(matches!(
            svc.refresh(RefreshInput { refresh_token: first.refresh_token }).await,
            Err(AuthError::InvalidRefreshToken)
        ));
        assert_eq!(svc.validate(&second.token).await?.email, "desk@hotel.com");

        svc.revoke(&second.token).await?;
        assert!(matches!(svc.validate(&second.token).await, Err(AuthError::InvalidSession)));
        Ok(())
    }
}
