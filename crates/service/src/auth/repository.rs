use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::domain::{AuthUser, Credentials, NewSession, NewUser, Session};
use super::errors::AuthError;

/// Repository abstraction for auth-related persistence.
///
/// Every method is a single independent store call; no method spans a
/// transaction.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// Lookup by already-normalized (lowercase) email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError>;
    /// Fails with [`AuthError::UserExists`] when the email is taken.
    async fn create_user(&self, input: NewUser) -> Result<AuthUser, AuthError>;
    async fn touch_last_login(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<(), AuthError>;

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError>;
    async fn upsert_password(&self, user_id: Uuid, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError>;

    async fn create_session(&self, input: NewSession) -> Result<Session, AuthError>;
    async fn find_session_by_token(&self, token: &str) -> Result<Option<Session>, AuthError>;
    async fn find_session_by_refresh_token(&self, refresh_token: &str) -> Result<Option<Session>, AuthError>;
    /// Overwrite token values and expiry of an existing session, keeping its id.
    /// `None` when the session no longer exists.
    async fn rotate_session(&self, id: Uuid, token: &str, refresh_token: &str, expires_at: DateTime<Utc>) -> Result<Option<Session>, AuthError>;
    /// Returns whether a session was removed.
    async fn delete_session_by_token(&self, token: &str) -> Result<bool, AuthError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::{Mutex, MutexGuard};

    #[derive(Default)]
    pub struct MockAuthRepository {
        users: Mutex<HashMap<Uuid, AuthUser>>,
        creds: Mutex<HashMap<Uuid, Credentials>>,   // key: user_id
        sessions: Mutex<HashMap<Uuid, Session>>,    // key: session id
    }

    fn lock<T>(m: &Mutex<T>) -> Result<MutexGuard<'_, T>, AuthError> {
        m.lock().map_err(|_| AuthError::Repository("mock store lock poisoned".into()))
    }

    impl MockAuthRepository {
        /// Remove a user and their credentials. Their sessions are kept, so a
        /// still-valid token now resolves to no user.
        pub fn remove_user(&self, id: Uuid) -> Result<(), AuthError> {
            lock(&self.users)?.remove(&id);
            lock(&self.creds)?.remove(&id);
            Ok(())
        }

        pub fn session_count(&self) -> Result<usize, AuthError> {
            Ok(lock(&self.sessions)?.len())
        }
    }

    #[async_trait]
    impl AuthRepository for MockAuthRepository {
        async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
            let users = lock(&self.users)?;
            Ok(users.values().find(|u| u.email == email).cloned())
        }

        async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
            Ok(lock(&self.users)?.get(&id).cloned())
        }

        async fn create_user(&self, input: NewUser) -> Result<AuthUser, AuthError> {
            let mut users = lock(&self.users)?;
            if users.values().any(|u| u.email == input.email) {
                return Err(AuthError::UserExists);
            }
            let user = AuthUser {
                id: Uuid::new_v4(),
                name: input.name,
                email: input.email,
                role: input.role,
                phone: input.phone,
                created_at: Utc::now(),
                last_login: None,
            };
            users.insert(user.id, user.clone());
            Ok(user)
        }

        async fn touch_last_login(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<(), AuthError> {
            if let Some(u) = lock(&self.users)?.get_mut(&user_id) {
                u.last_login = Some(at);
            }
            Ok(())
        }

        async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
            Ok(lock(&self.creds)?.get(&user_id).cloned())
        }

        async fn upsert_password(&self, user_id: Uuid, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError> {
            let c = Credentials { user_id, password_hash, password_algorithm };
            lock(&self.creds)?.insert(user_id, c.clone());
            Ok(c)
        }

        async fn create_session(&self, input: NewSession) -> Result<Session, AuthError> {
            let s = Session {
                id: Uuid::new_v4(),
                user_id: input.user_id,
                token: input.token,
                refresh_token: input.refresh_token,
                expires_at: input.expires_at,
                created_at: input.created_at,
            };
            lock(&self.sessions)?.insert(s.id, s.clone());
            Ok(s)
        }

        async fn find_session_by_token(&self, token: &str) -> Result<Option<Session>, AuthError> {
            Ok(lock(&self.sessions)?.values().find(|s| s.token == token).cloned())
        }

        async fn find_session_by_refresh_token(&self, refresh_token: &str) -> Result<Option<Session>, AuthError> {
            Ok(lock(&self.sessions)?.values().find(|s| s.refresh_token == refresh_token).cloned())
        }

        async fn rotate_session(&self, id: Uuid, token: &str, refresh_token: &str, expires_at: DateTime<Utc>) -> Result<Option<Session>, AuthError> {
            let mut sessions = lock(&self.sessions)?;
            Ok(sessions.get_mut(&id).map(|s| {
                s.token = token.to_string();
                s.refresh_token = refresh_token.to_string();
                s.expires_at = expires_at;
                s.clone()
            }))
        }

        async fn delete_session_by_token(&self, token: &str) -> Result<bool, AuthError> {
            let mut sessions = lock(&self.sessions)?;
            let before = sessions.len();
            sessions.retain(|_, s| s.token != token);
            Ok(sessions.len() != before)
        }
    }
}
