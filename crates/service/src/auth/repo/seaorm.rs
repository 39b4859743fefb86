use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

use models::errors::ModelError;
use crate::auth::domain::{AuthUser, Credentials, NewSession, NewUser, Role, Session};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;

pub struct SeaOrmAuthRepository {
    pub db: DatabaseConnection,
}

fn repo_err(e: ModelError) -> AuthError {
    AuthError::Repository(e.to_string())
}

fn to_user(u: models::user::Model) -> Result<AuthUser, AuthError> {
    let role: Role = u
        .role
        .parse()
        .map_err(|_| AuthError::Repository(format!("user {} has unknown role {}", u.id, u.role)))?;
    Ok(AuthUser {
        id: u.id,
        name: u.name,
        email: u.email,
        role,
        phone: u.phone,
        created_at: u.created_at.with_timezone(&Utc),
        last_login: u.last_login.map(|t| t.with_timezone(&Utc)),
    })
}

fn to_session(s: models::session::Model) -> Session {
    Session {
        id: s.id,
        user_id: s.user_id,
        token: s.token,
        refresh_token: s.refresh_token,
        expires_at: s.expires_at.with_timezone(&Utc),
        created_at: s.created_at.with_timezone(&Utc),
    }
}

fn to_credentials(c: models::user_credentials::Model) -> Credentials {
    Credentials { user_id: c.user_id, password_hash: c.password_hash, password_algorithm: c.password_algorithm }
}

#[async_trait::async_trait]
impl AuthRepository for SeaOrmAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        models::user::find_by_email(&self.db, email)
            .await
            .map_err(repo_err)?
            .map(to_user)
            .transpose()
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
        models::user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?
            .map(to_user)
            .transpose()
    }

    async fn create_user(&self, input: NewUser) -> Result<AuthUser, AuthError> {
        let created = models::user::create(
            &self.db,
            models::user::NewUser {
                name: &input.name,
                email: &input.email,
                role: input.role.as_str(),
                phone: input.phone.as_deref(),
            },
        )
        .await
        .map_err(|e| match e {
            ModelError::Conflict(_) => AuthError::UserExists,
            ModelError::Validation(msg) => AuthError::Validation(msg),
            other => repo_err(other),
        })?;
        to_user(created)
    }

    async fn touch_last_login(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<(), AuthError> {
        models::user::touch_last_login(&self.db, user_id, at).await.map_err(repo_err)
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        let res = models::user_credentials::find_by_user(&self.db, user_id).await.map_err(repo_err)?;
        Ok(res.map(to_credentials))
    }

    async fn upsert_password(&self, user_id: Uuid, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError> {
        let c = models::user_credentials::upsert_password(&self.db, user_id, password_hash, &password_algorithm)
            .await
            .map_err(repo_err)?;
        Ok(to_credentials(c))
    }

    async fn create_session(&self, input: NewSession) -> Result<Session, AuthError> {
        let s = models::session::create(
            &self.db,
            input.user_id,
            &input.token,
            &input.refresh_token,
            input.expires_at,
            input.created_at,
        )
        .await
        .map_err(repo_err)?;
        Ok(to_session(s))
    }

    async fn find_session_by_token(&self, token: &str) -> Result<Option<Session>, AuthError> {
        let s = models::session::find_by_token(&self.db, token).await.map_err(repo_err)?;
        Ok(s.map(to_session))
    }

    async fn find_session_by_refresh_token(&self, refresh_token: &str) -> Result<Option<Session>, AuthError> {
        let s = models::session::find_by_refresh_token(&self.db, refresh_token).await.map_err(repo_err)?;
        Ok(s.map(to_session))
    }

    async fn rotate_session(&self, id: Uuid, token: &str, refresh_token: &str, expires_at: DateTime<Utc>) -> Result<Option<Session>, AuthError> {
        let s = models::session::rotate(&self.db, id, token, refresh_token, expires_at).await.map_err(repo_err)?;
        Ok(s.map(to_session))
    }

    async fn delete_session_by_token(&self, token: &str) -> Result<bool, AuthError> {
        models::session::delete_by_token(&self.db, token).await.map_err(repo_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use chrono::Duration;

    fn new_user(email: &str) -> NewUser {
        NewUser { name: "Front Desk".into(), email: email.into(), role: Role::Receptionist, phone: Some("555-0100".into()) }
    }

    #[tokio::test]
    async fn user_round_trip_and_conflict() -> Result<(), anyhow::Error> {
        let repo = SeaOrmAuthRepository { db: get_db().await? };
        let u = repo.create_user(new_user("desk@hotel.com")).await?;
        assert_eq!(u.role, Role::Receptionist);
        assert_eq!(repo.find_user_by_email("desk@hotel.com").await?.unwrap().id, u.id);
        assert_eq!(repo.find_user_by_id(u.id).await?.unwrap().email, "desk@hotel.com");
        assert!(matches!(repo.create_user(new_user("desk@hotel.com")).await, Err(AuthError::UserExists)));
        Ok(())
    }

    #[tokio::test]
    async fn sessions_rotate_in_place() -> Result<(), anyhow::Error> {
        let repo = SeaOrmAuthRepository { db: get_db().await? };
        let u = repo.create_user(new_user("night@hotel.com")).await?;
        let now = Utc::now();
        let s = repo
            .create_session(NewSession { user_id: u.id, token: "a1".into(), refresh_token: "r1".into(), expires_at: now + Duration::hours(1), created_at: now })
            .await?;
        let rotated = repo.rotate_session(s.id, "a2", "r2", now + Duration::hours(2)).await?.unwrap();
        assert_eq!(rotated.id, s.id);
        assert!(repo.find_session_by_refresh_token("r1").await?.is_none());
        assert_eq!(repo.find_session_by_token("a2").await?.unwrap().user_id, u.id);
        assert!(repo.delete_session_by_token("a2").await?);
        assert!(!repo.delete_session_by_token("a2").await?);
        Ok(())
    }
}
