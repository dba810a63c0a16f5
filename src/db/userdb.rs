// db/userdb.rs
use async_trait::async_trait;
use sqlx::{Error, Postgres, Transaction};
use uuid::Uuid;

use super::db::DBClient;
use crate::models::usermodel::{ActorRole, ApplicationStatus, ProviderProfile, User, UserRole};

const USER_COLUMNS: &str = r#"
    id, name, email, phone, photo_key, role, created_at, updated_at
"#;

pub const PROVIDER_COLUMNS: &str = r#"
    id, user_id, display_name, specialties, experience_years, description,
    average_rating, photo_key, application_status, applied_at, approved_at
"#;

#[async_trait]
pub trait UserExt {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, Error>;

    /// Authoritative role lookup: one query pair instead of probing optional
    /// relations. A user with an approved provider profile is a provider; the
    /// role column settles clients and admins.
    async fn get_actor_role(&self, user_id: Uuid) -> Result<Option<ActorRole>, Error>;

    async fn set_user_role_tx(
        &self,
        user_id: Uuid,
        role: UserRole,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<User, Error>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS}
            FROM users
            WHERE id = $1
            "#
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn get_actor_role(&self, user_id: Uuid) -> Result<Option<ActorRole>, Error> {
        let user = match self.get_user(user_id).await? {
            Some(user) => user,
            None => return Ok(None),
        };

        if user.role == UserRole::Admin {
            return Ok(Some(ActorRole::Admin));
        }

        let profile = sqlx::query_as::<_, ProviderProfile>(&format!(
            r#"
            SELECT {PROVIDER_COLUMNS}
            FROM provider_profiles
            WHERE user_id = $1
            "#
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match profile {
            Some(profile) if profile.application_status == ApplicationStatus::Approved => {
                Ok(Some(ActorRole::Provider(profile)))
            }
            _ => Ok(Some(ActorRole::Client)),
        }
    }

    async fn set_user_role_tx(
        &self,
        user_id: Uuid,
        role: UserRole,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<User, Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET role = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(user_id)
        .bind(role)
        .fetch_one(&mut **tx)
        .await
    }
}
