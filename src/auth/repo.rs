use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};
use time::OffsetDateTime;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_OWNER: &str = "owner";
pub const ROLE_CUSTOMER: &str = "customer";

pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_INACTIVE: &str = "inactive";
pub const STATUS_SUSPENDED: &str = "suspended";

pub const PURPOSE_EMAIL_VERIFICATION: &str = "email_verification";

const USER_COLUMNS: &str = "id, first_name, last_name, email, password_hash, is_superuser, role, \
     status, email_verified, avatar_key, joined_at, last_login_at, verified_at";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_superuser: bool,
    pub role: String,
    pub status: String,
    pub email_verified: bool,
    pub avatar_key: Option<String>,
    pub joined_at: OffsetDateTime,
    pub last_login_at: Option<OffsetDateTime>,
    pub verified_at: Option<OffsetDateTime>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

pub struct NewUser<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub is_superuser: bool,
    pub role: &'a str,
    pub status: &'a str,
    pub email_verified: bool,
}

impl User {
    pub async fn find_by_email<'e>(
        db: impl PgExecutor<'e>,
        email: &str,
    ) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE lower(email) = lower($1)"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id<'e>(db: impl PgExecutor<'e>, id: i64) -> anyhow::Result<Option<User>> {
        let user =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(db)
                .await?;
        Ok(user)
    }

    pub async fn create<'e>(db: impl PgExecutor<'e>, new: NewUser<'_>) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users \
             (first_name, last_name, email, password_hash, is_superuser, role, status, email_verified) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {USER_COLUMNS}"
        ))
        .bind(new.first_name)
        .bind(new.last_name)
        .bind(new.email)
        .bind(new.password_hash)
        .bind(new.is_superuser)
        .bind(new.role)
        .bind(new.status)
        .bind(new.email_verified)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    pub async fn record_login<'e>(db: impl PgExecutor<'e>, id: i64) -> anyhow::Result<()> {
        sqlx::query("UPDATE users SET last_login_at = now() WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }

    /// Flips the user to active/verified. Runs inside the verification
    /// transaction together with the token's used-at update.
    pub async fn mark_verified<'e>(db: impl PgExecutor<'e>, id: i64) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE users SET email_verified = TRUE, verified_at = now(), status = $1 \
             WHERE id = $2",
        )
        .bind(STATUS_ACTIVE)
        .bind(id)
        .execute(db)
        .await?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OwnerProfile {
    pub id: i64,
    pub user_id: i64,
    pub phone_number: String,
    pub company_name: Option<String>,
    pub website: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl OwnerProfile {
    pub async fn create<'e>(
        db: impl PgExecutor<'e>,
        user_id: i64,
        phone_number: &str,
    ) -> anyhow::Result<OwnerProfile> {
        let profile = sqlx::query_as::<_, OwnerProfile>(
            "INSERT INTO owner_profiles (user_id, phone_number) VALUES ($1, $2) \
             RETURNING id, user_id, phone_number, company_name, website, created_at, updated_at",
        )
        .bind(user_id)
        .bind(phone_number)
        .fetch_one(db)
        .await?;
        Ok(profile)
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct VerificationToken {
    pub id: i64,
    pub user_id: i64,
    pub token_hash: String,
    pub purpose: String,
    pub expires_at: OffsetDateTime,
    pub used_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
}

impl VerificationToken {
    pub fn is_expired(&self) -> bool {
        self.expires_at < OffsetDateTime::now_utc()
    }

    pub fn is_used(&self) -> bool {
        self.used_at.is_some()
    }

    pub async fn insert<'e>(
        db: impl PgExecutor<'e>,
        user_id: i64,
        token_hash: &str,
        purpose: &str,
        expires_at: OffsetDateTime,
    ) -> anyhow::Result<VerificationToken> {
        let token = sqlx::query_as::<_, VerificationToken>(
            "INSERT INTO verification_tokens (user_id, token_hash, purpose, expires_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, user_id, token_hash, purpose, expires_at, used_at, created_at",
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(purpose)
        .bind(expires_at)
        .fetch_one(db)
        .await?;
        Ok(token)
    }

    pub async fn find_by_hash<'e>(
        db: impl PgExecutor<'e>,
        token_hash: &str,
        purpose: &str,
    ) -> anyhow::Result<Option<VerificationToken>> {
        let token = sqlx::query_as::<_, VerificationToken>(
            "SELECT id, user_id, token_hash, purpose, expires_at, used_at, created_at \
             FROM verification_tokens WHERE token_hash = $1 AND purpose = $2",
        )
        .bind(token_hash)
        .bind(purpose)
        .fetch_optional(db)
        .await?;
        Ok(token)
    }

    /// Removes the user's unused, unexpired tokens for a purpose, so only the
    /// most recently issued link stays valid.
    pub async fn delete_active_for<'e>(
        db: impl PgExecutor<'e>,
        user_id: i64,
        purpose: &str,
    ) -> anyhow::Result<()> {
        sqlx::query(
            "DELETE FROM verification_tokens \
             WHERE user_id = $1 AND purpose = $2 AND used_at IS NULL AND expires_at > now()",
        )
        .bind(user_id)
        .bind(purpose)
        .execute(db)
        .await?;
        Ok(())
    }

    pub async fn mark_used<'e>(db: impl PgExecutor<'e>, id: i64) -> anyhow::Result<()> {
        sqlx::query("UPDATE verification_tokens SET used_at = now() WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }
}
