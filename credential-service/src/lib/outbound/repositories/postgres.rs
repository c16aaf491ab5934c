use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::credential::errors::UserStoreError;
use crate::credential::models::RefreshToken;
use crate::credential::models::UserId;
use crate::credential::models::UserRecord;
use crate::credential::models::Username;
use crate::credential::ports::UserStore;

const USERNAME_UNIQUE_CONSTRAINT: &str = "users_username_key";

pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    password_hash: String,
    refresh_token: Option<String>,
    refresh_token_expiry: Option<DateTime<Utc>>,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = UserStoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let username = Username::new(row.username)
            .map_err(|e| UserStoreError::CorruptRecord(format!("user {}: {}", row.id, e)))?;

        let refresh_token = match (row.refresh_token, row.refresh_token_expiry) {
            (Some(value), Some(expires_at)) => Some(RefreshToken { value, expires_at }),
            (None, None) => None,
            _ => {
                return Err(UserStoreError::CorruptRecord(format!(
                    "user {}: refresh token and expiry must be set together",
                    row.id
                )))
            }
        };

        Ok(UserRecord {
            id: UserId(row.id),
            username,
            password_hash: row.password_hash,
            refresh_token,
        })
    }
}

fn database_error(e: sqlx::Error) -> UserStoreError {
    UserStoreError::Database(e.to_string())
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRecord>, UserStoreError> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, refresh_token, refresh_token_expiry
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?
        .map(UserRecord::try_from)
        .transpose()
    }

    async fn find_by_refresh_token(
        &self,
        token: &str,
    ) -> Result<Option<UserRecord>, UserStoreError> {
        sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, password_hash, refresh_token, refresh_token_expiry
            FROM users
            WHERE refresh_token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?
        .map(UserRecord::try_from)
        .transpose()
    }

    async fn save(&self, record: &UserRecord) -> Result<(), UserStoreError> {
        let (refresh_token, refresh_token_expiry) = match &record.refresh_token {
            Some(token) => (Some(token.value.as_str()), Some(token.expires_at)),
            None => (None, None),
        };

        sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, refresh_token, refresh_token_expiry)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET username = EXCLUDED.username,
                password_hash = EXCLUDED.password_hash,
                refresh_token = EXCLUDED.refresh_token,
                refresh_token_expiry = EXCLUDED.refresh_token_expiry
            "#,
        )
        .bind(record.id.0)
        .bind(record.username.as_str())
        .bind(&record.password_hash)
        .bind(refresh_token)
        .bind(refresh_token_expiry)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some(USERNAME_UNIQUE_CONSTRAINT)
                {
                    return UserStoreError::DuplicateUsername(record.username.to_string());
                }
            }
            database_error(e)
        })?;

        Ok(())
    }

    async fn rotate_refresh_token(
        &self,
        user_id: &UserId,
        presented: &str,
        replacement: &RefreshToken,
    ) -> Result<bool, UserStoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET refresh_token = $3, refresh_token_expiry = $4
            WHERE id = $1 AND refresh_token = $2
            "#,
        )
        .bind(user_id.0)
        .bind(presented)
        .bind(&replacement.value)
        .bind(replacement.expires_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        Ok(result.rows_affected() == 1)
    }
}
