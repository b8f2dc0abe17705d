// ABOUTME: User storage layer using SQLite
// ABOUTME: Handles user creation, lookup and current team selection

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use super::types::{User, UserCreateInput};
use tally_storage::StorageError;

pub struct UserStorage {
    pool: SqlitePool,
}

impl UserStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_user(&self, input: UserCreateInput) -> Result<User, StorageError> {
        let user_id = tally_core::new_uuidt().to_string();
        let email = input.email.trim().to_lowercase();

        if email.is_empty() || !email.contains('@') {
            return Err(StorageError::Validation(format!(
                "Invalid email address: '{}'",
                input.email
            )));
        }

        debug!("Creating user: {} ({})", user_id, email);

        sqlx::query("INSERT INTO users (id, email, name, created_at) VALUES (?, ?, ?, ?)")
            .bind(&user_id)
            .bind(&email)
            .bind(input.name.trim())
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        self.get_user(&user_id).await
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User, StorageError> {
        debug!("Fetching user: {}", user_id);

        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        self.row_to_user(&row)
    }

    /// Switch the user's current team, or clear it with `None`
    pub async fn set_current_team(
        &self,
        user_id: &str,
        team_id: Option<i64>,
    ) -> Result<User, StorageError> {
        debug!("Setting current team {:?} for user: {}", team_id, user_id);

        let result = sqlx::query("UPDATE users SET current_team_id = ? WHERE id = ?")
            .bind(team_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        self.get_user(user_id).await
    }

    fn row_to_user(&self, row: &sqlx::sqlite::SqliteRow) -> Result<User, StorageError> {
        Ok(User {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            current_team_id: row.try_get("current_team_id")?,
            created_at: row.try_get("created_at")?,
        })
    }
}
