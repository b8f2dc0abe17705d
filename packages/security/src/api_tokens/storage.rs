// ABOUTME: Storage operations for personal API keys
// ABOUTME: Key generation, hashing, verification, and database operations

use base64::Engine;
use chrono::Utc;
use rand::Rng;
use sha2::{Digest, Sha256};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use super::types::{PersonalApiKey, TokenGeneration};
use tally_storage::StorageError;

/// Prefix that makes leaked keys easy to recognise in logs and secret scanners
pub const TOKEN_PREFIX: &str = "tly_";

pub struct TokenStorage {
    pool: SqlitePool,
}

impl TokenStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Generate a cryptographically secure random key
    /// Returns the prefix followed by a base64-encoded 32-byte value
    pub fn generate_token() -> String {
        let mut rng = rand::thread_rng();
        let random_bytes: [u8; 32] = rng.gen();
        format!(
            "{}{}",
            TOKEN_PREFIX,
            base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(random_bytes)
        )
    }

    /// Hash a key using SHA-256
    /// This is what gets stored in the database
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Verify a key against a stored hash using constant-time comparison
    pub fn verify_token_hash(token: &str, stored_hash: &str) -> bool {
        use subtle::ConstantTimeEq;

        let computed_hash = Self::hash_token(token);
        computed_hash
            .as_bytes()
            .ct_eq(stored_hash.as_bytes())
            .into()
    }

    /// Create a new personal API key for a user
    pub async fn create_token(
        &self,
        user_id: &str,
        label: &str,
    ) -> Result<TokenGeneration, StorageError> {
        let id = tally_core::new_uuidt().to_string();
        let token = Self::generate_token();
        let token_hash = Self::hash_token(&token);

        debug!("Creating personal API key {} for user: {}", id, user_id);

        sqlx::query(
            "INSERT INTO personal_api_keys (id, user_id, label, secure_value, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(user_id)
        .bind(label)
        .bind(&token_hash)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(TokenGeneration::new(token, token_hash, id))
    }

    /// Verify a key and return the key record if valid
    pub async fn verify_token(&self, token: &str) -> Result<Option<PersonalApiKey>, StorageError> {
        let token_hash = Self::hash_token(token);

        let row = sqlx::query(
            "SELECT id, user_id, label, secure_value, created_at, last_used_at
             FROM personal_api_keys
             WHERE secure_value = ?",
        )
        .bind(&token_hash)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => {
                let key = self.row_to_key(&row)?;

                // Double-check with constant-time comparison
                if Self::verify_token_hash(token, &key.secure_value) {
                    Ok(Some(key))
                } else {
                    Ok(None)
                }
            }
            None => Ok(None),
        }
    }

    /// Update the last_used_at timestamp for a key
    pub async fn update_last_used(&self, token_hash: &str) -> Result<(), StorageError> {
        sqlx::query("UPDATE personal_api_keys SET last_used_at = ? WHERE secure_value = ?")
            .bind(Utc::now())
            .bind(token_hash)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Delete a key so it can no longer authenticate
    pub async fn revoke_token(&self, id: &str) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM personal_api_keys WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    fn row_to_key(&self, row: &sqlx::sqlite::SqliteRow) -> Result<PersonalApiKey, StorageError> {
        Ok(PersonalApiKey {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            label: row.try_get("label")?,
            secure_value: row.try_get("secure_value")?,
            created_at: row.try_get("created_at")?,
            last_used_at: row.try_get("last_used_at")?,
        })
    }
}
