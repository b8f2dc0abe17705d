// ABOUTME: Type definitions for personal API key authentication
// ABOUTME: Structures for key generation, storage, and validation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Personal API key stored in database
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalApiKey {
    pub id: String,
    pub user_id: String,
    pub label: String,
    #[serde(skip_serializing)]
    pub secure_value: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
}

/// Key generation result - includes plaintext key for display
/// This is the ONLY time the plaintext key is available
#[derive(Debug, Clone)]
pub struct TokenGeneration {
    pub token: String,      // Plaintext key - show once to user
    pub token_hash: String, // Hash to store in database
    pub id: String,         // Key ID
}

impl TokenGeneration {
    pub fn new(token: String, token_hash: String, id: String) -> Self {
        Self {
            token,
            token_hash,
            id,
        }
    }
}
