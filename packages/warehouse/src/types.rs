// ABOUTME: External data source type definitions
// ABOUTME: Persisted source records, their creator summary, and the create request body

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status recorded when the initial sync is triggered
pub const STATUS_RUNNING: &str = "running";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceType {
    Stripe,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Stripe => "Stripe",
        }
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Basic profile of the user who created a source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedBy {
    pub id: String,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExternalDataSource {
    pub id: String,
    pub source_id: String,
    pub connection_id: String,
    pub team_id: i64,
    pub status: String,
    pub source_type: String,
    pub created_by: Option<CreatedBy>,
    pub created_at: DateTime<Utc>,
}

/// Fields needed to persist a newly provisioned source
#[derive(Debug, Clone)]
pub struct NewExternalDataSource {
    pub source_id: String,
    pub connection_id: String,
    pub team_id: i64,
    pub status: String,
    pub source_type: SourceType,
    pub created_by_id: Option<String>,
}

/// Credentials submitted when creating a Stripe source
#[derive(Debug, Clone, Deserialize)]
pub struct StripeSourceInput {
    pub account_id: String,
    pub client_secret: String,
}

impl StripeSourceInput {
    /// Both fields are required and must be non-blank
    pub fn validate(&self) -> Result<(), String> {
        if self.account_id.trim().is_empty() {
            return Err("account_id is required".to_string());
        }
        if self.client_secret.trim().is_empty() {
            return Err("client_secret is required".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_type_display() {
        assert_eq!(SourceType::Stripe.to_string(), "Stripe");
    }

    #[test]
    fn test_stripe_input_validation() {
        let valid = StripeSourceInput {
            account_id: "acct_123".to_string(),
            client_secret: "sk_test".to_string(),
        };
        assert!(valid.validate().is_ok());

        let missing_secret = StripeSourceInput {
            client_secret: "  ".to_string(),
            ..valid.clone()
        };
        assert_eq!(
            missing_secret.validate().unwrap_err(),
            "client_secret is required"
        );
    }
}
