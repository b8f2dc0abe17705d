// ABOUTME: Organization and team type definitions
// ABOUTME: Structures for tenants and the users that belong to them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    pub id: i64,
    pub organization_id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipLevel {
    Member = 1,
    Admin = 8,
    Owner = 15,
}

impl MembershipLevel {
    pub fn from_i64(level: i64) -> Option<Self> {
        match level {
            1 => Some(MembershipLevel::Member),
            8 => Some(MembershipLevel::Admin),
            15 => Some(MembershipLevel::Owner),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationMembership {
    pub id: String,
    pub organization_id: String,
    pub user_id: String,
    pub level: MembershipLevel,
    pub created_at: DateTime<Utc>,
}
