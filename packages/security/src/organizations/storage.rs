// ABOUTME: Organization storage layer using SQLite
// ABOUTME: Creates organizations and teams, manages memberships and team access checks

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use super::types::{MembershipLevel, Organization, OrganizationMembership, Team};
use tally_storage::StorageError;

pub struct OrganizationStorage {
    pool: SqlitePool,
}

impl OrganizationStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create_organization(&self, name: &str) -> Result<Organization, StorageError> {
        let org_id = tally_core::new_uuidt().to_string();
        debug!("Creating organization: {} (name: {})", org_id, name);

        sqlx::query("INSERT INTO organizations (id, name, created_at) VALUES (?, ?, ?)")
            .bind(&org_id)
            .bind(name)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        let row = sqlx::query("SELECT * FROM organizations WHERE id = ?")
            .bind(&org_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(Organization {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            created_at: row.try_get("created_at")?,
        })
    }

    pub async fn create_team(&self, organization_id: &str, name: &str) -> Result<Team, StorageError> {
        debug!("Creating team '{}' in organization: {}", name, organization_id);

        let team_id: i64 = sqlx::query_scalar(
            "INSERT INTO teams (organization_id, name, created_at) VALUES (?, ?, ?) RETURNING id",
        )
        .bind(organization_id)
        .bind(name)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        self.get_team(team_id).await
    }

    pub async fn get_team(&self, team_id: i64) -> Result<Team, StorageError> {
        let row = sqlx::query("SELECT * FROM teams WHERE id = ?")
            .bind(team_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(Team {
            id: row.try_get("id")?,
            organization_id: row.try_get("organization_id")?,
            name: row.try_get("name")?,
            created_at: row.try_get("created_at")?,
        })
    }

    pub async fn add_member(
        &self,
        organization_id: &str,
        user_id: &str,
        level: MembershipLevel,
    ) -> Result<OrganizationMembership, StorageError> {
        let membership_id = tally_core::new_uuidt().to_string();
        let created_at = Utc::now();
        debug!(
            "Adding user {} to organization {} as {:?}",
            user_id, organization_id, level
        );

        sqlx::query(
            r#"
            INSERT INTO organization_memberships (id, organization_id, user_id, level, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&membership_id)
        .bind(organization_id)
        .bind(user_id)
        .bind(level as i64)
        .bind(created_at)
        .execute(&self.pool)
        .await?;

        Ok(OrganizationMembership {
            id: membership_id,
            organization_id: organization_id.to_string(),
            user_id: user_id.to_string(),
            level,
            created_at,
        })
    }

    /// Membership level of the user in the organization owning `team_id`, if any
    pub async fn team_membership_level(
        &self,
        user_id: &str,
        team_id: i64,
    ) -> Result<Option<MembershipLevel>, StorageError> {
        let level: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT m.level
            FROM organization_memberships m
            JOIN teams t ON t.organization_id = m.organization_id
            WHERE m.user_id = ? AND t.id = ?
            "#,
        )
        .bind(user_id)
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(level.and_then(MembershipLevel::from_i64))
    }
}
