// ABOUTME: External data source storage layer using SQLite
// ABOUTME: Team-scoped persistence with the creator's profile joined into every read

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::types::{CreatedBy, ExternalDataSource, NewExternalDataSource};
use tally_storage::StorageError;

const SELECT_SOURCES: &str = r#"
    SELECT
        s.id, s.source_id, s.connection_id, s.team_id, s.status, s.source_type, s.created_at,
        u.id AS creator_id, u.email AS creator_email, u.name AS creator_name
    FROM external_data_sources s
    LEFT JOIN users u ON u.id = s.created_by_id
"#;

#[derive(Clone)]
pub struct ExternalDataSourceStorage {
    pool: SqlitePool,
}

impl ExternalDataSourceStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: NewExternalDataSource) -> Result<ExternalDataSource, StorageError> {
        let id = tally_core::new_uuidt().to_string();
        debug!(
            "Creating external data source: {} (source: {}, team: {})",
            id, input.source_id, input.team_id
        );

        sqlx::query(
            r#"
            INSERT INTO external_data_sources
                (id, source_id, connection_id, team_id, status, source_type, created_by_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&input.source_id)
        .bind(&input.connection_id)
        .bind(input.team_id)
        .bind(&input.status)
        .bind(input.source_type.as_str())
        .bind(&input.created_by_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        self.get(input.team_id, &id).await
    }

    /// Sources of a team, newest first, optionally filtered by a `source_id` substring
    pub async fn list_for_team(
        &self,
        team_id: i64,
        search: Option<&str>,
    ) -> Result<Vec<ExternalDataSource>, StorageError> {
        debug!("Listing external data sources for team: {}", team_id);

        let search = search.map(str::trim).filter(|s| !s.is_empty());
        let query = match search {
            Some(_) => format!(
                "{} WHERE s.team_id = ? AND s.source_id LIKE ? ESCAPE '\\' ORDER BY s.created_at DESC, s.id DESC",
                SELECT_SOURCES
            ),
            None => format!(
                "{} WHERE s.team_id = ? ORDER BY s.created_at DESC, s.id DESC",
                SELECT_SOURCES
            ),
        };

        let mut q = sqlx::query(&query).bind(team_id);
        if let Some(term) = search {
            q = q.bind(format!("%{}%", escape_like(term)));
        }

        let rows = q.fetch_all(&self.pool).await?;
        rows.iter().map(row_to_source).collect()
    }

    pub async fn get(&self, team_id: i64, id: &str) -> Result<ExternalDataSource, StorageError> {
        let query = format!("{} WHERE s.id = ? AND s.team_id = ?", SELECT_SOURCES);
        let row = sqlx::query(&query)
            .bind(id)
            .bind(team_id)
            .fetch_one(&self.pool)
            .await?;

        row_to_source(&row)
    }

    pub async fn delete(&self, team_id: i64, id: &str) -> Result<(), StorageError> {
        debug!("Deleting external data source: {}", id);

        let result = sqlx::query("DELETE FROM external_data_sources WHERE id = ? AND team_id = ?")
            .bind(id)
            .bind(team_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

fn row_to_source(row: &sqlx::sqlite::SqliteRow) -> Result<ExternalDataSource, StorageError> {
    let creator_id: Option<String> = row.try_get("creator_id")?;
    let created_by = match creator_id {
        Some(id) => Some(CreatedBy {
            id,
            email: row.try_get("creator_email")?,
            name: row.try_get("creator_name")?,
        }),
        None => None,
    };

    Ok(ExternalDataSource {
        id: row.try_get("id")?,
        source_id: row.try_get("source_id")?,
        connection_id: row.try_get("connection_id")?,
        team_id: row.try_get("team_id")?,
        status: row.try_get("status")?,
        source_type: row.try_get("source_type")?,
        created_by,
        created_at: row.try_get("created_at")?,
    })
}
