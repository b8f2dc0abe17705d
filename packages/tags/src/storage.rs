// ABOUTME: Tag storage layer using SQLite
// ABOUTME: Team-scoped CRUD for tags and attaching tags to taggable objects

use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::types::{validate_tag_name, Tag, TagCreateInput, TagUpdateInput, TaggedItem, TaggedObject};
use tally_storage::StorageError;

pub struct TagStorage {
    pool: SqlitePool,
}

impl TagStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all tags of a team, ordered by name
    pub async fn list_tags(&self, team_id: i64) -> Result<Vec<Tag>, StorageError> {
        debug!("Fetching tags for team: {}", team_id);

        let rows = sqlx::query("SELECT * FROM tags WHERE team_id = ? ORDER BY name")
            .bind(team_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(|row| self.row_to_tag(row)).collect()
    }

    /// Get a single tag by ID
    pub async fn get_tag(&self, team_id: i64, tag_id: &str) -> Result<Tag, StorageError> {
        debug!("Fetching tag: {}", tag_id);

        let row = sqlx::query("SELECT * FROM tags WHERE id = ? AND team_id = ?")
            .bind(tag_id)
            .bind(team_id)
            .fetch_one(&self.pool)
            .await?;

        self.row_to_tag(&row)
    }

    /// Get a tag by name
    pub async fn get_tag_by_name(&self, team_id: i64, name: &str) -> Result<Option<Tag>, StorageError> {
        debug!("Fetching tag by name: {}", name);

        let row = sqlx::query("SELECT * FROM tags WHERE name = ? AND team_id = ?")
            .bind(name.trim())
            .bind(team_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(r) => Ok(Some(self.row_to_tag(&r)?)),
            None => Ok(None),
        }
    }

    /// Create a new tag; fails with `Duplicate` when the team already has the name
    pub async fn create_tag(&self, team_id: i64, input: TagCreateInput) -> Result<Tag, StorageError> {
        let name = validate_tag_name(&input.name)?;
        let tag_id = tally_core::new_uuidt().to_string();

        debug!("Creating tag: {} (name: {})", tag_id, name);

        sqlx::query("INSERT INTO tags (id, name, team_id) VALUES (?, ?, ?)")
            .bind(&tag_id)
            .bind(&name)
            .bind(team_id)
            .execute(&self.pool)
            .await?;

        Ok(Tag {
            id: tag_id,
            name,
            team_id,
        })
    }

    /// Return the team's tag with this name, creating it if needed
    pub async fn get_or_create_tag(&self, team_id: i64, name: &str) -> Result<Tag, StorageError> {
        let name = validate_tag_name(name)?;

        sqlx::query("INSERT INTO tags (id, name, team_id) VALUES (?, ?, ?) ON CONFLICT (name, team_id) DO NOTHING")
            .bind(tally_core::new_uuidt().to_string())
            .bind(&name)
            .bind(team_id)
            .execute(&self.pool)
            .await?;

        self.get_tag_by_name(team_id, &name)
            .await?
            .ok_or(StorageError::NotFound)
    }

    /// Rename a tag
    pub async fn update_tag(
        &self,
        team_id: i64,
        tag_id: &str,
        input: TagUpdateInput,
    ) -> Result<Tag, StorageError> {
        debug!("Updating tag: {}", tag_id);

        let Some(name) = input.name else {
            return self.get_tag(team_id, tag_id).await;
        };
        let name = validate_tag_name(&name)?;

        let result = sqlx::query("UPDATE tags SET name = ? WHERE id = ? AND team_id = ?")
            .bind(&name)
            .bind(tag_id)
            .bind(team_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        self.get_tag(team_id, tag_id).await
    }

    /// Delete a tag; its tagged items go with it
    pub async fn delete_tag(&self, team_id: i64, tag_id: &str) -> Result<(), StorageError> {
        debug!("Deleting tag: {}", tag_id);

        let result = sqlx::query("DELETE FROM tags WHERE id = ? AND team_id = ?")
            .bind(tag_id)
            .bind(team_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Attach the named tag to an object, creating the tag if needed.
    ///
    /// Tagging an object twice with the same tag returns the existing item.
    pub async fn tag_object(
        &self,
        team_id: i64,
        tag_name: &str,
        object: TaggedObject,
    ) -> Result<TaggedItem, StorageError> {
        self.ensure_object_in_team(team_id, object).await?;
        let tag = self.get_or_create_tag(team_id, tag_name).await?;

        debug!("Tagging {:?} with tag: {}", object, tag.id);

        // Column names come from TaggedObject, never from user input
        let insert = format!(
            "INSERT INTO tagged_items (id, tag_id, {column}) VALUES (?, ?, ?) \
             ON CONFLICT (tag_id, {column}) DO NOTHING",
            column = object.column()
        );
        sqlx::query(&insert)
            .bind(tally_core::new_uuidt().to_string())
            .bind(&tag.id)
            .bind(object.id())
            .execute(&self.pool)
            .await?;

        let select = format!(
            "SELECT id, tag_id FROM tagged_items WHERE tag_id = ? AND {} = ?",
            object.column()
        );
        let row = sqlx::query(&select)
            .bind(&tag.id)
            .bind(object.id())
            .fetch_one(&self.pool)
            .await?;

        Ok(TaggedItem {
            id: row.try_get("id")?,
            tag_id: row.try_get("tag_id")?,
            object,
        })
    }

    /// Detach a tag from an object
    pub async fn untag_object(
        &self,
        team_id: i64,
        tag_id: &str,
        object: TaggedObject,
    ) -> Result<(), StorageError> {
        debug!("Removing tag {} from {:?}", tag_id, object);

        let delete = format!(
            "DELETE FROM tagged_items WHERE {} = ? AND tag_id IN (SELECT id FROM tags WHERE id = ? AND team_id = ?)",
            object.column()
        );
        let result = sqlx::query(&delete)
            .bind(object.id())
            .bind(tag_id)
            .bind(team_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Tags attached to an object, ordered by name
    pub async fn list_tags_for_object(
        &self,
        team_id: i64,
        object: TaggedObject,
    ) -> Result<Vec<Tag>, StorageError> {
        let query = format!(
            "SELECT t.* FROM tags t JOIN tagged_items ti ON ti.tag_id = t.id \
             WHERE t.team_id = ? AND ti.{} = ? ORDER BY t.name",
            object.column()
        );
        let rows = sqlx::query(&query)
            .bind(team_id)
            .bind(object.id())
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(|row| self.row_to_tag(row)).collect()
    }

    /// Items carrying a tag
    pub async fn list_tagged_items(
        &self,
        team_id: i64,
        tag_id: &str,
    ) -> Result<Vec<TaggedItem>, StorageError> {
        let rows = sqlx::query(
            r#"
            SELECT ti.id, ti.tag_id, ti.action_id
            FROM tagged_items ti
            JOIN tags t ON t.id = ti.tag_id
            WHERE t.id = ? AND t.team_id = ?
            ORDER BY ti.id
            "#,
        )
        .bind(tag_id)
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(|row| self.row_to_tagged_item(row)).collect()
    }

    /// Objects from another team, or soft-deleted ones, cannot be tagged
    async fn ensure_object_in_team(&self, team_id: i64, object: TaggedObject) -> Result<(), StorageError> {
        let query = format!(
            "SELECT COUNT(*) FROM {} WHERE id = ? AND team_id = ? AND deleted = 0",
            object.table()
        );
        let count: i64 = sqlx::query_scalar(&query)
            .bind(object.id())
            .bind(team_id)
            .fetch_one(&self.pool)
            .await?;

        if count == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    /// Convert a database row to a Tag
    fn row_to_tag(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Tag, StorageError> {
        Ok(Tag {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            team_id: row.try_get("team_id")?,
        })
    }

    fn row_to_tagged_item(&self, row: &sqlx::sqlite::SqliteRow) -> Result<TaggedItem, StorageError> {
        let action_id: Option<i64> = row.try_get("action_id")?;
        let object = match action_id {
            Some(id) => TaggedObject::Action(id),
            None => {
                return Err(StorageError::Database(
                    "Tagged item has no related object".to_string(),
                ))
            }
        };

        Ok(TaggedItem {
            id: row.try_get("id")?,
            tag_id: row.try_get("tag_id")?,
            object,
        })
    }
}
