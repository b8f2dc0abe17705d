// ABOUTME: Tag type definitions
// ABOUTME: Tags, tagged items, and the union of objects that can carry a tag

use serde::{Deserialize, Serialize};
use tally_storage::StorageError;

pub const MAX_TAG_NAME_LENGTH: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub team_id: i64,
}

/// An object that can carry tags.
///
/// Each variant maps to one nullable reference column on `tagged_items`; the
/// `exactly_one_related_object` check constraint ensures a row sets exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "lowercase")]
pub enum TaggedObject {
    Action(i64),
}

impl TaggedObject {
    /// Reference column on `tagged_items`
    pub fn column(&self) -> &'static str {
        match self {
            TaggedObject::Action(_) => "action_id",
        }
    }

    /// Table holding the referenced object
    pub fn table(&self) -> &'static str {
        match self {
            TaggedObject::Action(_) => "actions",
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            TaggedObject::Action(id) => *id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedItem {
    pub id: String,
    pub tag_id: String,
    pub object: TaggedObject,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagCreateInput {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagUpdateInput {
    pub name: Option<String>,
}

/// Trim a tag name and check it fits the column
pub fn validate_tag_name(name: &str) -> Result<String, StorageError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(StorageError::Validation("Tag name cannot be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_TAG_NAME_LENGTH {
        return Err(StorageError::Validation(format!(
            "Tag name cannot exceed {} characters",
            MAX_TAG_NAME_LENGTH
        )));
    }

    Ok(trimmed.to_string())
}
