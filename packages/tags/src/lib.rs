// ABOUTME: Global tag management system for labelling team objects
// ABOUTME: Provides types and storage layer for tags and tagged items

pub mod storage;
pub mod types;

// Re-export main types
pub use storage::TagStorage;
pub use types::{
    validate_tag_name, Tag, TagCreateInput, TagUpdateInput, TaggedItem, TaggedObject,
    MAX_TAG_NAME_LENGTH,
};
