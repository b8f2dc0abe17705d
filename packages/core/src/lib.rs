// ABOUTME: Core types and utilities for Tally
// ABOUTME: Foundational package providing shared functionality across all Tally packages

pub mod constants;
pub mod utils;

// Re-export constants
pub use constants::{database_file, tally_dir, DATABASE_FILE_NAME};

// Re-export utilities
pub use utils::{new_uuidt, truncate};
