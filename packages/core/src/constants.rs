// ABOUTME: Well-known paths and names for local Tally data
// ABOUTME: Resolves the Tally directory and the default SQLite database file

use std::env;
use std::path::PathBuf;

/// Default SQLite database file name inside the Tally directory
pub const DATABASE_FILE_NAME: &str = "tally.db";

/// Get the path to the Tally directory (~/.tally)
pub fn tally_dir() -> PathBuf {
    // First try HOME environment variable (useful for tests)
    if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".tally")
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".tally")
    }
}

/// Get the path to the default database file (~/.tally/tally.db)
pub fn database_file() -> PathBuf {
    tally_dir().join(DATABASE_FILE_NAME)
}
