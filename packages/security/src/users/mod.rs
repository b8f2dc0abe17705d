// ABOUTME: User account management
// ABOUTME: User types and storage, including the current team selection

pub mod storage;
pub mod types;

#[cfg(test)]
mod storage_test;

pub use storage::UserStorage;
pub use types::{User, UserCreateInput};
