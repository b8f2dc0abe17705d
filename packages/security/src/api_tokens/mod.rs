// ABOUTME: Personal API key authentication
// ABOUTME: Token generation, hashing and verification bound to a user

pub mod storage;
pub mod types;

pub use storage::TokenStorage;
pub use types::{PersonalApiKey, TokenGeneration};
