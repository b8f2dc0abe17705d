// ABOUTME: Users, organizations, and authentication functionality for Tally
// ABOUTME: Provides personal API key management and team membership checks

pub mod api_tokens;
pub mod organizations;
pub mod users;

// Re-export main types for convenience
pub use api_tokens::{PersonalApiKey, TokenGeneration, TokenStorage};
pub use organizations::{
    MembershipLevel, Organization, OrganizationMembership, OrganizationStorage, Team,
};
pub use users::{User, UserCreateInput, UserStorage};
