// ABOUTME: Organizations, teams and membership
// ABOUTME: Teams are the tenant boundary; membership is granted per organization

pub mod storage;
pub mod types;

pub use storage::OrganizationStorage;
pub use types::{MembershipLevel, Organization, OrganizationMembership, Team};
