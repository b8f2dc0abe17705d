// ABOUTME: Administration commands behind the tally binary
// ABOUTME: Account bootstrap, personal API keys and dry runs of the ingestion policies

use std::sync::Arc;

use sqlx::SqlitePool;
use tracing::info;

use tally_config::IngestionSettings;
use tally_ingestion::{PartitionKeyRouter, ReplayEventPolicy, ReplayRejection};
use tally_security::{MembershipLevel, OrganizationStorage, TokenStorage, UserCreateInput, UserStorage};
use tally_storage::StorageError;

/// What `bootstrap` created; the key is only ever shown here
#[derive(Debug, Clone)]
pub struct BootstrapOutput {
    pub organization_id: String,
    pub team_id: i64,
    pub user_id: String,
    pub api_key: String,
}

/// Create an organization with one team and an owner whose current team it is
pub async fn bootstrap(
    pool: &SqlitePool,
    organization: &str,
    team: &str,
    email: &str,
    name: &str,
) -> Result<BootstrapOutput, StorageError> {
    let organizations = OrganizationStorage::new(pool.clone());
    let users = UserStorage::new(pool.clone());

    let org = organizations.create_organization(organization).await?;
    let team = organizations.create_team(&org.id, team).await?;
    let user = users
        .create_user(UserCreateInput {
            email: email.to_string(),
            name: name.to_string(),
        })
        .await?;
    organizations
        .add_member(&org.id, &user.id, MembershipLevel::Owner)
        .await?;
    users.set_current_team(&user.id, Some(team.id)).await?;

    let api_key = create_api_key(pool, &user.id, "bootstrap").await?;
    info!("Bootstrapped organization {} with team {}", org.id, team.id);

    Ok(BootstrapOutput {
        organization_id: org.id,
        team_id: team.id,
        user_id: user.id,
        api_key,
    })
}

/// Issue a personal API key for an existing user and return its plaintext value
pub async fn create_api_key(pool: &SqlitePool, user_id: &str, label: &str) -> Result<String, StorageError> {
    // Fails with NotFound for unknown users
    UserStorage::new(pool.clone()).get_user(user_id).await?;

    let generated = TokenStorage::new(pool.clone()).create_token(user_id, label).await?;
    Ok(generated.token)
}

/// Route `events` consecutive events for one distinct id and return each chosen key
pub fn route_events(
    settings: Arc<IngestionSettings>,
    team_id: i64,
    distinct_id: &str,
    events: usize,
) -> Vec<Option<String>> {
    let router = PartitionKeyRouter::new(settings);
    (0..events).map(|_| router.route(team_id, distinct_id)).collect()
}

/// Check a replay payload of `size` bytes against the configured policy
pub fn check_replay_event(
    settings: Arc<IngestionSettings>,
    size: usize,
    v1: bool,
) -> Result<(), ReplayRejection> {
    ReplayEventPolicy::new(settings).check(size, v1)
}
