use std::sync::Arc;

use tempfile::TempDir;

use tally_config::IngestionSettings;
use tally_ingestion::ReplayRejection;
use tally_security::{OrganizationStorage, TokenStorage, UserStorage};
use tally_storage::StorageError;

use crate::commands::{bootstrap, check_replay_event, create_api_key, route_events};

#[tokio::test]
async fn test_bootstrap_creates_owner_with_working_key() {
    let temp_dir = TempDir::new().unwrap();
    let pool = tally_storage::connect(Some(temp_dir.path().join("tally.db")))
        .await
        .unwrap();

    let output = bootstrap(&pool, "Acme", "Web", "Owner@Example.com", "Owner")
        .await
        .unwrap();

    let user = UserStorage::new(pool.clone()).get_user(&output.user_id).await.unwrap();
    assert_eq!(user.email, "owner@example.com");
    assert_eq!(user.current_team_id, Some(output.team_id));

    let level = OrganizationStorage::new(pool.clone())
        .team_membership_level(&output.user_id, output.team_id)
        .await
        .unwrap();
    assert!(level.is_some());

    let key = TokenStorage::new(pool.clone())
        .verify_token(&output.api_key)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(key.user_id, output.user_id);
}

#[tokio::test]
async fn test_create_api_key_for_unknown_user() {
    let pool = tally_storage::connect_in_memory().await.unwrap();

    let result = create_api_key(&pool, "missing-user", "cli").await;

    assert!(matches!(result, Err(StorageError::NotFound)));
}

#[test]
fn test_route_events_falls_back_to_random_partition_when_bucket_exhausted() {
    let settings = Arc::new(IngestionSettings {
        event_partition_keys_to_override: vec!["1:overridden".to_string()],
        partition_key_automatic_override_enabled: true,
        partition_key_bucket_capacity: 2,
        partition_key_bucket_replenish_rate: 0.001,
        ..IngestionSettings::default()
    });

    assert_eq!(
        route_events(settings.clone(), 1, "hot", 3),
        vec![Some("1:hot".to_string()), Some("1:hot".to_string()), None]
    );
    assert_eq!(route_events(settings, 1, "overridden", 1), vec![None]);
}

#[test]
fn test_check_replay_event_uses_configured_limits() {
    let settings = Arc::new(IngestionSettings {
        replay_event_max_size: 1024,
        session_recording_allow_v1_ingestion: false,
        ..IngestionSettings::default()
    });

    assert!(check_replay_event(settings.clone(), 1024, false).is_ok());
    assert_eq!(
        check_replay_event(settings.clone(), 2048, false),
        Err(ReplayRejection::TooLarge { size: 2048, max: 1024 })
    );
    assert_eq!(
        check_replay_event(settings, 10, true),
        Err(ReplayRejection::V1IngestionDisabled)
    );
}
