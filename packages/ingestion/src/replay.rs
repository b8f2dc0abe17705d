// ABOUTME: Acceptance rules for session replay events
// ABOUTME: Enforces the maximum payload size and the deprecated v1 ingestion switch

use std::sync::Arc;

use tally_config::{IngestionSettings, REPLAY_RETENTION_DAYS_MAX, REPLAY_RETENTION_DAYS_MIN};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReplayRejection {
    #[error("replay event of {size} bytes exceeds the {max} byte limit")]
    TooLarge { size: usize, max: usize },

    #[error("session recording v1 ingestion is disabled")]
    V1IngestionDisabled,
}

pub struct ReplayEventPolicy {
    settings: Arc<IngestionSettings>,
}

impl ReplayEventPolicy {
    pub fn new(settings: Arc<IngestionSettings>) -> Self {
        Self { settings }
    }

    pub fn max_event_size(&self) -> usize {
        self.settings.replay_event_max_size
    }

    pub fn allows_v1_ingestion(&self) -> bool {
        self.settings.session_recording_allow_v1_ingestion
    }

    /// Check a replay event of `size` bytes; `v1` marks the deprecated storage path
    pub fn check(&self, size: usize, v1: bool) -> Result<(), ReplayRejection> {
        let max = self.max_event_size();
        if size > max {
            debug!("Rejecting replay event: {} > {} bytes", size, max);
            return Err(ReplayRejection::TooLarge { size, max });
        }
        if v1 && !self.allows_v1_ingestion() {
            return Err(ReplayRejection::V1IngestionDisabled);
        }
        Ok(())
    }

    /// Clamp a requested retention period to the supported range
    pub fn retention_days(requested: u32) -> u32 {
        requested.clamp(REPLAY_RETENTION_DAYS_MIN, REPLAY_RETENTION_DAYS_MAX)
    }
}
