// ABOUTME: Partition key selection for produced events
// ABOUTME: Hot team/distinct_id pairs fall back to random partitioning via overrides or token buckets

use std::collections::HashSet;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::{clock::DefaultClock, state::keyed::DefaultKeyedStateStore, Quota, RateLimiter};
use tally_config::IngestionSettings;
use tracing::{debug, warn};

type KeyedLimiter = RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

/// Partition key for an event: `<team_id>:<distinct_id>`
pub fn partition_key(team_id: i64, distinct_id: &str) -> String {
    format!("{}:{}", team_id, distinct_id)
}

/// Chooses the partition key for each event.
///
/// `None` means the producer should pick a random partition.
pub struct PartitionKeyRouter {
    overrides: HashSet<String>,
    limiter: Option<KeyedLimiter>,
}

impl PartitionKeyRouter {
    pub fn new(settings: Arc<IngestionSettings>) -> Self {
        let overrides = settings
            .event_partition_keys_to_override
            .iter()
            .cloned()
            .collect();

        let limiter = settings
            .partition_key_automatic_override_enabled
            .then(|| RateLimiter::keyed(bucket_quota(&settings)));

        Self { overrides, limiter }
    }

    pub fn route(&self, team_id: i64, distinct_id: &str) -> Option<String> {
        let key = partition_key(team_id, distinct_id);

        if self.overrides.contains(&key) {
            debug!("Partition key {} is overridden", key);
            return None;
        }

        if let Some(limiter) = &self.limiter {
            if limiter.check_key(&key).is_err() {
                warn!(partition_key = %key, "Partition key bucket exhausted, using random partition");
                return None;
            }
        }

        Some(key)
    }

    /// Drop bucket state for keys that have fully replenished
    pub fn retain_recent(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.retain_recent();
        }
    }

    /// Number of keys with live bucket state
    pub fn tracked_keys(&self) -> usize {
        self.limiter.as_ref().map_or(0, |limiter| limiter.len())
    }
}

fn bucket_quota(settings: &IngestionSettings) -> Quota {
    let capacity = NonZeroU32::new(settings.partition_key_bucket_capacity).unwrap_or_else(|| {
        warn!("Partition key bucket capacity is zero, using a capacity of one");
        NonZeroU32::MIN
    });

    let rate = settings.partition_key_bucket_replenish_rate;
    let period = match (rate.is_finite() && rate > 0.0)
        .then(|| Duration::try_from_secs_f64(1.0 / rate).ok())
        .flatten()
    {
        Some(period) => period,
        None => {
            warn!(rate = %rate, "Invalid partition key replenish rate, using one token per second");
            Duration::from_secs(1)
        }
    };

    Quota::with_period(period)
        .unwrap_or_else(|| Quota::per_second(NonZeroU32::MIN))
        .allow_burst(capacity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn settings(overrides: &[&str], automatic: bool, capacity: u32) -> Arc<IngestionSettings> {
        Arc::new(IngestionSettings {
            event_partition_keys_to_override: overrides.iter().map(|s| s.to_string()).collect(),
            partition_key_automatic_override_enabled: automatic,
            partition_key_bucket_capacity: capacity,
            // Slow enough that nothing replenishes during a test
            partition_key_bucket_replenish_rate: 0.001,
            ..IngestionSettings::default()
        })
    }

    #[test]
    fn test_partition_key_format() {
        assert_eq!(partition_key(2, "myLovelyId"), "2:myLovelyId");
    }

    #[test]
    fn test_default_routes_to_key() {
        let router = PartitionKeyRouter::new(settings(&[], false, 1));

        for _ in 0..10 {
            assert_eq!(router.route(1, "user"), Some("1:user".to_string()));
        }
        assert_eq!(router.tracked_keys(), 0);
    }

    #[test]
    fn test_overridden_key_gets_random_partition() {
        let router = PartitionKeyRouter::new(settings(&["2:myLovelyId"], false, 1));

        assert_eq!(router.route(2, "myLovelyId"), None);
        assert_eq!(router.route(3, "myLovelyId"), Some("3:myLovelyId".to_string()));
    }

    #[test]
    fn test_exhausted_bucket_gets_random_partition() {
        let router = PartitionKeyRouter::new(settings(&[], true, 3));

        for _ in 0..3 {
            assert_eq!(router.route(1, "hot"), Some("1:hot".to_string()));
        }
        assert_eq!(router.route(1, "hot"), None);

        // Buckets are per key
        assert_eq!(router.route(1, "cold"), Some("1:cold".to_string()));
        assert_eq!(router.tracked_keys(), 2);
    }

    #[test]
    fn test_bucket_quota_handles_bad_values() {
        let quota = bucket_quota(&IngestionSettings {
            partition_key_bucket_capacity: 0,
            partition_key_bucket_replenish_rate: -1.0,
            ..IngestionSettings::default()
        });

        assert_eq!(quota.burst_size(), NonZeroU32::MIN);
        assert_eq!(quota.replenish_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_tiny_replenish_rate_falls_back_to_default_period() {
        let settings = Arc::new(IngestionSettings {
            partition_key_automatic_override_enabled: true,
            partition_key_bucket_replenish_rate: 1e-30,
            ..IngestionSettings::default()
        });

        assert_eq!(
            bucket_quota(&settings).replenish_interval(),
            Duration::from_secs(1)
        );

        let router = PartitionKeyRouter::new(settings);
        assert_eq!(router.route(1, "user"), Some("1:user".to_string()));
    }
}
