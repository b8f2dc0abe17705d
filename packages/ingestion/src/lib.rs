// ABOUTME: Event ingestion policies for Tally
// ABOUTME: Partition key routing for hot keys and session replay acceptance rules

pub mod partition;
pub mod replay;

pub use partition::{partition_key, PartitionKeyRouter};
pub use replay::{ReplayEventPolicy, ReplayRejection};
