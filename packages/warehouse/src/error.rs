// ABOUTME: Error type for source provisioning
// ABOUTME: Separates invalid input, remote service failures and local persistence failures

use thiserror::Error;

use crate::providers::ProviderError;
use tally_storage::StorageError;

/// Provisioning step that produced a remote failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionStep {
    CreateSource,
    CreateDestination,
    CreateConnection,
    StartSync,
}

impl std::fmt::Display for ProvisionStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProvisionStep::CreateSource => "create source",
            ProvisionStep::CreateDestination => "create destination",
            ProvisionStep::CreateConnection => "create connection",
            ProvisionStep::StartSync => "start sync",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Provisioning failed at {step}: {source}")]
    Provider {
        step: ProvisionStep,
        #[source]
        source: ProviderError,
    },
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ProvisionError {
    pub fn provider(step: ProvisionStep) -> impl FnOnce(ProviderError) -> Self {
        move |source| Self::Provider { step, source }
    }
}

pub type ProvisionResult<T> = Result<T, ProvisionError>;
