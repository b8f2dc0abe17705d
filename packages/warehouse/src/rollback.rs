// ABOUTME: Compensation stack for multi-step remote provisioning
// ABOUTME: Records an undo action per completed step and replays them in reverse on failure

use async_trait::async_trait;
use tracing::{error, info};

use crate::providers::ProviderResult;

/// Undo action for one completed provisioning step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compensation {
    DeleteSource(String),
    DeleteDestination(String),
    DeleteConnection(String),
}

impl std::fmt::Display for Compensation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Compensation::DeleteSource(id) => write!(f, "delete source {}", id),
            Compensation::DeleteDestination(id) => write!(f, "delete destination {}", id),
            Compensation::DeleteConnection(id) => write!(f, "delete connection {}", id),
        }
    }
}

/// Executes compensations against the remote service
#[async_trait]
pub trait Compensator: Send + Sync {
    async fn compensate(&self, step: &Compensation) -> ProviderResult<()>;
}

/// Outcome of unwinding a stack
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UnwindReport {
    pub completed: Vec<Compensation>,
    pub failed: Vec<Compensation>,
}

#[derive(Debug, Default)]
pub struct RollbackStack {
    steps: Vec<Compensation>,
}

impl RollbackStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: Compensation) {
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Discard pending compensations once the whole operation has succeeded
    pub fn commit(mut self) {
        self.steps.clear();
    }

    /// Run every compensation, most recent first.
    ///
    /// A failing compensation is logged and skipped; the remaining ones still run.
    pub async fn unwind<C>(mut self, compensator: &C) -> UnwindReport
    where
        C: Compensator + ?Sized,
    {
        let mut report = UnwindReport::default();

        while let Some(step) = self.steps.pop() {
            match compensator.compensate(&step).await {
                Ok(()) => {
                    info!("Rolled back: {}", step);
                    report.completed.push(step);
                }
                Err(e) => {
                    error!("Rollback step failed ({}): {}", step, e);
                    report.failed.push(step);
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::ProviderError;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingCompensator {
        calls: Mutex<Vec<Compensation>>,
        fail_on: Option<Compensation>,
    }

    #[async_trait]
    impl Compensator for RecordingCompensator {
        async fn compensate(&self, step: &Compensation) -> ProviderResult<()> {
            self.calls.lock().unwrap().push(step.clone());
            if self.fail_on.as_ref() == Some(step) {
                return Err(ProviderError::Network("connection reset".to_string()));
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_unwind_runs_in_reverse_order() {
        let compensator = RecordingCompensator::default();
        let mut stack = RollbackStack::new();
        stack.push(Compensation::DeleteSource("src".to_string()));
        stack.push(Compensation::DeleteDestination("dst".to_string()));
        stack.push(Compensation::DeleteConnection("conn".to_string()));

        let report = stack.unwind(&compensator).await;

        let expected = vec![
            Compensation::DeleteConnection("conn".to_string()),
            Compensation::DeleteDestination("dst".to_string()),
            Compensation::DeleteSource("src".to_string()),
        ];
        assert_eq!(*compensator.calls.lock().unwrap(), expected);
        assert_eq!(report.completed, expected);
        assert!(report.failed.is_empty());
    }

    #[tokio::test]
    async fn test_unwind_continues_after_failure() {
        let compensator = RecordingCompensator {
            fail_on: Some(Compensation::DeleteDestination("dst".to_string())),
            ..Default::default()
        };
        let mut stack = RollbackStack::new();
        stack.push(Compensation::DeleteSource("src".to_string()));
        stack.push(Compensation::DeleteDestination("dst".to_string()));

        let report = stack.unwind(&compensator).await;

        assert_eq!(compensator.calls.lock().unwrap().len(), 2);
        assert_eq!(report.failed, vec![Compensation::DeleteDestination("dst".to_string())]);
        assert_eq!(report.completed, vec![Compensation::DeleteSource("src".to_string())]);
    }

    #[tokio::test]
    async fn test_committed_stack_runs_nothing() {
        let mut stack = RollbackStack::new();
        stack.push(Compensation::DeleteSource("src".to_string()));
        assert_eq!(stack.len(), 1);

        stack.commit();

        let empty = RollbackStack::new();
        assert!(empty.is_empty());
        let report = empty.unwind(&RecordingCompensator::default()).await;
        assert_eq!(report, UnwindReport::default());
    }
}
