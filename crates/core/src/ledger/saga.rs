//! Saga engine for multi-write ledger operations.
//!
//! The ledger store offers row CRUD plus one atomic balance increment, but
//! no multi-statement transactions. Every operation touching more than one
//! row is therefore modeled as an ordered list of forward steps, each
//! paired with a compensation. Steps run in order; on the first failure the
//! compensations recorded for the already-committed steps run in reverse
//! (LIFO) before the original error is returned.
//!
//! A failing compensation leaves the ledger diverged from the transaction
//! log. That is a fatal data-integrity event: it is logged with full
//! context and surfaced as [`LedgerError::Inconsistent`].

use futures::future::BoxFuture;
use log::{debug, error, warn};
use std::future::Future;

use super::ledger_errors::LedgerError;
use crate::{Error, Result};

type StepFn = Box<dyn FnOnce() -> BoxFuture<'static, Result<()>> + Send>;

struct SagaStep {
    description: String,
    action: StepFn,
    compensation: StepFn,
}

/// An ordered, compensable sequence of ledger writes.
pub struct Saga {
    label: String,
    steps: Vec<SagaStep>,
}

impl Saga {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            steps: Vec::new(),
        }
    }

    /// Appends a forward step and the compensation that undoes it.
    ///
    /// Compensations must reference pre-computed identifiers (row ids,
    /// inverse deltas) so they stay valid regardless of where the saga
    /// fails.
    pub fn step<A, AF, C, CF>(&mut self, description: impl Into<String>, action: A, compensation: C)
    where
        A: FnOnce() -> AF + Send + 'static,
        AF: Future<Output = Result<()>> + Send + 'static,
        C: FnOnce() -> CF + Send + 'static,
        CF: Future<Output = Result<()>> + Send + 'static,
    {
        self.steps.push(SagaStep {
            description: description.into(),
            action: Box::new(move || Box::pin(action())),
            compensation: Box::new(move || Box::pin(compensation())),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Runs all steps to completion, compensating on failure.
    ///
    /// Not cancel-safe by design: callers must drive it on a task that
    /// outlives their own future (see [`Saga::run_detached`]) so a dropped
    /// caller cannot abandon the ledger mid-write.
    pub async fn run(self) -> Result<()> {
        let label = self.label;
        let mut committed: Vec<(String, StepFn)> = Vec::new();

        for step in self.steps {
            debug!("saga '{}': {}", label, step.description);
            match (step.action)().await {
                Ok(()) => committed.push((step.description, step.compensation)),
                Err(cause) => {
                    warn!(
                        "saga '{}': step '{}' failed ({}), compensating {} committed step(s)",
                        label,
                        step.description,
                        cause,
                        committed.len()
                    );
                    return Err(Self::unwind(&label, committed, cause).await);
                }
            }
        }
        Ok(())
    }

    /// Runs the saga on its own task so that cancellation of the caller's
    /// future cannot interrupt forward steps or compensation.
    pub async fn run_detached(self) -> Result<()> {
        tokio::spawn(self.run())
            .await
            .map_err(|join_err| Error::Unexpected(format!("ledger saga task failed: {}", join_err)))?
    }

    async fn unwind(label: &str, committed: Vec<(String, StepFn)>, cause: Error) -> Error {
        for (description, compensation) in committed.into_iter().rev() {
            if let Err(comp_err) = compensation().await {
                error!(
                    "saga '{}': compensation '{}' failed: {} (after original failure: {}); \
                     transaction log and wallet balances may have diverged",
                    label, description, comp_err, cause
                );
                return LedgerError::Inconsistent(format!(
                    "compensation '{}' failed: {}",
                    description, comp_err
                ))
                .into();
            }
            debug!("saga '{}': compensated '{}'", label, description);
        }
        cause
    }
}
