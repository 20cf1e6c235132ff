//! Action dispatcher.
//!
//! Holds the registry of action kind → executor and runs a classified
//! action set in priority order.

use casa_core::classify::{Action, ActionKind};
use casa_core::{CasaError, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Executes one kind of action against the collaborator services.
#[async_trait::async_trait]
pub trait ActionExecutor: Send + Sync {
    /// Performs the effect described by the action parameters.
    async fn run(&self, parameters: &Map<String, Value>) -> Result<()>;
}

/// Registry of action executors plus the ordered execution loop.
///
/// The registry is process-wide, read-mostly configuration: populated at
/// startup, optionally extended, then shared behind an `Arc`. New action
/// kinds register an executor without touching the dispatch loop.
#[derive(Default)]
pub struct ActionDispatcher {
    executors: HashMap<ActionKind, Arc<dyn ActionExecutor>>,
}

impl ActionDispatcher {
    /// Creates an empty dispatcher with no registered executors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the executor for an action kind.
    pub fn register(&mut self, kind: ActionKind, executor: Arc<dyn ActionExecutor>) {
        self.executors.insert(kind, executor);
    }

    /// Returns true if an executor is registered for the kind.
    pub fn is_registered(&self, kind: ActionKind) -> bool {
        self.executors.contains_key(&kind)
    }

    /// Executes the actions strictly one after another in ascending
    /// priority order (stable: ties keep the backend's emission order).
    ///
    /// Later actions may depend on state changes made by earlier ones, so
    /// on the first failure the remaining actions are not attempted.
    ///
    /// # Errors
    ///
    /// - `UnregisteredAction` when an action kind has no executor — a
    ///   configuration fault, surfaced so misconfiguration is observable.
    /// - `ActionFailed` when an executor fails.
    ///
    /// On success returns the executed kinds in execution order.
    pub async fn dispatch(&self, mut actions: Vec<Action>) -> Result<Vec<ActionKind>> {
        actions.sort_by_key(|action| action.priority);

        let mut executed = Vec::with_capacity(actions.len());
        for action in &actions {
            let executor = self
                .executors
                .get(&action.kind)
                .ok_or(CasaError::UnregisteredAction { kind: action.kind })?;

            tracing::debug!(
                target: "dispatch",
                "Executing action {} (priority {})",
                action.kind,
                action.priority
            );

            executor.run(&action.parameters).await.map_err(|err| match err {
                failed @ CasaError::ActionFailed { .. } => failed,
                other => CasaError::action_failed(action.kind, other.to_string()),
            })?;

            executed.push(action.kind);
        }

        Ok(executed)
    }
}
