//! Conversation manager.
//!
//! Drives one input → response cycle per session: append the user turn,
//! classify the bounded transcript, append the assistant turn, merge
//! context, then dispatch the classified actions under the blocking policy
//! the response declares.

use crate::dispatcher::ActionDispatcher;
use casa_core::classify::ClassifierResponse;
use casa_core::session::{Session, Turn};
use casa_core::Result;
use casa_interaction::ClassificationClient;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;

/// Whether a classification cycle is currently producing a reply.
///
/// The phase tracks reply latency, not side-effect completion: a
/// non-blocking dispatch may still be running while the phase is `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CyclePhase {
    /// No cycle in flight.
    Idle,
    /// One user input is being classified and merged.
    Processing,
}

/// Owns one session and drives its classification cycles.
///
/// Cycles are serialized: a second `process_user_input` call waits until
/// the previous cycle has finished its turn-append/merge steps (and, in
/// blocking mode, its dispatch). The session is owned exclusively by this
/// manager; nothing else mutates its turns or context.
pub struct ConversationManager {
    /// The bounded conversation state.
    session: Arc<RwLock<Session>>,
    /// Current cycle phase.
    phase: Arc<RwLock<CyclePhase>>,
    /// Serializes cycles against the same session.
    cycle_lock: Arc<Mutex<()>>,
    /// Classification round-trip with retry/fallback policy.
    client: ClassificationClient,
    /// Process-wide executor registry.
    dispatcher: Arc<ActionDispatcher>,
    /// Handle of the most recent detached dispatch.
    background: Arc<Mutex<Option<JoinHandle<()>>>>,
}

impl ConversationManager {
    /// Creates a manager with a fresh session.
    pub fn new(client: ClassificationClient, dispatcher: Arc<ActionDispatcher>) -> Self {
        Self {
            session: Arc::new(RwLock::new(Session::new())),
            phase: Arc::new(RwLock::new(CyclePhase::Idle)),
            cycle_lock: Arc::new(Mutex::new(())),
            client,
            dispatcher,
            background: Arc::new(Mutex::new(None)),
        }
    }

    /// Runs one full conversation cycle for the given user input.
    ///
    /// Returns the classification response (the immediate reply plus the
    /// structured interpretation). When the response declares
    /// `should_block`, the call completes only after every action finished
    /// — a dispatch failure is returned instead of a success reply. When
    /// non-blocking, the reply returns immediately and dispatch failures
    /// are only logged.
    ///
    /// # Errors
    ///
    /// Only dispatch faults in blocking mode surface here; classification
    /// failures degrade to the fallback response and still return `Ok`.
    pub async fn process_user_input(&self, input: &str) -> Result<ClassifierResponse> {
        let _cycle = self.cycle_lock.lock().await;
        *self.phase.write().await = CyclePhase::Processing;

        let turns = {
            let mut session = self.session.write().await;
            session.push_turn(Turn::user(input));
            session.turns.clone()
        };

        let response = self.client.classify(&turns).await;

        {
            let mut session = self.session.write().await;
            session.push_turn(Turn::assistant(&response.immediate_response.message));
            session.merge_context(response.context.clone());
        }
        *self.phase.write().await = CyclePhase::Idle;

        if response.immediate_response.should_block {
            self.dispatcher.dispatch(response.actions.clone()).await?;
        } else {
            let dispatcher = Arc::clone(&self.dispatcher);
            let actions = response.actions.clone();
            let handle = tokio::spawn(async move {
                if let Err(err) = dispatcher.dispatch(actions).await {
                    tracing::error!(
                        target: "dispatch",
                        "Background action dispatch failed: {err}"
                    );
                }
            });
            *self.background.lock().await = Some(handle);
        }

        Ok(response)
    }

    /// Returns a read-only snapshot of the current session state.
    pub async fn session(&self) -> Session {
        self.session.read().await.clone()
    }

    /// Returns the current cycle phase.
    pub async fn phase(&self) -> CyclePhase {
        *self.phase.read().await
    }

    /// Discards all turns and context, starting a fresh conversation.
    pub async fn reset(&self) {
        let _cycle = self.cycle_lock.lock().await;
        self.session.write().await.clear();
    }

    /// Waits for the most recent non-blocking dispatch to finish.
    ///
    /// The reply path never depends on this; it exists for graceful
    /// shutdown and for tests that need deterministic completion of
    /// fire-and-forget work.
    pub async fn await_background_actions(&self) {
        let handle = self.background.lock().await.take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}
