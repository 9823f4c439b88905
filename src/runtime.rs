//! Runtime for executing conversations
//!
//! Each identity gets its own task draining its own queue, so events for one
//! identity are handled strictly in arrival order while other identities
//! proceed independently, even when a submission is pending.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::ConversationRuntime;
pub use traits::*;

use crate::state_machine::{ConvContext, Event, Identity};
use crate::submission::{LoggingSubmissionClient, SubmissionClient};
use crate::telegram::TelegramClient;
use executor::Eviction;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};

/// Type alias for production runtime with concrete implementations
pub type ProductionManager = RuntimeManager<LoggingSubmissionClient, Arc<TelegramClient>>;

/// Identity → running conversation
pub(crate) type RuntimeTable = Arc<RwLock<HashMap<Identity, ConversationHandle>>>;

/// Handle to interact with a running conversation
pub struct ConversationHandle {
    pub event_tx: mpsc::UnboundedSender<Event>,
    /// Distinguishes a runtime from its replacement after eviction
    pub generation: u64,
}

/// Manager for all conversation runtimes
pub struct RuntimeManager<C, M>
where
    C: SubmissionClient + 'static,
    M: Messenger + 'static,
{
    submission: Option<Arc<C>>,
    messenger: Arc<M>,
    runtimes: RuntimeTable,
    idle_timeout: Option<Duration>,
    next_generation: AtomicU64,
}

impl<C, M> RuntimeManager<C, M>
where
    C: SubmissionClient + 'static,
    M: Messenger + 'static,
{
    /// `submission` is `None` when the API configuration could not be
    /// loaded; conversations then report a configuration error instead of
    /// submitting.
    pub fn new(submission: Option<C>, messenger: M) -> Self {
        Self {
            submission: submission.map(Arc::new),
            messenger: Arc::new(messenger),
            runtimes: Arc::new(RwLock::new(HashMap::new())),
            idle_timeout: None,
            next_generation: AtomicU64::new(0),
        }
    }

    /// Evict conversations that receive no event for `idle_timeout`
    pub fn with_idle_timeout(mut self, idle_timeout: Option<Duration>) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    /// Send an event to a conversation, starting one if needed
    pub async fn send_event(&self, identity: Identity, event: Event) -> Result<(), String> {
        let mut event = event;

        {
            let runtimes = self.runtimes.read().await;
            if let Some(handle) = runtimes.get(&identity) {
                match handle.event_tx.send(event) {
                    Ok(()) => return Ok(()),
                    // Runtime task is gone; replace it below
                    Err(mpsc::error::SendError(returned)) => event = returned,
                }
            }
        }

        let mut runtimes = self.runtimes.write().await;
        // Another caller may have started it while we waited for the lock
        if let Some(handle) = runtimes.remove(&identity) {
            match handle.event_tx.send(event) {
                Ok(()) => {
                    runtimes.insert(identity, handle);
                    return Ok(());
                }
                Err(mpsc::error::SendError(returned)) => {
                    tracing::warn!(identity = %identity, "Replacing stopped conversation runtime");
                    event = returned;
                }
            }
        }

        let handle = self.spawn_runtime(identity);
        handle
            .event_tx
            .send(event)
            .map_err(|e| format!("Failed to send event: {e}"))?;
        runtimes.insert(identity, handle);
        Ok(())
    }

    /// Number of conversations currently held in memory
    #[allow(dead_code)] // Used by tests
    pub async fn active_conversations(&self) -> usize {
        self.runtimes.read().await.len()
    }

    fn spawn_runtime(&self, identity: Identity) -> ConversationHandle {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let context = ConvContext::new(identity, self.submission.is_some());

        let mut runtime = ConversationRuntime::new(
            context,
            self.submission.clone(),
            self.messenger.clone(),
            event_rx,
        );
        if let Some(idle_timeout) = self.idle_timeout {
            runtime = runtime.with_eviction(Eviction {
                table: self.runtimes.clone(),
                generation,
                idle_timeout,
            });
        }

        tracing::info!(identity = %identity, generation, "Starting conversation");
        tokio::spawn(runtime.run());

        ConversationHandle {
            event_tx,
            generation,
        }
    }
}
