//! Conversation runtime executor

use super::traits::Messenger;
use super::RuntimeTable;
use crate::state_machine::{
    transition, ConvContext, ConvState, Effect, Event, SessionContext,
};
use crate::submission::{SubmissionClient, SubmissionOutcome};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Lets an idle runtime remove itself from the manager's table
pub(super) struct Eviction {
    pub table: RuntimeTable,
    pub generation: u64,
    pub idle_timeout: Duration,
}

/// Runs one identity's state machine, one event at a time
pub struct ConversationRuntime<C, M>
where
    C: SubmissionClient + 'static,
    M: Messenger + 'static,
{
    context: ConvContext,
    state: ConvState,
    session: SessionContext,
    /// `None` when no usable API configuration was loaded
    submission: Option<Arc<C>>,
    messenger: Arc<M>,
    event_rx: mpsc::UnboundedReceiver<Event>,
    eviction: Option<Eviction>,
}

impl<C, M> ConversationRuntime<C, M>
where
    C: SubmissionClient + 'static,
    M: Messenger + 'static,
{
    pub fn new(
        context: ConvContext,
        submission: Option<Arc<C>>,
        messenger: Arc<M>,
        event_rx: mpsc::UnboundedReceiver<Event>,
    ) -> Self {
        Self {
            context,
            state: ConvState::default(),
            session: SessionContext::default(),
            submission,
            messenger,
            event_rx,
            eviction: None,
        }
    }

    pub(super) fn with_eviction(mut self, eviction: Eviction) -> Self {
        self.eviction = Some(eviction);
        self
    }

    #[allow(dead_code)] // Inspected by tests
    pub fn state(&self) -> ConvState {
        self.state
    }

    #[allow(dead_code)] // Inspected by tests
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub async fn run(mut self) {
        tracing::debug!(identity = %self.context.identity, "Starting conversation runtime");

        while let Some(event) = self.next_event().await {
            self.process_event(event).await;
        }

        tracing::debug!(identity = %self.context.identity, "Conversation runtime stopped");
    }

    /// Wait for the next event. Returns `None` when the channel closes or the
    /// runtime has evicted itself after sitting idle.
    async fn next_event(&mut self) -> Option<Event> {
        loop {
            let Some(idle_timeout) = self.eviction.as_ref().map(|e| e.idle_timeout) else {
                return self.event_rx.recv().await;
            };

            if let Ok(event) = tokio::time::timeout(idle_timeout, self.event_rx.recv()).await {
                return event;
            }

            if self.try_evict().await {
                return None;
            }
        }
    }

    /// Remove this runtime from the table unless events arrived meanwhile.
    ///
    /// The manager only sends while holding the table's read lock, so an
    /// empty queue observed under the write lock stays empty.
    async fn try_evict(&mut self) -> bool {
        let Some(eviction) = &self.eviction else {
            return false;
        };

        let mut table = eviction.table.write().await;
        if !self.event_rx.is_empty() {
            return false;
        }

        let identity = self.context.identity;
        if table
            .get(&identity)
            .is_some_and(|handle| handle.generation == eviction.generation)
        {
            table.remove(&identity);
            tracing::info!(
                identity = %identity,
                state = self.state.name(),
                "Evicted idle conversation"
            );
        }
        true
    }

    /// Run one inbound event to completion, including any submission it
    /// triggers.
    pub async fn process_event(&mut self, event: Event) {
        let mut events_to_process = vec![event];

        while let Some(current_event) = events_to_process.pop() {
            let result =
                match transition(&self.state, &self.session, &self.context, current_event) {
                    Ok(r) => r,
                    Err(e) => {
                        tracing::error!(
                            identity = %self.context.identity,
                            state = self.state.name(),
                            error = %e,
                            "Rejected event"
                        );
                        return;
                    }
                };

            if result.new_state != self.state {
                tracing::debug!(
                    identity = %self.context.identity,
                    from = self.state.name(),
                    to = result.new_state.name(),
                    "State transition"
                );
            }
            self.state = result.new_state;
            self.session = result.new_session;
            debug_assert!(self.session.is_consistent_with(self.state));

            for effect in result.effects {
                if let Some(generated_event) = self.execute_effect(effect).await {
                    events_to_process.push(generated_event);
                }
            }
        }
    }

    async fn execute_effect(&mut self, effect: Effect) -> Option<Event> {
        match effect {
            Effect::SendMessage(message) => {
                if let Err(e) = self
                    .messenger
                    .send_message(&self.context.identity, &message)
                    .await
                {
                    tracing::error!(
                        identity = %self.context.identity,
                        error = %e,
                        "Failed to deliver message"
                    );
                }
                None
            }

            Effect::Submit {
                category,
                label,
                content,
            } => {
                let outcome = match &self.submission {
                    Some(client) => client.submit(category, &content).await,
                    None => {
                        tracing::error!(
                            identity = %self.context.identity,
                            "Submission requested without an API client"
                        );
                        SubmissionOutcome::transport_failure("API client is not configured")
                    }
                };
                Some(Event::SubmissionFinished { label, outcome })
            }
        }
    }
}
