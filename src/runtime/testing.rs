//! Mock implementations for testing
//!
//! These mocks enable integration testing without real I/O.

use super::traits::*;
use crate::state_machine::{Identity, OutboundMessage};
use crate::submission::{Category, SubmissionClient, SubmissionOutcome};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{mpsc, Notify};

// ============================================================================
// Mock Submission Client
// ============================================================================

/// Mock submission client that returns queued outcomes
pub struct MockSubmissionClient {
    outcomes: Mutex<VecDeque<SubmissionOutcome>>,
    /// Record of all submissions made
    pub calls: Mutex<Vec<(Category, String)>>,
}

impl MockSubmissionClient {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn queue_outcome(&self, outcome: SubmissionOutcome) {
        self.outcomes.lock().unwrap().push_back(outcome);
    }

    pub fn recorded_calls(&self) -> Vec<(Category, String)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MockSubmissionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubmissionClient for MockSubmissionClient {
    async fn submit(&self, category: Category, content: &str) -> SubmissionOutcome {
        self.calls
            .lock()
            .unwrap()
            .push((category, content.to_string()));
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| SubmissionOutcome::transport_failure("No mock outcome queued"))
    }
}

// ============================================================================
// Gated Submission Client (for concurrency testing)
// ============================================================================

/// Submission client that holds every call until the test opens the gate
pub struct GatedSubmissionClient {
    outcome: SubmissionOutcome,
    gate: Arc<Notify>,
    /// Notified when a submission starts waiting on the gate
    started: Arc<Notify>,
}

impl GatedSubmissionClient {
    pub fn new(outcome: SubmissionOutcome) -> Self {
        Self {
            outcome,
            gate: Arc::new(Notify::new()),
            started: Arc::new(Notify::new()),
        }
    }

    pub fn gate(&self) -> Arc<Notify> {
        self.gate.clone()
    }

    pub fn started(&self) -> Arc<Notify> {
        self.started.clone()
    }
}

#[async_trait]
impl SubmissionClient for GatedSubmissionClient {
    async fn submit(&self, _category: Category, _content: &str) -> SubmissionOutcome {
        self.started.notify_one();
        self.gate.notified().await;
        self.outcome.clone()
    }
}

// ============================================================================
// Recording Messenger
// ============================================================================

/// Messenger that keeps every delivered message and can be told to fail
pub struct RecordingMessenger {
    sent: Mutex<Vec<(Identity, OutboundMessage)>>,
    fail: AtomicBool,
    tx: mpsc::UnboundedSender<(Identity, OutboundMessage)>,
    rx: Mutex<Option<mpsc::UnboundedReceiver<(Identity, OutboundMessage)>>>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            sent: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
            tx,
            rx: Mutex::new(Some(rx)),
        }
    }

    pub fn sent_messages(&self) -> Vec<(Identity, OutboundMessage)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn fail_deliveries(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Stream of delivered messages; can only be taken once
    pub fn observer(&self) -> MessageObserver {
        let rx = self
            .rx
            .lock()
            .unwrap()
            .take()
            .expect("observer already taken");
        MessageObserver {
            rx: tokio::sync::Mutex::new(rx),
        }
    }
}

impl Default for RecordingMessenger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_message(
        &self,
        identity: &Identity,
        message: &OutboundMessage,
    ) -> Result<(), String> {
        if self.fail.load(Ordering::SeqCst) {
            return Err("delivery disabled".to_string());
        }
        self.sent
            .lock()
            .unwrap()
            .push((*identity, message.clone()));
        let _ = self.tx.send((*identity, message.clone()));
        Ok(())
    }
}

/// Awaits messages delivered through a [`RecordingMessenger`]
pub struct MessageObserver {
    rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<(Identity, OutboundMessage)>>,
}

impl MessageObserver {
    /// Next delivered message; panics if none arrives within five seconds
    pub async fn next(&self) -> (Identity, OutboundMessage) {
        let mut rx = self.rx.lock().await;
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("timed out waiting for a message")
            .expect("messenger dropped")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_submission_client() {
        let mock = MockSubmissionClient::new();
        mock.queue_outcome(SubmissionOutcome::from_response(201, "ok"));

        let outcome = mock.submit(Category::Task, "one").await;
        assert!(outcome.is_accepted());

        // Second call has nothing queued
        let outcome = mock.submit(Category::Note, "two").await;
        assert!(matches!(outcome, SubmissionOutcome::TransportFailure { .. }));

        assert_eq!(
            mock.recorded_calls(),
            vec![
                (Category::Task, "one".to_string()),
                (Category::Note, "two".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_recording_messenger() {
        let messenger = RecordingMessenger::new();
        let observer = messenger.observer();
        let identity = Identity::new(1, 2);
        let message = OutboundMessage {
            text: "hi".to_string(),
            options: None,
        };

        messenger.send_message(&identity, &message).await.unwrap();
        assert_eq!(observer.next().await, (identity, message.clone()));

        messenger.fail_deliveries(true);
        assert!(messenger.send_message(&identity, &message).await.is_err());
        assert_eq!(messenger.sent_messages().len(), 1);
    }
}
