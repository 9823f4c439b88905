//! Events that can occur in a conversation

use crate::submission::SubmissionOutcome;

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // User events
    Start,
    Help,
    Cancel,
    Text {
        text: String,
    },

    // Generated by the runtime after a `Submit` effect
    SubmissionFinished {
        label: String,
        outcome: SubmissionOutcome,
    },
}

impl Event {
    pub fn text(text: impl Into<String>) -> Self {
        Event::Text { text: text.into() }
    }
}
