//! Effects produced by state transitions

use crate::submission::Category;

/// A chat message, optionally paired with the selectable option set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub text: String,
    pub options: Option<Vec<String>>,
}

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send a message to the identity that triggered the transition
    SendMessage(OutboundMessage),

    /// Forward an entry to the remote API (one attempt)
    Submit {
        category: Category,
        label: String,
        content: String,
    },
}

impl Effect {
    pub fn message(text: impl Into<String>) -> Self {
        Effect::SendMessage(OutboundMessage {
            text: text.into(),
            options: None,
        })
    }

    /// Message with the category buttons attached
    pub fn message_with_options(text: impl Into<String>) -> Self {
        Effect::SendMessage(OutboundMessage {
            text: text.into(),
            options: Some(Category::option_labels()),
        })
    }

    #[allow(dead_code)] // Used by tests
    pub fn as_message(&self) -> Option<&OutboundMessage> {
        match self {
            Effect::SendMessage(message) => Some(message),
            Effect::Submit { .. } => None,
        }
    }
}
