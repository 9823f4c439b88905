//! Conversation state types

use crate::submission::Category;
use std::fmt;

/// Key for one user's conversation in one chat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity {
    pub chat_id: i64,
    pub user_id: i64,
}

impl Identity {
    pub fn new(chat_id: i64, user_id: i64) -> Self {
        Self { chat_id, user_id }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chat_id, self.user_id)
    }
}

/// Conversation stage for one identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConvState {
    /// Not reachable through normal flow; handles text like `AwaitingCategory`
    Idle,
    /// Waiting for the user to pick a category
    #[default]
    AwaitingCategory,
    /// A category is chosen, waiting for the entry text
    AwaitingContent,
}

impl ConvState {
    pub fn name(self) -> &'static str {
        match self {
            ConvState::Idle => "idle",
            ConvState::AwaitingCategory => "awaiting_category",
            ConvState::AwaitingContent => "awaiting_content",
        }
    }
}

/// Per-identity scratch data carried between events
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub selected_category: Option<Category>,
    pub category_display_name: Option<String>,
}

impl SessionContext {
    pub fn selected(category: Category, display_name: impl Into<String>) -> Self {
        Self {
            selected_category: Some(category),
            category_display_name: Some(display_name.into()),
        }
    }

    #[allow(dead_code)] // Used by tests
    pub fn is_empty(&self) -> bool {
        self.selected_category.is_none() && self.category_display_name.is_none()
    }

    /// A category is selected exactly when the state is `AwaitingContent`.
    pub fn is_consistent_with(&self, state: ConvState) -> bool {
        self.selected_category.is_some() == (state == ConvState::AwaitingContent)
    }
}

/// Immutable per-conversation context
#[derive(Debug, Clone)]
pub struct ConvContext {
    pub identity: Identity,
    /// Whether a usable API configuration was loaded at startup
    pub api_available: bool,
}

impl ConvContext {
    pub fn new(identity: Identity, api_available: bool) -> Self {
        Self {
            identity,
            api_available,
        }
    }
}
