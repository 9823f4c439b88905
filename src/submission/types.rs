//! Entry categories and normalized submission outcomes

use serde::{Deserialize, Serialize};
use std::fmt;

/// The fixed set of entry kinds the remote API accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Task,
    Note,
    Bookmark,
}

impl Category {
    /// All categories, in the order they are offered to the user
    pub const ALL: [Category; 3] = [Category::Task, Category::Note, Category::Bookmark];

    /// Value sent as the `type` field of the payload
    pub fn api_value(self) -> &'static str {
        match self {
            Category::Task => "task",
            Category::Note => "note",
            Category::Bookmark => "bookmark",
        }
    }

    /// Label shown on the option buttons
    pub fn display_label(self) -> &'static str {
        match self {
            Category::Task => "Task",
            Category::Note => "Note",
            Category::Bookmark => "Bookmark",
        }
    }

    /// Exact, case-sensitive match against the display labels.
    pub fn from_label(text: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.display_label() == text)
    }

    /// Option set presented alongside prompts
    pub fn option_labels() -> Vec<String> {
        Self::ALL
            .iter()
            .map(|c| c.display_label().to_string())
            .collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.api_value())
    }
}

/// Result of one submission attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Remote answered with a 2xx status
    Accepted { status_code: u16, body_text: String },
    /// Remote answered with any other status
    Rejected { status_code: u16, body_text: String },
    /// The request never produced a readable response
    TransportFailure { diagnostic: String },
}

impl SubmissionOutcome {
    /// Classify a completed HTTP exchange by its status code.
    pub fn from_response(status_code: u16, body_text: impl Into<String>) -> Self {
        let body_text = body_text.into();
        if (200..300).contains(&status_code) {
            SubmissionOutcome::Accepted {
                status_code,
                body_text,
            }
        } else {
            SubmissionOutcome::Rejected {
                status_code,
                body_text,
            }
        }
    }

    pub fn transport_failure(diagnostic: impl Into<String>) -> Self {
        SubmissionOutcome::TransportFailure {
            diagnostic: diagnostic.into(),
        }
    }

    #[allow(dead_code)] // Used by tests
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmissionOutcome::Accepted { .. })
    }
}
