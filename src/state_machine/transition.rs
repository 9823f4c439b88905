//! Pure state transition function
//!
//! Given the same state, session, context and event this always produces
//! the same result. Submissions are requested through `Effect::Submit`; the
//! runtime performs them and feeds `Event::SubmissionFinished` back in.

use super::{messages, ConvContext, ConvState, Effect, Event, SessionContext};
use crate::submission::{Category, SubmissionOutcome};
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub new_session: SessionContext,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState, session: SessionContext) -> Self {
        Self {
            new_state: state,
            new_session: session,
            effects: vec![],
        }
    }

    /// Back to category selection with nothing remembered
    pub fn reset() -> Self {
        Self::new(ConvState::AwaitingCategory, SessionContext::default())
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

pub fn transition(
    state: &ConvState,
    session: &SessionContext,
    context: &ConvContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (*state, event) {
        // ============================================================
        // Commands (valid in every state)
        // ============================================================
        (_, Event::Start) => {
            Ok(TransitionResult::reset().with_effect(Effect::message_with_options(messages::start())))
        }

        (_, Event::Cancel) => Ok(TransitionResult::reset()
            .with_effect(Effect::message_with_options(messages::cancelled()))),

        (current, Event::Help) => Ok(TransitionResult::new(current, session.clone())
            .with_effect(Effect::message_with_options(messages::help()))),

        // ============================================================
        // Category selection
        // ============================================================
        (ConvState::Idle | ConvState::AwaitingCategory, Event::Text { text }) => {
            Ok(select_category(&text))
        }

        // ============================================================
        // Content entry
        // ============================================================

        // A label typed here is a new selection, never content
        (ConvState::AwaitingContent, Event::Text { text })
            if Category::from_label(&text).is_some() =>
        {
            Ok(select_category(&text))
        }

        (ConvState::AwaitingContent, Event::Text { text }) if text.trim().is_empty() => Ok(
            TransitionResult::new(ConvState::AwaitingContent, session.clone())
                .with_effect(Effect::message(messages::empty_content())),
        ),

        (ConvState::AwaitingContent, Event::Text { text }) => {
            submit_content(session, context, text.trim())
        }

        // ============================================================
        // Submission result
        // ============================================================
        (ConvState::AwaitingCategory, Event::SubmissionFinished { label, outcome }) => {
            Ok(report_outcome(&label, &outcome))
        }

        (current, Event::SubmissionFinished { .. }) => Err(TransitionError::InvalidTransition(
            format!("submission result received in {}", current.name()),
        )),
    }
}

fn select_category(text: &str) -> TransitionResult {
    match Category::from_label(text) {
        Some(category) => {
            let label = category.display_label();
            TransitionResult::new(
                ConvState::AwaitingContent,
                SessionContext::selected(category, label),
            )
            .with_effect(Effect::message(messages::selected(label)))
        }
        None => TransitionResult::reset()
            .with_effect(Effect::message_with_options(messages::invalid_selection())),
    }
}

fn submit_content(
    session: &SessionContext,
    context: &ConvContext,
    content: &str,
) -> Result<TransitionResult, TransitionError> {
    let Some(category) = session.selected_category else {
        return Err(TransitionError::InvalidTransition(
            "awaiting content without a selected category".to_string(),
        ));
    };

    if !context.api_available {
        return Ok(TransitionResult::reset()
            .with_effect(Effect::message_with_options(messages::configuration_error())));
    }

    let label = session
        .category_display_name
        .clone()
        .unwrap_or_else(|| category.display_label().to_string());

    Ok(TransitionResult::reset().with_effect(Effect::Submit {
        category,
        label,
        content: content.to_string(),
    }))
}

fn report_outcome(label: &str, outcome: &SubmissionOutcome) -> TransitionResult {
    TransitionResult::reset().with_effect(Effect::message_with_options(
        messages::submission_result(label, outcome),
    ))
}
