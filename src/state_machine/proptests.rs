//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::*;
use crate::submission::{Category, SubmissionOutcome};
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> ConvContext {
    ConvContext::new(Identity::new(7, 7), true)
}

/// Apply an inbound event, resolving any `Submit` effect with `outcome`
/// the way the runtime does. Returns every message produced.
fn drive(
    state: &mut ConvState,
    session: &mut SessionContext,
    ctx: &ConvContext,
    event: Event,
    outcome: &SubmissionOutcome,
) -> Vec<OutboundMessage> {
    let mut messages = Vec::new();
    let mut pending = vec![event];

    while let Some(current) = pending.pop() {
        let result = transition(state, session, ctx, current).expect("valid transition");
        *state = result.new_state;
        *session = result.new_session;

        for effect in result.effects {
            match effect {
                Effect::SendMessage(message) => messages.push(message),
                Effect::Submit { label, .. } => pending.push(Event::SubmissionFinished {
                    label,
                    outcome: outcome.clone(),
                }),
            }
        }
    }

    messages
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_label() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Task".to_string()),
        Just("Note".to_string()),
        Just("Bookmark".to_string()),
    ]
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_label(),
        "[ \t\n]{0,5}",
        "[a-zA-Z0-9 ]{1,30}",
        Just("task".to_string()),
        Just(" Note ".to_string()),
    ]
}

fn arb_inbound_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        Just(Event::Start),
        Just(Event::Help),
        Just(Event::Cancel),
        arb_text().prop_map(Event::text),
    ]
}

fn arb_outcome() -> impl Strategy<Value = SubmissionOutcome> {
    prop_oneof![
        (200u16..300, "[a-z]{0,10}").prop_map(|(s, b)| SubmissionOutcome::from_response(s, b)),
        (300u16..600, "[a-z]{0,10}").prop_map(|(s, b)| SubmissionOutcome::from_response(s, b)),
        "[a-z ]{1,20}".prop_map(SubmissionOutcome::transport_failure),
    ]
}

fn arb_category() -> impl Strategy<Value = Category> {
    prop_oneof![
        Just(Category::Task),
        Just(Category::Note),
        Just(Category::Bookmark),
    ]
}

/// Any state paired with a session that satisfies the invariant
fn arb_consistent() -> impl Strategy<Value = (ConvState, SessionContext)> {
    prop_oneof![
        Just((ConvState::AwaitingCategory, SessionContext::default())),
        Just((ConvState::Idle, SessionContext::default())),
        arb_category().prop_map(|c| {
            (
                ConvState::AwaitingContent,
                SessionContext::selected(c, c.display_label()),
            )
        }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Invariant 1: category selected iff awaiting content, after every event
    #[test]
    fn prop_session_matches_state(
        events in proptest::collection::vec(arb_inbound_event(), 0..30),
        outcome in arb_outcome(),
        api_available in any::<bool>(),
    ) {
        let ctx = ConvContext::new(Identity::new(1, 2), api_available);
        let mut state = ConvState::default();
        let mut session = SessionContext::default();

        for event in events {
            drive(&mut state, &mut session, &ctx, event, &outcome);
            prop_assert!(
                session.is_consistent_with(state),
                "state {:?} with session {:?}", state, session
            );
        }
    }

    // Invariant 2: every inbound event yields exactly one message
    #[test]
    fn prop_one_message_per_event(
        (start_state, start_session) in arb_consistent(),
        event in arb_inbound_event(),
        outcome in arb_outcome(),
    ) {
        let mut state = start_state;
        let mut session = start_session;
        let messages = drive(&mut state, &mut session, &test_context(), event, &outcome);
        prop_assert_eq!(messages.len(), 1);
    }

    // Invariant 3: Start always lands on a clean category prompt
    #[test]
    fn prop_start_resets((state, session) in arb_consistent()) {
        let result = transition(&state, &session, &test_context(), Event::Start).unwrap();
        prop_assert_eq!(result.new_state, ConvState::AwaitingCategory);
        prop_assert!(result.new_session.is_empty());
        prop_assert_eq!(result.effects.len(), 1);
        prop_assert!(result.effects[0].as_message().is_some_and(|m| m.options.is_some()));
    }

    // Invariant 4: Help never changes state or session, however often it repeats
    #[test]
    fn prop_help_is_idempotent((state, session) in arb_consistent(), repeats in 1usize..4) {
        let ctx = test_context();
        let mut current = (state, session.clone());
        for _ in 0..repeats {
            let result = transition(&current.0, &current.1, &ctx, Event::Help).unwrap();
            current = (result.new_state, result.new_session);
        }
        prop_assert_eq!(current.0, state);
        prop_assert_eq!(current.1, session);
    }

    // Invariant 5: non-empty, non-label content always ends the cycle
    #[test]
    fn prop_content_always_returns_to_category(
        category in arb_category(),
        content in "[a-z]{1,10}( [a-z]{1,10}){0,3}",
        outcome in arb_outcome(),
        api_available in any::<bool>(),
    ) {
        let ctx = ConvContext::new(Identity::new(3, 4), api_available);
        let mut state = ConvState::AwaitingContent;
        let mut session = SessionContext::selected(category, category.display_label());

        let messages = drive(&mut state, &mut session, &ctx, Event::text(content), &outcome);

        prop_assert_eq!(state, ConvState::AwaitingCategory);
        prop_assert!(session.is_empty());
        prop_assert_eq!(messages.len(), 1);
    }

    // Invariant 6: failures surface their diagnostic to the user
    #[test]
    fn prop_outcome_detail_is_reported(outcome in arb_outcome()) {
        let mut state = ConvState::AwaitingContent;
        let mut session = SessionContext::selected(Category::Task, "Task");
        let messages = drive(&mut state, &mut session, &test_context(), Event::text("do it"), &outcome);

        let text = &messages[0].text;
        match &outcome {
            SubmissionOutcome::Accepted { status_code, body_text }
            | SubmissionOutcome::Rejected { status_code, body_text } => {
                let status_line = format!("Status: {status_code}");
                prop_assert!(text.contains(&status_line));
                prop_assert!(text.contains(body_text.as_str()));
            }
            SubmissionOutcome::TransportFailure { diagnostic } => {
                prop_assert!(text.contains(diagnostic.as_str()));
            }
        }
    }
}

#[test]
fn test_submit_effect_carries_trimmed_content() {
    let result = transition(
        &ConvState::AwaitingContent,
        &SessionContext::selected(Category::Note, "Note"),
        &test_context(),
        Event::text("\tbuy milk  "),
    )
    .unwrap();

    assert!(matches!(
        &result.effects[..],
        [Effect::Submit { category: Category::Note, content, .. }] if content == "buy milk"
    ));
}
