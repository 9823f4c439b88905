//! Core conversation state machine
//!
//! Implements the Elm Architecture pattern with pure state transitions.

mod effect;
pub mod event;
mod messages;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::{Effect, OutboundMessage};
pub use event::Event;
pub use state::{ConvContext, ConvState, Identity, SessionContext};
pub use transition::transition;
