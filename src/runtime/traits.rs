//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::state_machine::{Identity, OutboundMessage};
use crate::telegram::TelegramClient;
use async_trait::async_trait;
use std::sync::Arc;

/// Delivers outbound messages to the chat platform
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send a message to the conversation identified by `identity`
    async fn send_message(
        &self,
        identity: &Identity,
        message: &OutboundMessage,
    ) -> Result<(), String>;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: Messenger + ?Sized> Messenger for Arc<T> {
    async fn send_message(
        &self,
        identity: &Identity,
        message: &OutboundMessage,
    ) -> Result<(), String> {
        (**self).send_message(identity, message).await
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

#[async_trait]
impl Messenger for TelegramClient {
    async fn send_message(
        &self,
        identity: &Identity,
        message: &OutboundMessage,
    ) -> Result<(), String> {
        self.send_text(identity.chat_id, message)
            .await
            .map_err(|e| e.to_string())
    }
}
