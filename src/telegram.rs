//! Telegram chat transport
//!
//! Decodes Bot API updates into conversation events and renders outbound
//! messages, with the category options as a reply keyboard.

mod api;
mod poller;
mod types;

pub use api::{TelegramClient, DEFAULT_API_URL};
pub use poller::run_polling;
