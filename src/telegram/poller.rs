//! Long-polling loop that turns Telegram updates into conversation events

use super::api::TelegramClient;
use super::types::Update;
use crate::runtime::{Messenger, RuntimeManager};
use crate::state_machine::{Event, Identity};
use crate::submission::SubmissionClient;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Pause after a failed poll before trying again
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Map a message text to an event. Commands may carry trailing arguments and
/// a `@botname` suffix; commands addressed to another bot and unknown
/// commands are ignored. Without a known `bot_username` any suffix is accepted.
pub fn parse_event(text: &str, bot_username: Option<&str>) -> Option<Event> {
    let Some(command) = text.strip_prefix('/') else {
        return Some(Event::text(text));
    };

    let word = command.split_whitespace().next().unwrap_or_default();
    let (name, target) = match word.split_once('@') {
        Some((name, target)) => (name, Some(target)),
        None => (word, None),
    };
    if target
        .zip(bot_username)
        .is_some_and(|(target, me)| !target.eq_ignore_ascii_case(me))
    {
        return None;
    }

    match name {
        "start" => Some(Event::Start),
        "help" => Some(Event::Help),
        "cancel" => Some(Event::Cancel),
        _ => None,
    }
}

/// Extract the identity and event from an update, if it carries one
pub fn decode_update(update: &Update, bot_username: Option<&str>) -> Option<(Identity, Event)> {
    let message = update.message.as_ref()?;
    let text = message.text.as_deref()?;
    let chat_id = message.chat.id;
    let user_id = message.from.as_ref().map_or(chat_id, |user| user.id);

    parse_event(text, bot_username).map(|event| (Identity::new(chat_id, user_id), event))
}

/// Poll until `cancel` fires, routing every decoded event to `manager`.
///
/// Events are queued, not awaited, so a slow submission never delays polling.
pub async fn run_polling<C, M>(
    client: &TelegramClient,
    manager: &RuntimeManager<C, M>,
    cancel: CancellationToken,
) where
    C: SubmissionClient + 'static,
    M: Messenger + 'static,
{
    let me = tokio::select! {
        () = cancel.cancelled() => return,
        result = client.get_me() => result,
    };
    let bot_username = match me {
        Ok(me) => me.username,
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Could not look up bot username; accepting any command suffix"
            );
            None
        }
    };

    let mut offset = 0;
    tracing::info!(
        bot = bot_username.as_deref().unwrap_or("unknown"),
        "Polling Telegram for updates"
    );

    loop {
        let updates = tokio::select! {
            () = cancel.cancelled() => break,
            result = client.get_updates(offset) => result,
        };

        let updates = match updates {
            Ok(updates) => updates,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch updates");
                tokio::select! {
                    () = cancel.cancelled() => break,
                    () = tokio::time::sleep(POLL_RETRY_DELAY) => {}
                }
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);

            let Some((identity, event)) = decode_update(&update, bot_username.as_deref()) else {
                tracing::debug!(update_id = update.update_id, "Ignoring update");
                continue;
            };

            if let Err(e) = manager.send_event(identity, event).await {
                tracing::error!(identity = %identity, error = %e, "Failed to route event");
            }
        }
    }

    tracing::info!("Stopped polling");
}
