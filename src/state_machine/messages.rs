//! User-facing message texts (Telegram Markdown)

use crate::submission::SubmissionOutcome;

/// Telegram rejects messages over 4096 UTF-16 units; the echoed response is
/// kept well below that so the status line always gets through.
const MAX_RESPONSE_UNITS: usize = 3500;

pub fn start() -> String {
    "🚀 *Bucket Bot Ready!*\n\nSelect entry type:".to_string()
}

pub fn invalid_selection() -> String {
    "❌ Invalid selection. Please choose Task, Note, or Bookmark.".to_string()
}

pub fn selected(label: &str) -> String {
    format!(
        "✅ Selected: *{label}*\n\nNow enter your {} content:",
        label.to_lowercase()
    )
}

pub fn empty_content() -> String {
    "❌ Content cannot be empty. Please enter some text:".to_string()
}

pub fn configuration_error() -> String {
    "❌ API configuration error. Please restart the bot with /start".to_string()
}

pub fn cancelled() -> String {
    "Operation cancelled. Use /start to begin again.".to_string()
}

pub fn help() -> String {
    "🤖 *Bucket Bot Help*\n\n\
     1. Select an entry type: Task, Note, or Bookmark\n\
     2. Enter your content\n\
     3. Bot posts it and shows the result\n\
     4. Repeat!\n\n\
     Commands:\n\
     /start - Begin using the bot\n\
     /help - Show this help message\n\
     /cancel - Cancel the current entry\n\n\
     Ready to post!"
        .to_string()
}

/// Report for a finished submission; always includes status and response
pub fn submission_result(label: &str, outcome: &SubmissionOutcome) -> String {
    match outcome {
        SubmissionOutcome::Accepted {
            status_code,
            body_text,
        } => format!(
            "✅ *{label} posted successfully!*\n\n\
             Status: {status_code}\n\
             Response: {}\n\n\
             Select next entry type:",
            clip_response(body_text)
        ),
        SubmissionOutcome::Rejected {
            status_code,
            body_text,
        } => failure(label, *status_code, body_text),
        SubmissionOutcome::TransportFailure { diagnostic } => {
            failure(label, 0, &format!("Network error: {diagnostic}"))
        }
    }
}

fn failure(label: &str, status_code: u16, response: &str) -> String {
    format!(
        "❌ *Failed to post {}*\n\n\
         Status: {status_code}\n\
         Response: {}\n\n\
         Please try again or select a different type:",
        label.to_lowercase(),
        clip_response(response)
    )
}

fn clip_response(response: &str) -> String {
    if response.encode_utf16().count() <= MAX_RESPONSE_UNITS {
        return response.to_string();
    }
    let mut used = 0;
    let mut clipped: String = response
        .chars()
        .take_while(|c| {
            used += c.len_utf16();
            used < MAX_RESPONSE_UNITS
        })
        .collect();
    clipped.push('…');
    clipped
}
