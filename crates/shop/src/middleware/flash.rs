//! One-shot flash messages carried in the session.
//!
//! Used by handlers that redirect after a failure the user should see on
//! the next page, e.g. deleting a product that no longer exists. Messages
//! accumulate in the session and are drained by the next render.

use tower_sessions::Session;

use crate::models::session::keys;

/// Append a message to the session's flash list.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn push_message(
    session: &Session,
    message: &str,
) -> Result<(), tower_sessions::session::Error> {
    let mut messages: Vec<String> = session
        .get(keys::FLASH_MESSAGES)
        .await
        .ok()
        .flatten()
        .unwrap_or_default();
    messages.push(message.to_owned());
    session.insert(keys::FLASH_MESSAGES, messages).await
}

/// Drain all pending flash messages.
///
/// Returns an empty list when there is nothing to show (or the session is
/// unreadable; flash messages are best-effort).
pub async fn take_messages(session: &Session) -> Vec<String> {
    session
        .remove::<Vec<String>>(keys::FLASH_MESSAGES)
        .await
        .ok()
        .flatten()
        .unwrap_or_default()
}
