//! Session-related types.
//!
//! Types stored in the session. The login flow that writes [`CurrentUser`]
//! lives outside this service; the shop only reads it.

use serde::{Deserialize, Serialize};

use copperpot_core::UserId;

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// User's display name.
    pub username: String,
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for one-shot flash messages drained by the next page render.
    pub const FLASH_MESSAGES: &str = "flash_messages";
}
