//! Authentication extractor.
//!
//! The login flow itself is an external collaborator: something else signs a
//! user in and stores a [`CurrentUser`] in the session. The shop only needs
//! "is the caller authenticated" and "who is the caller", which this
//! extractor answers.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, session::keys};

/// Path unauthenticated callers are redirected to.
pub const LOGIN_PATH: &str = "/auth/login";

/// Extractor that requires an authenticated session user.
///
/// If no user is logged in, the handler is never invoked and the caller is
/// redirected to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Rejection for [`RequireAuth`]: redirect to the login page.
pub struct RedirectToLogin;

impl IntoResponse for RedirectToLogin {
    fn into_response(self) -> Response {
        Redirect::to(LOGIN_PATH).into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = RedirectToLogin;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts.extensions.get::<Session>().ok_or(RedirectToLogin)?;

        let user: CurrentUser = session
            .get(keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or(RedirectToLogin)?;

        Ok(Self(user))
    }
}

/// Set the current user in the session.
///
/// This is the seam the external login flow writes through.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::CURRENT_USER, user).await
}

/// Clear the current user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session.remove::<CurrentUser>(keys::CURRENT_USER).await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use tower_sessions::MemoryStore;

    use copperpot_core::UserId;

    use super::*;

    fn session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    #[tokio::test]
    async fn current_user_roundtrips_through_the_session() {
        let session = session();
        let user = CurrentUser {
            id: UserId::new(7),
            username: "ada".to_string(),
        };

        set_current_user(&session, &user).await.unwrap();
        let stored: Option<CurrentUser> = session.get(keys::CURRENT_USER).await.unwrap();
        assert_eq!(stored.unwrap().id, UserId::new(7));

        clear_current_user(&session).await.unwrap();
        let stored: Option<CurrentUser> = session.get(keys::CURRENT_USER).await.unwrap();
        assert!(stored.is_none());
    }
}
