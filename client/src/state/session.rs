//! Who is signed in, as resolved by one "who am I" query per page load.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use leptos::prelude::*;

use crate::net::types::UserProfile;

/// Session as the UI sees it.
///
/// Starts as `Loading` on both server and browser so hydration matches; the
/// browser then resolves it once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Loading,
    Anonymous,
    Authenticated(UserProfile),
}

impl SessionState {
    /// Resolve the result of a "who am I" query. Any failure is anonymous.
    pub fn from_lookup(user: Option<UserProfile>) -> Self {
        match user {
            Some(user) => Self::Authenticated(user),
            None => Self::Anonymous,
        }
    }

    pub fn user(&self) -> Option<&UserProfile> {
        match self {
            Self::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Re-run the "who am I" query and store the outcome.
pub fn refresh_session(session: RwSignal<SessionState>) {
    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        let user = crate::net::api::fetch_current_user().await;
        if user.is_none() {
            log::debug!("no active session");
        }
        session.set(SessionState::from_lookup(user));
    });
    #[cfg(not(feature = "hydrate"))]
    let _ = session;
}
