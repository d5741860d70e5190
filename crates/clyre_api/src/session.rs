use std::sync::{Mutex, MutexGuard};

/// Authentication state derived from the held token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
}

/// Process-wide, in-memory holder of the access token.
///
/// Starts unauthenticated. Only the auth calls on [`crate::ClyreApiClient`] move it between
/// states; everything else reads.
#[derive(Debug, Default)]
pub struct TokenSession {
    access_token: Mutex<Option<String>>,
}

impl TokenSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn access_token(&self) -> Option<String> {
        self.lock().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.lock().is_some()
    }

    pub fn state(&self) -> SessionState {
        if self.is_authenticated() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        }
    }

    pub(crate) fn authenticate(&self, token: String) {
        *self.lock() = Some(token);
    }

    pub(crate) fn clear(&self) {
        *self.lock() = None;
    }

    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        match self.access_token.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Hook run when a refresh after a `401` fails and the session has been ended.
///
/// Implementations send the user back to the application's entry point.
pub trait AuthExpiredHandler: Send + Sync {
    fn on_auth_expired(&self);
}
