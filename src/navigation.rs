//! Routes and the auth guard in front of them.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use clyre_api::{AuthExpiredHandler, ClyreApiClient};
use tracing::warn;

use crate::ui::UiState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Index,
    Chat { chat_id: String },
}

impl Route {
    /// Parse a location path: `/` or `/{chatId}`.
    pub fn parse(path: &str) -> Self {
        match path.trim().trim_matches('/') {
            "" => Self::Index,
            chat_id => Self::Chat {
                chat_id: chat_id.to_string(),
            },
        }
    }

    pub fn requires_auth(&self) -> bool {
        matches!(self, Self::Chat { .. })
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index => f.write_str("/"),
            Self::Chat { chat_id } => write!(f, "/{chat_id}"),
        }
    }
}

/// Holds the active route and sends the user back to the entry route when auth is lost.
#[derive(Debug)]
pub struct Navigator {
    route: Mutex<Route>,
    ui: Arc<UiState>,
}

impl Navigator {
    pub fn new(ui: Arc<UiState>) -> Self {
        Self {
            route: Mutex::new(Route::Index),
            ui,
        }
    }

    pub fn current(&self) -> Route {
        self.lock().clone()
    }

    /// Navigate to `target`. A route that needs auth without a token triggers one refresh;
    /// if that fails the login prompt opens and the user lands on [`Route::Index`].
    pub async fn navigate(&self, api: &ClyreApiClient, target: Route) -> Route {
        let resolved = if target.requires_auth() && !api.session().is_authenticated() {
            match api.refresh().await {
                Ok(()) => target,
                Err(error) => {
                    warn!(%error, route = %target, "refresh before navigation failed");
                    self.ui.open_login();
                    Route::Index
                }
            }
        } else {
            target
        };

        *self.lock() = resolved.clone();
        resolved
    }

    fn lock(&self) -> MutexGuard<'_, Route> {
        match self.route.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl AuthExpiredHandler for Navigator {
    fn on_auth_expired(&self) {
        *self.lock() = Route::Index;
        self.ui.open_login();
    }
}
