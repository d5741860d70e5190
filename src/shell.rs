//! Process-wide wiring: one API client, one session, and the state objects built on them.

use std::sync::{Arc, Mutex, MutexGuard};

use clyre_api::{
    CancellationSignal, ClyreApiClient, ClyreApiConfig, ClyreApiError, Credentials,
    RegisterCredentials, SessionState, StreamEvent, User,
};
use futures_util::Stream;
use thiserror::Error;
use tracing::{info, warn};

use crate::navigation::{Navigator, Route};
use crate::thread_store::ThreadStore;
use crate::ui::UiState;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    #[error(transparent)]
    Api(#[from] ClyreApiError),
}

/// Cached `GET /user/me` result.
#[derive(Debug, Default)]
pub struct UserProfile {
    user: Mutex<Option<User>>,
}

impl UserProfile {
    pub fn current(&self) -> Option<User> {
        self.lock().clone()
    }

    pub async fn load(&self, api: &ClyreApiClient) -> Result<User, ClyreApiError> {
        let user = api.current_user().await?;
        *self.lock() = Some(user.clone());
        Ok(user)
    }

    pub fn clear(&self) {
        *self.lock() = None;
    }

    fn lock(&self) -> MutexGuard<'_, Option<User>> {
        match self.user.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[derive(Debug)]
pub struct Shell {
    pub api: Arc<ClyreApiClient>,
    pub threads: ThreadStore,
    pub ui: Arc<UiState>,
    pub navigator: Arc<Navigator>,
    pub profile: UserProfile,
}

impl Shell {
    pub fn new(config: ClyreApiConfig) -> Result<Self, ShellError> {
        let ui = Arc::new(UiState::new());
        let navigator = Arc::new(Navigator::new(Arc::clone(&ui)));
        let api = Arc::new(
            ClyreApiClient::new(config)?.with_auth_expired_handler(navigator.clone()),
        );

        Ok(Self {
            threads: ThreadStore::new(Arc::clone(&api)),
            api,
            ui,
            navigator,
            profile: UserProfile::default(),
        })
    }

    pub fn session_state(&self) -> SessionState {
        self.api.session().state()
    }

    /// Startup: one silent refresh. Failure opens the login prompt instead of erroring.
    pub async fn bootstrap(&self) -> SessionState {
        match self.api.refresh().await {
            Ok(()) => info!("session restored"),
            Err(error) => {
                warn!(%error, "no session to restore");
                self.ui.open_login();
            }
        }
        self.session_state()
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<(), ClyreApiError> {
        if let Err(error) = self.api.login(credentials).await {
            self.ui.set_login_error(error.to_string());
            return Err(error);
        }
        self.ui.clear_errors();
        self.ui.close_modal();
        self.after_sign_in().await
    }

    pub async fn register(&self, credentials: &RegisterCredentials) -> Result<(), ClyreApiError> {
        if let Err(error) = self.api.register(credentials).await {
            self.ui.set_register_error(error.to_string());
            return Err(error);
        }
        self.ui.clear_errors();
        self.ui.close_modal();
        self.after_sign_in().await
    }

    /// End the session and drop everything that belonged to it.
    pub async fn logout(&self) {
        self.api.logout().await;
        self.threads.clear_catalog();
        self.threads.clear_current();
        self.profile.clear();
        self.navigator.navigate(&self.api, Route::Index).await;
    }

    /// Append the user's prompt and stream the assistant reply into the current conversation.
    pub fn ask(
        &self,
        prompt: &str,
        cancellation: Option<CancellationSignal>,
    ) -> impl Stream<Item = StreamEvent> + '_ {
        self.threads.append_user_message(prompt);
        let token = self.api.session().access_token().unwrap_or_default();
        self.threads
            .assistant_stream(prompt.to_string(), token, cancellation)
    }

    async fn after_sign_in(&self) -> Result<(), ClyreApiError> {
        self.profile.load(&self.api).await?;
        self.threads.refresh_catalog().await
    }
}
