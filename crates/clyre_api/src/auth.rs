//! Token session transitions: login, register, refresh, logout.

use serde::Serialize;

use crate::client::{ApiRequest, ClyreApiClient};
use crate::error::ClyreApiError;
use crate::models::AuthResponse;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisterCredentials {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl ClyreApiClient {
    pub async fn login(&self, credentials: &Credentials) -> Result<(), ClyreApiError> {
        let request = ApiRequest::post(["auth", "login"])
            .with_json(credentials)?
            .without_refresh();
        let result = self.execute_json::<AuthResponse>(&request).await;
        self.adopt_token(result)
    }

    pub async fn register(&self, credentials: &RegisterCredentials) -> Result<(), ClyreApiError> {
        let request = ApiRequest::post(["auth", "register"])
            .with_json(credentials)?
            .without_refresh();
        let result = self.execute_json::<AuthResponse>(&request).await;
        self.adopt_token(result)
    }

    /// Silently re-authenticate using the refresh cookie held by the HTTP client.
    ///
    /// On failure the session ends up unauthenticated and the error is returned so callers
    /// can decide whether to prompt for login.
    pub async fn refresh(&self) -> Result<(), ClyreApiError> {
        let request = ApiRequest::post(["auth", "refresh"]).without_refresh();
        let result = self.execute_json::<AuthResponse>(&request).await;
        self.adopt_token(result)
    }

    /// Notify the server (best effort), then end the session unconditionally.
    pub async fn logout(&self) {
        let request = ApiRequest::post(["auth", "logout"]).without_refresh();
        if let Err(error) = self.execute(&request).await {
            tracing::debug!(%error, "logout notification failed");
        }
        self.session.clear();
    }

    fn adopt_token(&self, result: Result<AuthResponse, ClyreApiError>) -> Result<(), ClyreApiError> {
        match result {
            Ok(response) => {
                self.session.authenticate(response.token);
                Ok(())
            }
            Err(error) => {
                self.session.clear();
                Err(error)
            }
        }
    }
}
