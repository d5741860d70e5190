use std::sync::Arc;

use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ClyreApiConfig;
use crate::error::{parse_error_message, ClyreApiError};
use crate::headers::{build_headers, to_header_map, CONTENT_TYPE_JSON};
use crate::retry::RefreshPolicy;
use crate::session::{AuthExpiredHandler, TokenSession};
use crate::url::endpoint_url;

/// A standard request/response call, replayable after a token refresh.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    segments: Vec<String>,
    body: Option<Value>,
    refresh: RefreshPolicy,
}

impl ApiRequest {
    pub fn new<I, S>(method: Method, segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            method,
            segments: segments.into_iter().map(Into::into).collect(),
            body: None,
            refresh: RefreshPolicy::default(),
        }
    }

    pub fn get<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::GET, segments)
    }

    pub fn post<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::POST, segments)
    }

    pub fn delete<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Method::DELETE, segments)
    }

    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ClyreApiError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Opt out of the refresh-and-replay path.
    pub fn without_refresh(mut self) -> Self {
        self.refresh = RefreshPolicy::disabled();
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }

    pub fn refresh_policy(&self) -> RefreshPolicy {
        self.refresh
    }
}

pub struct ClyreApiClient {
    pub(crate) http: Client,
    pub(crate) config: ClyreApiConfig,
    pub(crate) session: Arc<TokenSession>,
    auth_expired: Option<Arc<dyn AuthExpiredHandler>>,
}

impl std::fmt::Debug for ClyreApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClyreApiClient")
            .field("config", &self.config)
            .field("session", &self.session.state())
            .finish_non_exhaustive()
    }
}

impl ClyreApiClient {
    pub fn new(config: ClyreApiConfig) -> Result<Self, ClyreApiError> {
        Self::with_session(config, Arc::new(TokenSession::new()))
    }

    pub fn with_session(
        config: ClyreApiConfig,
        session: Arc<TokenSession>,
    ) -> Result<Self, ClyreApiError> {
        endpoint_url::<&str>(&config.base_url, &[])?;
        let http = Client::builder()
            .cookie_store(true)
            .build()
            .map_err(ClyreApiError::from)?;
        Ok(Self {
            http,
            config,
            session,
            auth_expired: None,
        })
    }

    pub fn with_auth_expired_handler(mut self, handler: Arc<dyn AuthExpiredHandler>) -> Self {
        self.auth_expired = Some(handler);
        self
    }

    pub fn config(&self) -> &ClyreApiConfig {
        &self.config
    }

    pub fn session(&self) -> &Arc<TokenSession> {
        &self.session
    }

    /// Build the reqwest request for one dispatch of `request`, reading the current token.
    pub fn build_request(&self, request: &ApiRequest) -> Result<reqwest::RequestBuilder, ClyreApiError> {
        let url = endpoint_url(&self.config.base_url, &request.segments)?;
        let token = self.session.access_token();
        let headers = build_headers(&self.config, token.as_deref(), CONTENT_TYPE_JSON);

        let mut builder = self
            .http
            .request(request.method.clone(), url)
            .headers(to_header_map(&headers)?);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(timeout) = self.config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder)
    }

    /// Dispatch `request` once, mapping a non-success status to [`ClyreApiError::Status`].
    ///
    /// Never refreshes; the auth endpoints go through here directly.
    pub async fn execute(&self, request: &ApiRequest) -> Result<Response, ClyreApiError> {
        let response = self.build_request(request)?.send().await?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(status_error(response).await)
        }
    }

    pub(crate) async fn execute_json<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
    ) -> Result<T, ClyreApiError> {
        let response = self.execute(request).await?;
        decode_json(response).await
    }

    /// Send a standard request, refreshing the token and replaying once on `401`.
    ///
    /// If the refresh fails the session is ended, the auth-expired hook runs, and the
    /// original `401` error is returned. A `401` on the replay is returned as is.
    pub async fn send(&self, mut request: ApiRequest) -> Result<Response, ClyreApiError> {
        loop {
            let error = match self.execute(&request).await {
                Ok(response) => return Ok(response),
                Err(error) => error,
            };

            let should_refresh = error
                .status()
                .is_some_and(|status| request.refresh.should_refresh(status));
            if !should_refresh {
                return Err(error);
            }

            request.refresh.record_attempt();
            tracing::debug!(path = %request.path(), "access token rejected; refreshing");
            self.session.clear();

            if let Err(refresh_error) = self.refresh().await {
                tracing::warn!(%refresh_error, "token refresh failed; ending session");
                self.logout().await;
                if let Some(handler) = &self.auth_expired {
                    handler.on_auth_expired();
                }
                return Err(error);
            }
        }
    }

    pub async fn send_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ClyreApiError> {
        let response = self.send(request).await?;
        decode_json(response).await
    }

    /// Send a request and report the success status without reading a typed body.
    pub async fn send_for_status(&self, request: ApiRequest) -> Result<StatusCode, ClyreApiError> {
        let response = self.send(request).await?;
        Ok(response.status())
    }
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, ClyreApiError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub(crate) async fn status_error(response: Response) -> ClyreApiError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    ClyreApiError::Status {
        status,
        message: parse_error_message(status, &body),
    }
}
