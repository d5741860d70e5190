use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use ndjson_stream::NdjsonStream;

use crate::cancel::{await_or_cancel, CancellationSignal};
use crate::client::{status_error, ApiRequest, ClyreApiClient};
use crate::error::ClyreApiError;
use crate::headers::{build_headers, to_header_map, CONTENT_TYPE_NDJSON};
use crate::models::{ChatRequest, ChatResponse, StreamEvent};
use crate::url::endpoint_url;

/// Decoded `/chat/stream` body.
pub type ChatEventStream = NdjsonStream<StreamEvent, BoxStream<'static, reqwest::Result<Bytes>>>;

impl ClyreApiClient {
    /// Non-streaming chat: `POST /chat/response`.
    pub async fn chat_response(
        &self,
        thread_id: &str,
        message: &str,
    ) -> Result<ChatResponse, ClyreApiError> {
        let request = ApiRequest::post(["chat", "response"]).with_json(&ChatRequest {
            thread_id,
            message,
        })?;
        self.send_json(request).await
    }

    /// Open `POST /chat/stream` with an explicit bearer token.
    ///
    /// This path has no refresh-and-replay: a stale token fails here with the server's
    /// status. A body declared empty fails with `EmptyBody`. No timeout is applied.
    pub async fn open_chat_stream(
        &self,
        thread_id: &str,
        message: &str,
        access_token: &str,
        cancellation: Option<&CancellationSignal>,
    ) -> Result<ChatEventStream, ClyreApiError> {
        if access_token.trim().is_empty() {
            return Err(ClyreApiError::MissingAccessToken);
        }

        let url = endpoint_url(&self.config.base_url, &["chat", "stream"])?;
        let headers = build_headers(&self.config, Some(access_token), CONTENT_TYPE_NDJSON);
        let pending = self
            .http
            .post(url)
            .headers(to_header_map(&headers)?)
            .json(&ChatRequest { thread_id, message })
            .send();

        let response = await_or_cancel(pending, cancellation).await??;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }

        let body = (response.content_length() != Some(0)).then(|| response.bytes_stream().boxed());
        Ok(NdjsonStream::from_body(body)?)
    }
}
