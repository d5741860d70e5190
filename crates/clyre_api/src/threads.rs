use reqwest::StatusCode;

use crate::client::{ApiRequest, ClyreApiClient};
use crate::error::ClyreApiError;
use crate::models::{ConversationSummary, ThreadHistory, ThreadList};

impl ClyreApiClient {
    /// `GET /thread/all`. A `404` is returned as an error; callers decide what it means.
    pub async fn list_threads(&self) -> Result<Vec<ConversationSummary>, ClyreApiError> {
        let list: ThreadList = self.send_json(ApiRequest::get(["thread", "all"])).await?;
        Ok(list.threads)
    }

    pub async fn thread_history(&self, thread_id: &str) -> Result<ThreadHistory, ClyreApiError> {
        self.send_json(ApiRequest::get(["thread", thread_id])).await
    }

    /// `DELETE /thread/{id}`, returning the success status the server answered with.
    pub async fn delete_thread(&self, thread_id: &str) -> Result<StatusCode, ClyreApiError> {
        self.send_for_status(ApiRequest::delete(["thread", thread_id]))
            .await
    }
}
