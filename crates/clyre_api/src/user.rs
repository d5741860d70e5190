use crate::client::{ApiRequest, ClyreApiClient};
use crate::error::ClyreApiError;
use crate::models::User;

impl ClyreApiClient {
    pub async fn current_user(&self) -> Result<User, ClyreApiError> {
        self.send_json(ApiRequest::get(["user", "me"])).await
    }
}
