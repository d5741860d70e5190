use std::collections::BTreeMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::config::ClyreApiConfig;
use crate::error::ClyreApiError;

pub const HEADER_ACCEPT: &str = "accept";
pub const HEADER_CONTENT_TYPE: &str = "content-type";
pub const HEADER_AUTHORIZATION: &str = "authorization";
pub const HEADER_USER_AGENT: &str = "user-agent";

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_NDJSON: &str = "application/x-ndjson";

/// Build a deterministic header map for a request.
///
/// `access_token` is attached as a bearer credential when present and non-blank; otherwise
/// the request goes out unauthenticated.
pub fn build_headers(
    config: &ClyreApiConfig,
    access_token: Option<&str>,
    accept: &str,
) -> BTreeMap<String, String> {
    let mut headers = BTreeMap::new();

    if let Some(token) = access_token.map(str::trim).filter(|token| !token.is_empty()) {
        headers.insert(HEADER_AUTHORIZATION.to_owned(), bearer(token));
    }
    headers.insert(HEADER_ACCEPT.to_owned(), accept.to_owned());
    headers.insert(HEADER_CONTENT_TYPE.to_owned(), CONTENT_TYPE_JSON.to_owned());

    let user_agent = config
        .user_agent
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
        .unwrap_or_else(default_user_agent);
    headers.insert(HEADER_USER_AGENT.to_owned(), user_agent);

    for (key, value) in &config.extra_headers {
        headers.insert(key.trim().to_ascii_lowercase(), value.trim().to_owned());
    }

    headers
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token.trim())
}

/// Convert a built header map into reqwest's representation.
pub fn to_header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, ClyreApiError> {
    let mut out = HeaderMap::new();
    for (key, value) in headers {
        out.insert(
            HeaderName::from_bytes(key.as_bytes())
                .map_err(|_| ClyreApiError::InvalidHeader(format!("invalid header key: {key}")))?,
            HeaderValue::from_str(value)
                .map_err(|_| ClyreApiError::InvalidHeader(format!("invalid value for {key}")))?,
        );
    }
    Ok(out)
}

fn default_user_agent() -> String {
    format!("clyre/{}", env!("CARGO_PKG_VERSION"))
}
