use reqwest::Url;

use crate::error::ClyreApiError;

/// Default base URL for a locally running backend.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Trim a configured base URL, falling back to [`DEFAULT_BASE_URL`] when blank.
pub fn normalize_base_url(input: &str) -> String {
    let base = if input.trim().is_empty() {
        DEFAULT_BASE_URL
    } else {
        input.trim()
    };

    base.trim_end_matches('/').to_string()
}

/// Join path segments onto the base URL.
///
/// Segments are percent-encoded individually, so an opaque thread id can never escape its
/// path position.
pub fn endpoint_url<S: AsRef<str>>(base_url: &str, segments: &[S]) -> Result<Url, ClyreApiError> {
    let base = normalize_base_url(base_url);
    let mut url =
        Url::parse(&base).map_err(|error| ClyreApiError::InvalidBaseUrl(format!("{base}: {error}")))?;

    url.path_segments_mut()
        .map_err(|_| ClyreApiError::InvalidBaseUrl(base.clone()))?
        .pop_if_empty()
        .extend(segments.iter().map(AsRef::as_ref));

    Ok(url)
}
