use clyre_api::{endpoint_url, normalize_base_url, ClyreApiError, DEFAULT_BASE_URL};

#[test]
fn blank_base_url_falls_back_to_default() {
    assert_eq!(normalize_base_url("   "), DEFAULT_BASE_URL);
    assert_eq!(normalize_base_url("http://api.local/"), "http://api.local");
}

#[test]
fn endpoint_url_joins_segments_under_base_path() {
    let url = endpoint_url("http://api.local/v1/", &["thread", "all"]).expect("url");
    assert_eq!(url.as_str(), "http://api.local/v1/thread/all");

    let url = endpoint_url("http://api.local", &["auth", "refresh"]).expect("url");
    assert_eq!(url.as_str(), "http://api.local/auth/refresh");
}

#[test]
fn endpoint_url_encodes_opaque_ids() {
    let url = endpoint_url("http://api.local", &["thread", "a/b c"]).expect("url");
    assert_eq!(url.as_str(), "http://api.local/thread/a%2Fb%20c");
}

#[test]
fn endpoint_url_rejects_unparseable_base() {
    let error = endpoint_url("not a url", &["thread"]).expect_err("invalid base");
    assert!(matches!(error, ClyreApiError::InvalidBaseUrl(_)));
}
