use clyre_api::retry::{RefreshPolicy, MAX_REFRESH_RETRIES};
use reqwest::StatusCode;

#[test]
fn refresh_is_triggered_only_by_unauthorized() {
    let policy = RefreshPolicy::default();
    assert!(policy.should_refresh(StatusCode::UNAUTHORIZED));
    assert!(!policy.should_refresh(StatusCode::FORBIDDEN));
    assert!(!policy.should_refresh(StatusCode::INTERNAL_SERVER_ERROR));
}

#[test]
fn refresh_is_allowed_once_per_request() {
    let mut policy = RefreshPolicy::default();
    for _ in 0..MAX_REFRESH_RETRIES {
        policy.record_attempt();
    }
    assert!(policy.has_retried());
    assert!(!policy.should_refresh(StatusCode::UNAUTHORIZED));
}

#[test]
fn disabled_policy_never_refreshes() {
    let policy = RefreshPolicy::disabled();
    assert!(!policy.is_enabled());
    assert!(!policy.should_refresh(StatusCode::UNAUTHORIZED));
}
