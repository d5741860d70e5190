use reqwest::StatusCode;

/// Refresh-and-replay attempts allowed per original request.
pub const MAX_REFRESH_RETRIES: u32 = 1;

/// Per-request refresh bookkeeping, carried with the request across its replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    enabled: bool,
    attempts: u32,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            attempts: 0,
        }
    }
}

impl RefreshPolicy {
    /// Policy for requests that must never trigger a refresh (the auth endpoints).
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            attempts: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn has_retried(&self) -> bool {
        self.attempts >= MAX_REFRESH_RETRIES
    }

    /// Whether a response with `status` should trigger a refresh and replay.
    pub fn should_refresh(&self, status: StatusCode) -> bool {
        status == StatusCode::UNAUTHORIZED && self.enabled && !self.has_retried()
    }

    pub fn record_attempt(&mut self) {
        self.attempts = self.attempts.saturating_add(1);
    }
}
