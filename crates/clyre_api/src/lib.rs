//! HTTP client for the Clyre chat backend.
//!
//! This crate owns the wire contract (JSON models and the NDJSON chat stream), the
//! in-memory [`TokenSession`], and the authenticated transport. Standard calls get bearer
//! injection plus a single refresh-and-replay on `401`; the streaming chat call does not.
//!
//! Nothing here holds conversation state. That lives with the callers.

pub mod auth;
pub mod cancel;
pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod models;
pub mod retry;
pub mod session;
pub mod threads;
pub mod url;
pub mod user;

pub use auth::{Credentials, RegisterCredentials};
pub use cancel::{await_or_cancel, cancel, cancellation_signal, is_cancelled, CancellationSignal};
pub use chat::ChatEventStream;
pub use client::{ApiRequest, ClyreApiClient};
pub use config::ClyreApiConfig;
pub use error::ClyreApiError;
pub use models::{
    ChatResponse, ConversationSummary, Message, MessageRole, StreamEvent, StreamEventKind,
    ThreadHistory, User,
};
pub use reqwest::StatusCode;
pub use session::{AuthExpiredHandler, SessionState, TokenSession};
pub use url::{endpoint_url, normalize_base_url, DEFAULT_BASE_URL};
