//! Headless Clyre chat client.
//!
//! [`ThreadStore`] owns the current conversation and the catalog and applies the assistant
//! stream to them as records arrive. [`Shell`] wires one [`clyre_api::ClyreApiClient`]
//! (and its token session) to the thread store, the prompt flags, and the route guard.

pub mod chat_stream;
pub mod config;
pub mod logging;
pub mod navigation;
pub mod shell;
pub mod thread_store;
pub mod ui;

pub use config::{ConfigError, EnvConfig};
pub use logging::init_logging;
pub use navigation::{Navigator, Route};
pub use shell::{Shell, ShellError, UserProfile};
pub use thread_store::{Conversation, ConversationState, SharedMessages, ThreadStore};
pub use ui::{UiFlags, UiState};
