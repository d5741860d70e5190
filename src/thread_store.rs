//! Current-conversation slot plus the conversation catalog.
//!
//! The message list of the current conversation is shared (`Arc<Mutex<Vec<Message>>>`).
//! A stream appends to the list it started with; switching threads mid-stream swaps the
//! summary fields but keeps that list, so a caller watching it keeps seeing the appends.

use std::sync::{Arc, Mutex, MutexGuard};

use clyre_api::{
    ClyreApiClient, ClyreApiError, ConversationSummary, Message, MessageRole, StatusCode,
    ThreadHistory,
};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::debug;

pub type SharedMessages = Arc<Mutex<Vec<Message>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversationState {
    Empty,
    Loaded,
    Generating,
}

/// Handle on a conversation: a summary snapshot plus the live message list.
#[derive(Debug, Clone)]
pub struct Conversation {
    pub summary: ConversationSummary,
    pub messages: SharedMessages,
}

impl Conversation {
    /// Fresh, unsaved conversation stamped with the current time.
    pub fn empty() -> Self {
        let now = now_timestamp();
        Self {
            summary: ConversationSummary {
                id: String::new(),
                title: String::new(),
                creation_time: now.clone(),
                update_time: now,
            },
            messages: Arc::default(),
        }
    }

    fn from_history(history: ThreadHistory) -> Self {
        Self {
            summary: history.summary,
            messages: Arc::new(Mutex::new(history.messages)),
        }
    }

    pub fn id(&self) -> &str {
        &self.summary.id
    }

    /// Copy of the messages as they are right now.
    pub fn messages(&self) -> Vec<Message> {
        lock_unpoisoned(&self.messages).clone()
    }

    pub fn shares_messages_with(&self, other: &Conversation) -> bool {
        Arc::ptr_eq(&self.messages, &other.messages)
    }
}

#[derive(Debug)]
struct ThreadState {
    threads_meta: Vec<ConversationSummary>,
    current: Conversation,
    is_generating: bool,
}

/// Owns the current conversation, the catalog, and the generating flag.
#[derive(Debug)]
pub struct ThreadStore {
    pub(crate) api: Arc<ClyreApiClient>,
    state: Mutex<ThreadState>,
}

impl ThreadStore {
    pub fn new(api: Arc<ClyreApiClient>) -> Self {
        Self {
            api,
            state: Mutex::new(ThreadState {
                threads_meta: Vec::new(),
                current: Conversation::empty(),
                is_generating: false,
            }),
        }
    }

    pub fn api(&self) -> &Arc<ClyreApiClient> {
        &self.api
    }

    pub fn threads_meta(&self) -> Vec<ConversationSummary> {
        self.lock().threads_meta.clone()
    }

    pub fn current(&self) -> Conversation {
        self.lock().current.clone()
    }

    pub fn current_id(&self) -> String {
        self.lock().current.summary.id.clone()
    }

    pub fn is_generating(&self) -> bool {
        self.lock().is_generating
    }

    pub fn conversation_state(&self) -> ConversationState {
        let state = self.lock();
        if state.is_generating {
            ConversationState::Generating
        } else if state.current.summary.is_unsaved() {
            ConversationState::Empty
        } else {
            ConversationState::Loaded
        }
    }

    /// Reload the catalog. `404` means the user has no threads yet.
    pub async fn refresh_catalog(&self) -> Result<(), ClyreApiError> {
        let threads = match self.api.list_threads().await {
            Ok(threads) => threads,
            Err(error) if error.is_not_found() => {
                debug!("no threads yet");
                Vec::new()
            }
            Err(error) => return Err(error),
        };
        self.lock().threads_meta = threads;
        Ok(())
    }

    pub fn clear_catalog(&self) {
        self.lock().threads_meta.clear();
    }

    /// Open `summary` as the current conversation.
    ///
    /// While generating, only the summary fields are taken from the server and the live
    /// message list stays in place.
    pub async fn select_thread(&self, summary: &ConversationSummary) -> Result<(), ClyreApiError> {
        let history = self.api.thread_history(&summary.id).await?;
        let mut state = self.lock();
        if state.is_generating {
            debug!(thread_id = %history.summary.id, "keeping in-flight messages on thread switch");
            state.current.summary = history.summary;
        } else {
            state.current = Conversation::from_history(history);
        }
        Ok(())
    }

    /// Re-fetch the current conversation and replace it wholesale.
    pub async fn refresh_current(&self) -> Result<(), ClyreApiError> {
        let id = self.current_id();
        let history = self.api.thread_history(&id).await?;
        self.lock().current = Conversation::from_history(history);
        Ok(())
    }

    pub fn clear_current(&self) {
        self.lock().current = Conversation::empty();
    }

    /// Delete the current conversation on the server.
    ///
    /// Only a `200` counts as deleted; any other outcome leaves state untouched.
    pub async fn delete_current(&self) -> Result<(), ClyreApiError> {
        let id = self.current_id();
        let status = self.api.delete_thread(&id).await?;
        if status != StatusCode::OK {
            return Err(ClyreApiError::UnexpectedStatus(status));
        }
        self.clear_current();
        self.refresh_catalog().await
    }

    pub fn append_user_message(&self, text: impl Into<String>) {
        self.push_message(Message::user(text));
    }

    pub fn append_assistant_message(&self, text: impl Into<String>) {
        self.push_message(Message::assistant(text));
    }

    /// Extend the trailing assistant message, or start one.
    pub fn append_assistant_chunk(&self, text: &str) {
        let messages = self.messages_handle();
        let mut messages = lock_unpoisoned(&messages);
        if let Some(last) = messages.last_mut() {
            if last.role == MessageRole::Assistant {
                last.content.push_str(text);
                return;
            }
        }
        messages.push(Message::assistant(text));
    }

    /// Non-streaming fallback through `POST /chat/response`.
    pub async fn generate_assistant_message(&self, prompt: &str) -> Result<(), ClyreApiError> {
        let id = self.current_id();
        let reply = self.api.chat_response(&id, prompt).await?;
        {
            let mut state = self.lock();
            state.current.summary.id = reply.thread_id;
            state.current.summary.update_time = now_timestamp();
        }
        self.append_assistant_message(reply.response);
        Ok(())
    }

    pub(crate) fn begin_generation(&self) -> GenerationGuard<'_> {
        self.lock().is_generating = true;
        GenerationGuard { store: self }
    }

    /// Adopt a server-assigned id for an unsaved conversation. Returns whether it was taken.
    pub(crate) fn adopt_conversation_id(&self, id: &str) -> bool {
        let mut state = self.lock();
        if !state.current.summary.is_unsaved() {
            return false;
        }
        state.current.summary.id = id.to_string();
        true
    }

    pub(crate) fn touch_update_time(&self) {
        self.lock().current.summary.update_time = now_timestamp();
    }

    fn push_message(&self, message: Message) {
        let messages = self.messages_handle();
        lock_unpoisoned(&messages).push(message);
    }

    fn messages_handle(&self) -> SharedMessages {
        Arc::clone(&self.lock().current.messages)
    }

    fn lock(&self) -> MutexGuard<'_, ThreadState> {
        lock_unpoisoned(&self.state)
    }
}

/// Clears the generating flag when dropped.
pub(crate) struct GenerationGuard<'a> {
    store: &'a ThreadStore,
}

impl Drop for GenerationGuard<'_> {
    fn drop(&mut self) {
        self.store.lock().is_generating = false;
    }
}

pub fn now_timestamp() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}

fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}
