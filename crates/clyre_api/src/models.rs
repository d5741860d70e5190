use serde::{Deserialize, Serialize};

/// Catalog entry for one conversation. An empty `id` marks an unsaved conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "creationDate", alias = "creationTime", default)]
    pub creation_time: String,
    #[serde(default)]
    pub update_time: String,
}

impl ConversationSummary {
    pub fn is_unsaved(&self) -> bool {
        self.id.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    Thinking,
    System,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    #[serde(default)]
    pub content: String,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }
}

/// Full conversation as served by `GET /thread/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadHistory {
    #[serde(flatten)]
    pub summary: ConversationSummary,
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ThreadList {
    #[serde(default)]
    pub threads: Vec<ConversationSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChatRequest<'a> {
    pub thread_id: &'a str,
    pub message: &'a str,
}

/// Reply of the non-streaming chat endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    pub response: String,
    #[serde(alias = "thread_id")]
    pub thread_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct AuthResponse {
    pub token: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Normalized kind of a [`StreamEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEventKind {
    UserMessageCommitted,
    AssistantMessageCommitted,
    Chunk,
    Done,
    Unknown,
}

impl StreamEventKind {
    pub fn parse(value: &str) -> Self {
        match value {
            "user_message_insert" | "user_message_committed" => Self::UserMessageCommitted,
            "assistant_message_insert" | "assistant_message_committed" => {
                Self::AssistantMessageCommitted
            }
            "new_chunk" | "chunk" => Self::Chunk,
            "done" => Self::Done,
            _ => Self::Unknown,
        }
    }
}

/// One record of the NDJSON chat stream.
///
/// The raw `event` string is kept as sent so unknown kinds pass through untouched. A line
/// that failed to parse decodes to `StreamEvent::default()`, whose kind is
/// [`StreamEventKind::Unknown`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamEvent {
    #[serde(default)]
    pub event: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chunk: Option<String>,
    #[serde(
        default,
        alias = "conversationId",
        alias = "thread_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub thread_id: Option<String>,
}

impl StreamEvent {
    pub fn kind(&self) -> StreamEventKind {
        StreamEventKind::parse(&self.event)
    }

    pub fn chunk(text: impl Into<String>) -> Self {
        Self {
            event: "new_chunk".to_string(),
            chunk: Some(text.into()),
            thread_id: None,
        }
    }

    pub fn done() -> Self {
        Self {
            event: "done".to_string(),
            ..Self::default()
        }
    }

    /// Server-assigned conversation id, ignoring blank values.
    pub fn conversation_id(&self) -> Option<&str> {
        self.thread_id
            .as_deref()
            .filter(|value| !value.trim().is_empty())
    }
}
