//! Wire types for the OpenAI-compatible Chat Completions API.
//!
//! Request types serialize exactly the fields the endpoint contract names;
//! optional fields are skipped when `None`. Response and chunk types are
//! deliberately lenient — every nesting level a server might omit carries a
//! `#[serde(default)]` or `Option` so a sparse payload never fails to decode.

use serde::{Deserialize, Serialize};

// ─── Request Types ───────────────────────────────────────────────────────────

/// A single message in the conversation.
#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    /// Build a `user` role message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Message role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Tool definition sent in the request: `{type: "function", function: {…}}`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub r#type: String,
    pub function: FunctionDefinition,
}

/// Function definition within a tool. `parameters` is a JSON Schema object.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Request body for `POST {base}/chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<String>,
}

// ─── Completed Response Types ────────────────────────────────────────────────

/// Response body from `GET {base}/models`.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelList {
    #[serde(default)]
    pub data: Vec<ModelInfo>,
}

/// One entry in the model list.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelInfo {
    pub id: String,
}

/// A fully-materialized (non-streaming) chat completion.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<Choice>,
    pub usage: Usage,
}

/// A single choice in a completed response.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
    pub finish_reason: Option<String>,
}

/// The assistant message within a completed choice. Exactly one of `content`
/// or `tool_calls` is meaningful, gated by the choice's `finish_reason`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCallResponse>>,
}

/// Tool call as returned in the OpenAI response format.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCallResponse {
    pub function: FunctionCallResponse,
}

/// Function call details in a response. `arguments` is a JSON-encoded string
/// and stays opaque — the harness reports it, it never evaluates it.
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionCallResponse {
    pub name: String,
    pub arguments: String,
}

/// Token accounting reported by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct Usage {
    pub total_tokens: u64,
}

// ─── Streaming Chunk Types ───────────────────────────────────────────────────

/// Raw SSE chunk from the streaming response. Every level may be absent.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
}

/// A single choice within a streaming chunk.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkChoice {
    #[serde(default)]
    pub delta: ChunkDelta,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// The delta (incremental update) within a chunk choice.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChunkDelta {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionChunk {
    /// The first choice's content delta, if every level of the chunk is
    /// present and the content is non-empty.
    ///
    /// This is the single presence probe for incremental fragments: chunk →
    /// choices non-empty → first choice → delta → content non-null and
    /// non-empty. A chunk failing any step simply yields `None`.
    pub fn content_delta(&self) -> Option<&str> {
        self.choices
            .first()?
            .delta
            .content
            .as_deref()
            .filter(|s| !s.is_empty())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
