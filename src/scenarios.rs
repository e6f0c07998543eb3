//! The five fixed conformance scenarios.
//!
//! Each scenario is a hand-written check of one capability surface: model
//! listing, single-shot chat, streamed chat, streamed "thinking" chat, and
//! tool calling (CLI endpoint only). Scenarios print their own progress on
//! stdout and return `Ok(true)` on pass, `Ok(false)` on a soft failure
//! (empty stream), or `Err` for transport/shape failures the runner records.

use std::io::Write;
use std::sync::Arc;

use crate::classify::{classify, Completion};
use crate::client::ApiClient;
use crate::errors::CheckError;
use crate::runner::Scenario;
use crate::streaming::accumulate;
use crate::types::{
    ChatCompletionRequest, ChatMessage, FunctionDefinition, ToolDefinition,
};

/// Model exercised by the plain chat and streaming scenarios.
const CHAT_MODEL: &str = "qwen3-max";

/// Model exercised by the extended-reasoning streaming scenario.
const THINKING_MODEL: &str = "qwen3-max-thinking";

/// Model exercised by the tool-calling scenario (CLI endpoint).
const TOOL_MODEL: &str = "qwen3-coder-plus";

/// Build the fixed, ordered scenario table.
///
/// The two clients are the only shared state; each scenario takes its own
/// `Arc` handle and nothing else crosses scenario boundaries.
pub fn build_scenarios(default_client: Arc<ApiClient>, cli_client: Arc<ApiClient>) -> Vec<Scenario> {
    vec![
        Scenario::new("model listing", {
            let client = default_client.clone();
            async move { check_model_listing(&client).await }
        }),
        Scenario::new("single-shot chat", {
            let client = default_client.clone();
            async move { check_chat(&client).await }
        }),
        Scenario::new("streamed chat", {
            let client = default_client.clone();
            async move { check_streamed_chat(&client).await }
        }),
        Scenario::new("streamed thinking chat", {
            let client = default_client.clone();
            async move { check_thinking_chat(&client).await }
        }),
        Scenario::new("tool calling", {
            let client = cli_client.clone();
            async move { check_tool_calling(&client).await }
        }),
    ]
}

/// `GET /models` returns a listable set of model ids.
async fn check_model_listing(client: &ApiClient) -> Result<bool, CheckError> {
    println!("🔍 checking model listing...");

    let models = client.list_models().await?;
    println!("✅ listed {} models:", models.len());
    for model in &models {
        println!("   - {}", model.id);
    }

    Ok(true)
}

/// A non-streaming chat completion returns an answer and token usage.
async fn check_chat(client: &ApiClient) -> Result<bool, CheckError> {
    println!("💬 checking single-shot chat...");

    let request = ChatCompletionRequest {
        model: CHAT_MODEL.to_string(),
        messages: vec![ChatMessage::user("你好，请用一句话介绍一下自己")],
        max_tokens: 100,
        stream: false,
        tools: None,
        tool_choice: None,
    };

    let response = client.chat_completion(&request).await?;
    match classify(response)? {
        Completion::Text {
            content,
            total_tokens,
        } => {
            println!("✅ answer: {content}");
            println!("📊 total tokens: {total_tokens}");
        }
        Completion::ToolCalls {
            calls,
            total_tokens,
        } => {
            // No tools were offered; report whatever the server sent.
            println!("✅ unexpected tool-call answer ({} calls)", calls.len());
            println!("📊 total tokens: {total_tokens}");
        }
    }

    Ok(true)
}

/// A streamed completion delivers deltas that concatenate to a non-blank
/// answer.
async fn check_streamed_chat(client: &ApiClient) -> Result<bool, CheckError> {
    println!("🌊 checking streamed chat...");
    stream_and_verify(
        client,
        CHAT_MODEL,
        "请写一首关于春天的短诗，不超过4行",
        100,
        "streamed response was empty",
    )
    .await
}

/// Same as the streamed check, against the extended-reasoning model.
async fn check_thinking_chat(client: &ApiClient) -> Result<bool, CheckError> {
    println!("🧠 checking streamed thinking chat...");
    stream_and_verify(
        client,
        THINKING_MODEL,
        "计算 23 + 45 = ?，请详细展示你的思考过程",
        500,
        "thinking-mode streamed response was empty",
    )
    .await
}

/// Run one streamed request, echoing deltas live, and verify the
/// accumulated answer is non-blank.
///
/// An empty stream is the soft-failure outcome: a printed warning and a
/// `false` verdict, deliberately distinct from a raised transport error.
async fn stream_and_verify(
    client: &ApiClient,
    model: &str,
    prompt: &str,
    max_tokens: u32,
    empty_warning: &str,
) -> Result<bool, CheckError> {
    let request = ChatCompletionRequest {
        model: model.to_string(),
        messages: vec![ChatMessage::user(prompt)],
        max_tokens,
        stream: true,
        tools: None,
        tool_choice: None,
    };

    let stream = client.chat_completion_stream(&request).await?;

    println!("✅ streamed reply:");
    let outcome = accumulate(stream, |delta| {
        print!("{delta}");
        let _ = std::io::stdout().flush();
    })
    .await?;
    println!();

    if outcome.non_empty {
        Ok(true)
    } else {
        println!("⚠️ {empty_warning}");
        Ok(false)
    }
}

/// The CLI endpoint honors tool definitions and reports tool invocations.
async fn check_tool_calling(client: &ApiClient) -> Result<bool, CheckError> {
    println!("🔧 checking tool calling...");

    let request = ChatCompletionRequest {
        model: TOOL_MODEL.to_string(),
        messages: vec![ChatMessage::user("今天北京的天气怎么样？")],
        max_tokens: 500,
        stream: false,
        tools: Some(vec![weather_tool()]),
        tool_choice: Some("auto".to_string()),
    };

    let response = client.chat_completion(&request).await?;
    match classify(response)? {
        Completion::ToolCalls {
            calls,
            total_tokens,
        } => {
            println!("✅ tool-call answer ({} calls):", calls.len());
            for (i, call) in calls.iter().enumerate() {
                println!("   call {}:", i + 1);
                println!("     name: {}", call.name);
                println!("     arguments: {}", call.arguments);
            }
            println!("📊 total tokens: {total_tokens}");
        }
        Completion::Text {
            content,
            total_tokens,
        } => {
            // The model is free to answer in text instead of calling a tool.
            println!("✅ text answer: {content}");
            println!("📊 total tokens: {total_tokens}");
        }
    }

    Ok(true)
}

/// The fixed `get_current_weather(city)` tool definition.
fn weather_tool() -> ToolDefinition {
    ToolDefinition {
        r#type: "function".to_string(),
        function: FunctionDefinition {
            name: "get_current_weather".to_string(),
            description: "获取指定城市的当前天气信息".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "city": {
                        "type": "string",
                        "description": "城市名称，例如：北京、上海"
                    }
                },
                "required": ["city"]
            }),
        },
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
