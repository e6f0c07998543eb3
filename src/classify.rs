//! Classification of completed (non-streaming) chat responses.
//!
//! A completed response is one of two shapes, gated by the first choice's
//! `finish_reason`: a plain text answer, or a request to invoke tools. The
//! two shapes are modeled as a tagged union so callers branch once and then
//! only see the fields that exist for that shape.

use crate::errors::CheckError;
use crate::types::ChatCompletion;

/// A tool invocation requested by the model.
///
/// `arguments` is the raw JSON-encoded string exactly as the server sent it;
/// the harness reports it without parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub name: String,
    pub arguments: String,
}

/// A classified completed response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// A plain text answer (`finish_reason` other than `"tool_calls"`).
    /// The content may legitimately be empty for some providers.
    Text {
        content: String,
        total_tokens: u64,
    },
    /// The model asked for one or more tool invocations
    /// (`finish_reason == "tool_calls"`).
    ToolCalls {
        calls: Vec<ToolInvocation>,
        total_tokens: u64,
    },
}

impl Completion {
    /// Token usage reported by the server, present on both shapes.
    pub fn total_tokens(&self) -> u64 {
        match self {
            Completion::Text { total_tokens, .. } => *total_tokens,
            Completion::ToolCalls { total_tokens, .. } => *total_tokens,
        }
    }
}

/// Classify a completed response by its first choice's `finish_reason`.
///
/// Shape violations are errors, not silent defaults: an empty `choices`
/// array, or a `"tool_calls"` finish with zero tool calls attached, both
/// report as `CheckError::Shape`.
pub fn classify(response: ChatCompletion) -> Result<Completion, CheckError> {
    let total_tokens = response.usage.total_tokens;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| CheckError::Shape {
            reason: "empty choices array".into(),
        })?;

    if choice.finish_reason.as_deref() == Some("tool_calls") {
        let raw_calls = choice.message.tool_calls.unwrap_or_default();
        if raw_calls.is_empty() {
            return Err(CheckError::Shape {
                reason: "finish_reason is \"tool_calls\" but the message carries no tool calls"
                    .into(),
            });
        }

        let calls = raw_calls
            .into_iter()
            .map(|tc| ToolInvocation {
                name: tc.function.name,
                arguments: tc.function.arguments,
            })
            .collect();

        Ok(Completion::ToolCalls {
            calls,
            total_tokens,
        })
    } else {
        Ok(Completion::Text {
            content: choice.message.content.unwrap_or_default(),
            total_tokens,
        })
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn completion(json: &str) -> ChatCompletion {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_classify_plain_text() {
        let response = completion(
            r#"{
                "choices": [{
                    "message": {"content": "Hello, world!"},
                    "finish_reason": "stop"
                }],
                "usage": {"total_tokens": 42}
            }"#,
        );
        let classified = classify(response).unwrap();
        assert_eq!(
            classified,
            Completion::Text {
                content: "Hello, world!".to_string(),
                total_tokens: 42
            }
        );
    }

    #[test]
    fn test_classify_null_content_is_empty_text() {
        let response = completion(
            r#"{
                "choices": [{"message": {"content": null}, "finish_reason": "stop"}],
                "usage": {"total_tokens": 3}
            }"#,
        );
        let classified = classify(response).unwrap();
        assert_eq!(
            classified,
            Completion::Text {
                content: String::new(),
                total_tokens: 3
            }
        );
    }

    #[test]
    fn test_classify_tool_calls_preserves_order_and_arguments() {
        let response = completion(
            r#"{
                "choices": [{
                    "message": {
                        "content": null,
                        "tool_calls": [
                            {"function": {"name": "get_current_weather",
                                          "arguments": "{\"city\":\"北京\"}"}},
                            {"function": {"name": "get_forecast",
                                          "arguments": "{\"city\":\"上海\",\"days\":3}"}}
                        ]
                    },
                    "finish_reason": "tool_calls"
                }],
                "usage": {"total_tokens": 99}
            }"#,
        );
        let classified = classify(response).unwrap();
        match classified {
            Completion::ToolCalls { calls, total_tokens } => {
                assert_eq!(total_tokens, 99);
                assert_eq!(calls.len(), 2);
                assert_eq!(calls[0].name, "get_current_weather");
                assert_eq!(calls[0].arguments, "{\"city\":\"北京\"}");
                assert_eq!(calls[1].name, "get_forecast");
            }
            other => panic!("expected ToolCalls, got {other:?}"),
        }
    }

    #[test]
    fn test_classify_tool_calls_finish_with_no_calls_is_shape_error() {
        let response = completion(
            r#"{
                "choices": [{"message": {"content": null, "tool_calls": []},
                             "finish_reason": "tool_calls"}],
                "usage": {"total_tokens": 10}
            }"#,
        );
        assert!(matches!(classify(response), Err(CheckError::Shape { .. })));
    }

    #[test]
    fn test_classify_tool_calls_finish_with_missing_field_is_shape_error() {
        let response = completion(
            r#"{
                "choices": [{"message": {"content": null}, "finish_reason": "tool_calls"}],
                "usage": {"total_tokens": 10}
            }"#,
        );
        assert!(matches!(classify(response), Err(CheckError::Shape { .. })));
    }

    #[test]
    fn test_classify_empty_choices_is_shape_error() {
        let response = completion(r#"{"choices": [], "usage": {"total_tokens": 0}}"#);
        assert!(matches!(classify(response), Err(CheckError::Shape { .. })));
    }

    #[test]
    fn test_classify_provider_defined_finish_reason_is_text() {
        // "length" and other provider-defined values fall through to the
        // text branch; the classifier does not judge validity there.
        let response = completion(
            r#"{
                "choices": [{"message": {"content": "truncat"}, "finish_reason": "length"}],
                "usage": {"total_tokens": 100}
            }"#,
        );
        let classified = classify(response).unwrap();
        assert_eq!(
            classified,
            Completion::Text {
                content: "truncat".to_string(),
                total_tokens: 100
            }
        );
    }

    #[test]
    fn test_total_tokens_on_both_branches() {
        let text = Completion::Text {
            content: "x".into(),
            total_tokens: 7,
        };
        let tools = Completion::ToolCalls {
            calls: vec![],
            total_tokens: 8,
        };
        assert_eq!(text.total_tokens(), 7);
        assert_eq!(tools.total_tokens(), 8);
    }
}
