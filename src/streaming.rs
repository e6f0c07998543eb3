//! SSE stream parsing and delta accumulation for streamed chat completions.
//!
//! Reads a `reqwest::Response` as a byte stream, splits on SSE event
//! boundaries (`data: …\n\n`), parses each event as a `ChatCompletionChunk`,
//! and accumulates content deltas into the final answer text.

use futures::stream::{self, Stream, StreamExt};

use crate::errors::CheckError;
use crate::types::ChatCompletionChunk;

// ─── SSE parsing ─────────────────────────────────────────────────────────────

/// What a single SSE event turned out to be.
enum SseEvent {
    /// A decoded completion chunk.
    Chunk(ChatCompletionChunk),
    /// The `[DONE]` terminator.
    Done,
    /// Keep-alive, comment, or other non-data event.
    Ignore,
}

/// Parse one SSE event block (the text between two `\n\n` boundaries).
///
/// An event may carry multiple `data:` lines; they are concatenated before
/// JSON decoding. Non-data lines (comments, `event:` types) are skipped.
fn parse_sse_event(event: &str) -> Result<SseEvent, CheckError> {
    let mut data = String::new();

    for line in event.lines() {
        if let Some(rest) = line.strip_prefix("data: ").or_else(|| line.strip_prefix("data:")) {
            let rest = rest.trim();
            if rest == "[DONE]" {
                return Ok(SseEvent::Done);
            }
            data.push_str(rest);
        }
    }

    if data.is_empty() {
        return Ok(SseEvent::Ignore);
    }

    let chunk: ChatCompletionChunk =
        serde_json::from_str(&data).map_err(|e| CheckError::Stream {
            reason: format!("failed to parse SSE chunk: {e} (data: {data})"),
        })?;

    Ok(SseEvent::Chunk(chunk))
}

/// Byte offset of the first `\n\n` event boundary, if one is buffered.
fn find_event_boundary(buffer: &[u8]) -> Option<usize> {
    buffer.windows(2).position(|w| w == b"\n\n")
}

/// Parse raw SSE bytes into a stream of `ChatCompletionChunk`s.
///
/// Buffers raw bytes across HTTP read boundaries and only decodes at `\n\n`
/// event boundaries, so a multi-byte UTF-8 sequence split across two network
/// reads survives intact (UTF-8 continuation bytes can never look like a
/// newline). Stops at the `[DONE]` marker or the end of the body, and
/// surfaces transport read failures as `CheckError::Stream` items.
pub fn parse_sse_stream(
    response: reqwest::Response,
) -> impl Stream<Item = Result<ChatCompletionChunk, CheckError>> + Unpin {
    let byte_stream = response.bytes_stream();

    Box::pin(stream::unfold(
        (byte_stream, Vec::new()),
        |(mut byte_stream, mut buffer): (_, Vec<u8>)| async move {
            loop {
                // Drain any complete events already buffered.
                if let Some(event_end) = find_event_boundary(&buffer) {
                    let event = String::from_utf8_lossy(&buffer[..event_end]).into_owned();
                    buffer.drain(..event_end + 2);

                    match parse_sse_event(&event) {
                        Ok(SseEvent::Chunk(chunk)) => {
                            return Some((Ok(chunk), (byte_stream, buffer)))
                        }
                        Ok(SseEvent::Done) => return None,
                        Ok(SseEvent::Ignore) => continue,
                        Err(e) => return Some((Err(e), (byte_stream, buffer))),
                    }
                }

                // Need more data from the wire.
                match byte_stream.next().await {
                    Some(Ok(bytes)) => {
                        buffer.extend_from_slice(&bytes);
                    }
                    Some(Err(e)) => {
                        return Some((
                            Err(CheckError::Stream {
                                reason: format!("stream read error: {e}"),
                            }),
                            (byte_stream, buffer),
                        ));
                    }
                    None => {
                        // Stream ended — flush any trailing event that was
                        // not terminated by a blank line.
                        let trailing = String::from_utf8_lossy(&buffer).trim().to_string();
                        buffer.clear();
                        if trailing.is_empty() {
                            return None;
                        }
                        return match parse_sse_event(&trailing) {
                            Ok(SseEvent::Chunk(chunk)) => Some((Ok(chunk), (byte_stream, buffer))),
                            Ok(SseEvent::Done) | Ok(SseEvent::Ignore) => None,
                            Err(e) => Some((Err(e), (byte_stream, buffer))),
                        };
                    }
                }
            }
        },
    ))
}

// ─── Accumulator ─────────────────────────────────────────────────────────────

/// The result of draining a streamed response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamOutcome {
    /// Every content delta, concatenated in arrival order.
    pub text: String,
    /// Whether the accumulated text is non-blank after trimming.
    ///
    /// An all-empty stream is a valid outcome, not an error — callers report
    /// it as a soft failure with a warning.
    pub non_empty: bool,
}

/// Drain a chunk stream, concatenating content deltas in arrival order.
///
/// Each accepted delta is appended to the running buffer and then handed to
/// `on_delta` for real-time display, in that order, per delta. Chunks missing
/// any level of the `choices → delta → content` nesting contribute nothing
/// and never error. A transport error item from the stream propagates.
pub async fn accumulate<S, F>(mut stream: S, mut on_delta: F) -> Result<StreamOutcome, CheckError>
where
    S: Stream<Item = Result<ChatCompletionChunk, CheckError>> + Unpin,
    F: FnMut(&str),
{
    let mut text = String::new();

    while let Some(item) = stream.next().await {
        let chunk = item?;
        if let Some(delta) = chunk.content_delta() {
            text.push_str(delta);
            on_delta(delta);
        }
    }

    let non_empty = !text.trim().is_empty();
    Ok(StreamOutcome { text, non_empty })
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(json: &str) -> ChatCompletionChunk {
        serde_json::from_str(json).unwrap()
    }

    fn chunk_stream(
        items: Vec<Result<ChatCompletionChunk, CheckError>>,
    ) -> impl Stream<Item = Result<ChatCompletionChunk, CheckError>> + Unpin {
        stream::iter(items)
    }

    #[tokio::test]
    async fn test_accumulate_concatenates_in_order() {
        let items = vec![
            Ok(chunk(r#"{"choices":[{"delta":{"content":"Hi"}}]}"#)),
            Ok(chunk(r#"{"choices":[{"delta":{"content":" there"}}]}"#)),
            Ok(chunk(r#"{"choices":[]}"#)),
        ];
        let outcome = accumulate(chunk_stream(items), |_| {}).await.unwrap();
        assert_eq!(outcome.text, "Hi there");
        assert!(outcome.non_empty);
    }

    #[tokio::test]
    async fn test_accumulate_all_malformed_is_empty_not_error() {
        let items = vec![
            Ok(chunk("{}")),
            Ok(chunk(r#"{"choices":[{"delta":{}}]}"#)),
        ];
        let outcome = accumulate(chunk_stream(items), |_| {}).await.unwrap();
        assert_eq!(outcome.text, "");
        assert!(!outcome.non_empty);
    }

    #[tokio::test]
    async fn test_accumulate_whitespace_only_is_empty() {
        let items = vec![Ok(chunk(r#"{"choices":[{"delta":{"content":"  \n "}}]}"#))];
        let outcome = accumulate(chunk_stream(items), |_| {}).await.unwrap();
        assert_eq!(outcome.text, "  \n ");
        assert!(!outcome.non_empty, "blank-after-trim text is the empty outcome");
    }

    #[tokio::test]
    async fn test_accumulate_surfaces_each_delta_in_order() {
        let items = vec![
            Ok(chunk(r#"{"choices":[{"delta":{"content":"a"}}]}"#)),
            Ok(chunk(r#"{"choices":[{"delta":{"content":null}}]}"#)),
            Ok(chunk(r#"{"choices":[{"delta":{"content":"b"}}]}"#)),
        ];
        let mut seen = Vec::new();
        let outcome = accumulate(chunk_stream(items), |d| seen.push(d.to_string()))
            .await
            .unwrap();
        assert_eq!(seen, vec!["a", "b"]);
        assert_eq!(outcome.text, "ab");
    }

    #[tokio::test]
    async fn test_accumulate_propagates_transport_error() {
        let items = vec![
            Ok(chunk(r#"{"choices":[{"delta":{"content":"par"}}]}"#)),
            Err(CheckError::Stream {
                reason: "connection reset".into(),
            }),
        ];
        let result = accumulate(chunk_stream(items), |_| {}).await;
        assert!(matches!(result, Err(CheckError::Stream { .. })));
    }

    #[tokio::test]
    async fn test_accumulate_empty_stream() {
        let outcome = accumulate(chunk_stream(vec![]), |_| {}).await.unwrap();
        assert_eq!(outcome.text, "");
        assert!(!outcome.non_empty);
    }

    fn response_from_chunks(chunks: Vec<&'static [u8]>) -> reqwest::Response {
        let body = reqwest::Body::wrap_stream(stream::iter(
            chunks
                .into_iter()
                .map(|c| Ok::<_, std::io::Error>(c.to_vec())),
        ));
        reqwest::Response::from(http::Response::new(body))
    }

    #[tokio::test]
    async fn test_parse_sse_stream_multibyte_char_split_across_reads() {
        // "北" is E5 8C 97; the read boundary falls inside the character.
        let response = response_from_chunks(vec![
            b"data: {\"choices\":[{\"delta\":{\"content\":\"\xE5\x8C".as_slice(),
            b"\x97\"}}]}\n\ndata: [DONE]\n\n".as_slice(),
        ]);
        let outcome = accumulate(parse_sse_stream(response), |_| {}).await.unwrap();
        assert_eq!(outcome.text, "北");
    }

    #[tokio::test]
    async fn test_parse_sse_stream_event_split_across_reads() {
        let response = response_from_chunks(vec![
            b"data: {\"choices\":[{\"delta\":{\"content\":\"ab".as_slice(),
            b"c\"}}]}\n\ndata: {\"choices\":[{\"delta\":".as_slice(),
            b"{\"content\":\"d\"}}]}\n\ndata: [DONE]\n\n".as_slice(),
        ]);
        let outcome = accumulate(parse_sse_stream(response), |_| {}).await.unwrap();
        assert_eq!(outcome.text, "abcd");
    }

    #[test]
    fn test_find_event_boundary() {
        assert_eq!(find_event_boundary(b"data: x\n\nrest"), Some(7));
        assert_eq!(find_event_boundary(b"data: x\n"), None);
        assert_eq!(find_event_boundary(b""), None);
    }

    #[test]
    fn test_parse_sse_event_chunk() {
        let event = r#"data: {"choices":[{"delta":{"content":"Hi"}}]}"#;
        match parse_sse_event(event).unwrap() {
            SseEvent::Chunk(c) => assert_eq!(c.content_delta(), Some("Hi")),
            _ => panic!("expected a chunk"),
        }
    }

    #[test]
    fn test_parse_sse_event_done() {
        assert!(matches!(
            parse_sse_event("data: [DONE]").unwrap(),
            SseEvent::Done
        ));
    }

    #[test]
    fn test_parse_sse_event_keep_alive_ignored() {
        assert!(matches!(
            parse_sse_event(": keep-alive").unwrap(),
            SseEvent::Ignore
        ));
        assert!(matches!(parse_sse_event("").unwrap(), SseEvent::Ignore));
    }

    #[test]
    fn test_parse_sse_event_no_space_after_colon() {
        let event = r#"data:{"choices":[{"delta":{"content":"x"}}]}"#;
        match parse_sse_event(event).unwrap() {
            SseEvent::Chunk(c) => assert_eq!(c.content_delta(), Some("x")),
            _ => panic!("expected a chunk"),
        }
    }

    #[test]
    fn test_parse_sse_event_malformed_json_errors() {
        let result = parse_sse_event("data: {not json");
        assert!(matches!(result, Err(CheckError::Stream { .. })));
    }
}
