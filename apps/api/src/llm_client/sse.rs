//! Server-sent-event decoding for streamed generation.
//!
//! The backend answers `streamGenerateContent?alt=sse` with `data:` events,
//! each carrying a partial `GenerateContentResponse`. This module turns the
//! raw byte stream into the ordered sequence of text fragments inside them.

use std::collections::VecDeque;
use std::time::Duration;

use futures::{Stream, StreamExt};
use serde_json::Value;

use super::{ApiErrorBody, GenerateContentResponse, LlmError, TextStream};
use crate::stream::Utf8Decoder;

/// Incremental SSE decoder yielding the text of each event.
#[derive(Debug, Default)]
pub struct SseDecoder {
    utf8: Utf8Decoder,
    line: String,
    data: String,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds raw bytes. Text of every event completed by this chunk is
    /// appended to `out` in order, even when a later event fails.
    pub fn push(&mut self, chunk: &[u8], out: &mut VecDeque<String>) -> Result<(), LlmError> {
        self.utf8.decode_into(chunk, &mut self.line);

        while let Some(newline) = self.line.find('\n') {
            let raw: String = self.line.drain(..=newline).collect();
            let line = raw.trim_end_matches(['\n', '\r']);
            self.handle_line(line, out)?;
        }
        Ok(())
    }

    /// Ends the stream, dispatching a trailing event that had no blank line.
    pub fn finish(&mut self, out: &mut VecDeque<String>) -> Result<(), LlmError> {
        self.utf8.finish_into(&mut self.line);
        if !self.line.is_empty() {
            let line = std::mem::take(&mut self.line);
            self.handle_line(line.trim_end_matches('\r'), out)?;
        }
        self.dispatch(out)
    }

    fn handle_line(&mut self, line: &str, out: &mut VecDeque<String>) -> Result<(), LlmError> {
        if line.is_empty() {
            return self.dispatch(out);
        }
        if line.starts_with(':') {
            return Ok(());
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        if field == "data" {
            if !self.data.is_empty() {
                self.data.push('\n');
            }
            self.data.push_str(value);
        }
        Ok(())
    }

    fn dispatch(&mut self, out: &mut VecDeque<String>) -> Result<(), LlmError> {
        if self.data.is_empty() {
            return Ok(());
        }
        let payload = std::mem::take(&mut self.data);
        if payload.trim() == "[DONE]" {
            return Ok(());
        }

        let event: Value = serde_json::from_str(&payload)?;
        if let Some(error) = event.get("error") {
            let body: ApiErrorBody = serde_json::from_value(error.clone())?;
            return Err(LlmError::Api {
                status: body.code.unwrap_or(500),
                message: body.message,
            });
        }

        let response: GenerateContentResponse = serde_json::from_value(event)?;
        if let Some(text) = response.text().filter(|t| !t.is_empty()) {
            out.push_back(text);
        }
        Ok(())
    }
}

struct FragmentState<S> {
    bytes: S,
    decoder: SseDecoder,
    ready: VecDeque<String>,
    failed: Option<LlmError>,
    done: bool,
    idle_timeout: Duration,
}

/// Adapts a raw SSE byte stream into text fragments.
///
/// Each wait for the next chunk is bounded by `idle_timeout`. After the
/// first error the stream yields that error once and ends.
pub fn text_fragments<S, B, E>(bytes: S, idle_timeout: Duration) -> TextStream
where
    S: Stream<Item = Result<B, E>> + Send + Unpin + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<LlmError> + Send + 'static,
{
    let state = FragmentState {
        bytes,
        decoder: SseDecoder::new(),
        ready: VecDeque::new(),
        failed: None,
        done: false,
        idle_timeout,
    };

    futures::stream::unfold(state, |mut state| async move {
        loop {
            if let Some(fragment) = state.ready.pop_front() {
                return Some((Ok(fragment), state));
            }
            if let Some(err) = state.failed.take() {
                state.done = true;
                return Some((Err(err), state));
            }
            if state.done {
                return None;
            }

            match tokio::time::timeout(state.idle_timeout, state.bytes.next()).await {
                Err(_) => state.failed = Some(LlmError::Timeout(state.idle_timeout)),
                Ok(Some(Ok(chunk))) => {
                    if let Err(err) = state.decoder.push(chunk.as_ref(), &mut state.ready) {
                        state.failed = Some(err);
                    }
                }
                Ok(Some(Err(err))) => state.failed = Some(err.into()),
                Ok(None) => {
                    state.done = true;
                    if let Err(err) = state.decoder.finish(&mut state.ready) {
                        state.failed = Some(err);
                    }
                }
            }
        }
    })
    .boxed()
}
