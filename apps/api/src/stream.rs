//! Incremental text reassembly for streamed model output.
//!
//! Fragments arrive as raw bytes whose boundaries have nothing to do with
//! character boundaries, so decoding keeps the undecoded tail of a multi-byte
//! sequence around until the next fragment completes it.

use futures::{Stream, StreamExt};

/// Stateful UTF-8 decoder that tolerates sequences split across chunks.
///
/// Invalid sequences decode to U+FFFD. A sequence still incomplete when the
/// input ends becomes a single U+FFFD on [`Utf8Decoder::finish_into`].
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    /// Decodes as much of `pending + chunk` as is complete, appending to `out`.
    pub fn decode_into(&mut self, chunk: &[u8], out: &mut String) {
        self.pending.extend_from_slice(chunk);

        let mut consumed = 0;
        loop {
            let rest = &self.pending[consumed..];
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    consumed = self.pending.len();
                    break;
                }
                Err(err) => {
                    let valid_len = err.valid_up_to();
                    if let Ok(valid) = std::str::from_utf8(&rest[..valid_len]) {
                        out.push_str(valid);
                    }
                    consumed += valid_len;
                    match err.error_len() {
                        Some(invalid_len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            consumed += invalid_len;
                        }
                        // Incomplete tail: wait for the next chunk.
                        None => break,
                    }
                }
            }
        }

        self.pending.drain(..consumed);
    }

    /// Flushes any leftover partial sequence.
    pub fn finish_into(&mut self, out: &mut String) {
        if !self.pending.is_empty() {
            self.pending.clear();
            out.push(char::REPLACEMENT_CHARACTER);
        }
    }
}

/// Accumulates ordered fragments into the complete response text.
#[derive(Debug, Default)]
pub struct StreamReassembler {
    decoder: Utf8Decoder,
    text: String,
}

impl StreamReassembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one fragment and returns the text it made decodable.
    ///
    /// The returned slice may be empty when the fragment only carried part of
    /// a multi-byte character.
    pub fn push(&mut self, fragment: impl AsRef<[u8]>) -> &str {
        let start = self.text.len();
        self.decoder.decode_into(fragment.as_ref(), &mut self.text);
        &self.text[start..]
    }

    /// Ends the sequence, returning whatever the flush appended.
    pub fn flush(&mut self) -> &str {
        let start = self.text.len();
        self.decoder.finish_into(&mut self.text);
        &self.text[start..]
    }

    pub fn into_text(mut self) -> String {
        self.decoder.finish_into(&mut self.text);
        self.text
    }
}

/// Drains `fragments` in order, handing each newly decoded piece of text to
/// `sink` as soon as it is available, and returns the full text.
///
/// Stops at the first error; text received before it has already gone to
/// the sink.
pub async fn reassemble<S, B, E, F>(fragments: S, mut sink: F) -> Result<String, E>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    F: FnMut(&str),
{
    futures::pin_mut!(fragments);
    let mut reassembler = StreamReassembler::new();

    while let Some(fragment) = fragments.next().await {
        let decoded = reassembler.push(fragment?);
        if !decoded.is_empty() {
            sink(decoded);
        }
    }

    let tail = reassembler.flush();
    if !tail.is_empty() {
        sink(tail);
    }

    Ok(reassembler.into_text())
}
