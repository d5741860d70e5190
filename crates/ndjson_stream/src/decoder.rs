use std::marker::PhantomData;

use serde::de::DeserializeOwned;

/// Incremental parser for newline-delimited JSON byte streams.
///
/// Bytes are buffered until a `\n` arrives, so multi-byte UTF-8 sequences split across
/// reads are decoded only once the whole line is present. At most one incomplete line is
/// retained between calls to [`NdjsonDecoder::feed`].
#[derive(Debug)]
pub struct NdjsonDecoder<T> {
    buffer: Vec<u8>,
    _record: PhantomData<fn() -> T>,
}

impl<T> Default for NdjsonDecoder<T> {
    fn default() -> Self {
        Self {
            buffer: Vec::new(),
            _record: PhantomData,
        }
    }
}

impl<T> NdjsonDecoder<T>
where
    T: DeserializeOwned + Default,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed arbitrary bytes into the decoder and drain every completed line.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<T> {
        self.buffer.extend_from_slice(bytes);

        let Some(last_newline) = self.buffer.iter().rposition(|byte| *byte == b'\n') else {
            return Vec::new();
        };

        let incomplete = self.buffer.split_off(last_newline + 1);
        let complete = std::mem::replace(&mut self.buffer, incomplete);

        complete
            .split(|byte| *byte == b'\n')
            .filter_map(decode_line)
            .collect()
    }

    /// Flush the retained tail once the source is exhausted.
    ///
    /// The tail is parsed only when it is not blank and does not end in a line terminator.
    pub fn finish(&mut self) -> Option<T> {
        let tail = std::mem::take(&mut self.buffer);
        let text = String::from_utf8_lossy(&tail);
        if text.trim().is_empty() || text.ends_with('\r') {
            return None;
        }

        Some(parse_record(text.trim()))
    }

    /// Decode a complete NDJSON payload in one shot.
    pub fn parse_lines(input: &str) -> Vec<T> {
        let mut decoder = Self::default();
        let mut records = decoder.feed(input.as_bytes());
        records.extend(decoder.finish());
        records
    }

    pub fn is_empty_buffer(&self) -> bool {
        self.buffer.iter().all(u8::is_ascii_whitespace)
    }

    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }
}

fn decode_line<T>(line: &[u8]) -> Option<T>
where
    T: DeserializeOwned + Default,
{
    let text = String::from_utf8_lossy(line);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    Some(parse_record(trimmed))
}

fn parse_record<T>(line: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match serde_json::from_str::<T>(line) {
        Ok(record) => record,
        Err(error) => {
            tracing::warn!(%line, %error, "failed to parse NDJSON line");
            T::default()
        }
    }
}
