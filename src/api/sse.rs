//! Incremental decoder for `text/event-stream` bodies.
//!
//! Bytes are fed in whatever chunks the transport delivers. Lines are split on
//! `\n` (a trailing `\r` is dropped) and events are dispatched on blank lines.
//! Partial lines, including partial UTF-8 sequences, stay buffered until the
//! next chunk completes them. Both a pending line and an event's data are
//! capped at [`MAX_EVENT_SIZE`].

use super::ApiError;

/// One dispatched server-sent event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseEvent {
    /// Value of the `event:` field. `None` means the default `message` type.
    pub event: Option<String>,
    pub data: String,
    pub id: Option<String>,
}

impl SseEvent {
    /// True for events an `EventSource` would deliver to `onmessage`.
    pub fn is_message(&self) -> bool {
        matches!(self.event.as_deref(), None | Some("message"))
    }
}

/// Largest single event, or unterminated line, the decoder will buffer.
pub const MAX_EVENT_SIZE: usize = 1024 * 1024; // 1MB

const BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug)]
pub struct SseDecoder {
    buffer: Vec<u8>,
    /// Bytes of `buffer` already known to hold no `\n`.
    scanned: usize,
    bom_checked: bool,
    limit: usize,
    data: String,
    has_data: bool,
    event: Option<String>,
    id: Option<String>,
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self::with_limit(MAX_EVENT_SIZE)
    }
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoder that fails once an event or line grows past `limit` bytes.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            buffer: Vec::new(),
            scanned: 0,
            bom_checked: false,
            limit,
            data: String::new(),
            has_data: false,
            event: None,
            id: None,
        }
    }

    /// Feed a chunk and return every event completed by it.
    ///
    /// Fails with `ResponseTooLarge` when a line or an event's data exceeds
    /// the limit; the stream should be dropped after that.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<SseEvent>, ApiError> {
        self.buffer.extend_from_slice(chunk);

        // One leading byte order mark is skipped, possibly split across chunks.
        if !self.bom_checked {
            if self.buffer.len() < BOM.len() && BOM.starts_with(&self.buffer) {
                return Ok(Vec::new());
            }
            if self.buffer.starts_with(BOM) {
                self.buffer.drain(..BOM.len());
            }
            self.bom_checked = true;
        }

        let mut events = Vec::new();
        let mut start = 0;
        let mut search_from = self.scanned;
        while let Some(offset) = self.buffer[search_from..].iter().position(|&b| b == b'\n') {
            let end = search_from + offset;
            let mut line = &self.buffer[start..end];
            if let Some(stripped) = line.strip_suffix(b"\r") {
                line = stripped;
            }
            let line = String::from_utf8_lossy(line).into_owned();
            start = end + 1;
            search_from = start;
            if let Some(event) = self.process_line(&line)? {
                events.push(event);
            }
        }
        self.buffer.drain(..start);
        self.scanned = self.buffer.len();

        if self.buffer.len() > self.limit {
            return Err(ApiError::ResponseTooLarge(self.limit));
        }
        Ok(events)
    }

    fn process_line(&mut self, line: &str) -> Result<Option<SseEvent>, ApiError> {
        if line.is_empty() {
            return Ok(self.dispatch());
        }
        if line.starts_with(':') {
            return Ok(None);
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "data" => {
                if self.data.len() + value.len() + 1 > self.limit {
                    return Err(ApiError::ResponseTooLarge(self.limit));
                }
                if self.has_data {
                    self.data.push('\n');
                }
                self.data.push_str(value);
                self.has_data = true;
            }
            "event" => self.event = Some(value.to_string()),
            "id" => self.id = Some(value.to_string()),
            other => {
                tracing::trace!(field = other, "Ignoring SSE field");
            }
        }
        Ok(None)
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let event = self.event.take();
        if !self.has_data {
            return None;
        }
        self.has_data = false;
        Some(SseEvent {
            event: event.filter(|e| !e.is_empty()),
            data: std::mem::take(&mut self.data),
            id: self.id.clone(),
        })
    }
}
