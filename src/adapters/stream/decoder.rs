//! Incremental `text/event-stream` frame decoder
//!
//! Reassembles SSE frames from arbitrary byte chunks. The decoder only deals
//! with the wire format (field lines, comments, blank-line dispatch);
//! interpreting a frame as an engine event happens in [`super::event`].
//! Invalid UTF-8 is replaced rather than rejected so one mangled chunk
//! cannot poison the connection.

/// One dispatched server-sent event frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    /// Value of the `event:` field, if any
    pub event: Option<String>,
    /// Concatenated `data:` lines, joined with newlines
    pub data: String,
}

/// Stateful SSE decoder; feed it chunks, collect complete frames
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: String,
    event: Option<String>,
    data_lines: Vec<String>,
}

impl SseDecoder {
    /// Creates an empty decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes one transport chunk, returning every frame it completes
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));

        let mut frames = Vec::new();
        while let Some(newline) = self.buffer.find('\n') {
            let mut line: String = self.buffer.drain(..=newline).collect();
            line.pop(); // trailing \n
            if line.ends_with('\r') {
                line.pop();
            }
            if let Some(frame) = self.process_line(&line) {
                frames.push(frame);
            }
        }
        frames
    }

    fn process_line(&mut self, line: &str) -> Option<SseFrame> {
        if line.is_empty() {
            return self.dispatch();
        }
        // Comment lines keep the connection warm but carry nothing
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => self.data_lines.push(value.to_string()),
            // id and retry are transport concerns we don't track
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        if self.event.is_none() && self.data_lines.is_empty() {
            return None;
        }
        Some(SseFrame {
            event: self.event.take(),
            data: std::mem::take(&mut self.data_lines).join("\n"),
        })
    }
}
