// ABOUTME: Render sink — the observer that turns conversation changes into visible output.
// ABOUTME: The TUI implements it for the screen; PrintSink and RecordingSink serve the CLI and tests.

use std::io::Write;

use chrono::{Local, TimeZone};

use crate::store::{Message, Sender};

/// Receives rendering effects from the chat widget.
pub trait RenderSink {
    /// Remove every rendered row (the typing indicator included).
    fn reset(&mut self);
    /// Render one message row at the bottom of the thread.
    fn append_row(&mut self, message: &Message);
    /// Show or hide the single typing indicator.
    fn set_typing(&mut self, on: bool);
    /// Empty the text input.
    fn clear_input(&mut self);
    /// Bring the newest row into view.
    fn scroll_to_bottom(&mut self);
}

/// Format a message timestamp as local HH:MM.
pub fn format_time(timestamp_ms: i64) -> String {
    Local
        .timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_default()
}

/// Writes rows as plain text lines. Used by the one-shot CLI commands.
pub struct PrintSink<W: Write> {
    out: W,
}

impl<W: Write> PrintSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSink for PrintSink<W> {
    fn reset(&mut self) {}

    fn append_row(&mut self, message: &Message) {
        let who = match message.sender {
            Sender::User => "you",
            Sender::Bot => "bot",
        };
        let _ = writeln!(
            self.out,
            "[{}] {}: {}",
            format_time(message.timestamp),
            who,
            message.text
        );
    }

    fn set_typing(&mut self, _on: bool) {}

    fn clear_input(&mut self) {}

    fn scroll_to_bottom(&mut self) {}
}

/// A sink that records what it was asked to do, for assertions.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub rows: Vec<Message>,
    /// Number of typing indicator nodes currently shown.
    pub typing_nodes: usize,
    pub resets: usize,
    pub input_clears: usize,
    pub scrolls: usize,
}

impl RenderSink for RecordingSink {
    fn reset(&mut self) {
        self.rows.clear();
        self.typing_nodes = 0;
        self.resets += 1;
    }

    fn append_row(&mut self, message: &Message) {
        self.rows.push(message.clone());
    }

    fn set_typing(&mut self, on: bool) {
        if on {
            self.typing_nodes += 1;
        } else {
            self.typing_nodes = self.typing_nodes.saturating_sub(1);
        }
    }

    fn clear_input(&mut self) {
        self.input_clears += 1;
    }

    fn scroll_to_bottom(&mut self) {
        self.scrolls += 1;
    }
}
