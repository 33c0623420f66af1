// ABOUTME: TUI state types — rendered chat rows, input buffer, and widget flags.
// ABOUTME: Implements RenderSink so the chat widget drives what the screen shows.

use crate::chat::RenderSink;
use crate::chat::sink::format_time;
use crate::config::{Config, Layout};
use crate::store::{Message, Sender};

/// A message as displayed: sanitized text plus its HH:MM stamp.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRow {
    pub sender: Sender,
    pub text: String,
    pub time: String,
}

impl ChatRow {
    pub fn from_message(message: &Message) -> Self {
        Self {
            sender: message.sender,
            text: sanitize_for_display(&message.text),
            time: format_time(message.timestamp),
        }
    }
}

/// Full TUI application state.
pub struct TuiState {
    pub rows: Vec<ChatRow>,
    pub input: String,
    pub cursor_pos: usize,
    pub scroll_offset: u16,
    pub typing: bool,
    pub listening: bool,
    pub voice_supported: bool,
    pub layout: Layout,
    pub panel_open: bool,
    pub title: String,
    pub suggestions: Vec<String>,
    pub session_id: String,
    pub endpoint: String,
    pub outstanding: usize,
}

impl TuiState {
    /// Create an empty state with the given header title.
    pub fn new(title: String) -> Self {
        Self {
            rows: Vec::new(),
            input: String::new(),
            cursor_pos: 0,
            scroll_offset: 0,
            typing: false,
            listening: false,
            voice_supported: false,
            layout: Layout::Full,
            panel_open: true,
            title,
            suggestions: Vec::new(),
            session_id: String::new(),
            endpoint: String::new(),
            outstanding: 0,
        }
    }

    /// Build the state from configuration. The collapsible layout starts closed.
    pub fn from_config(config: &Config) -> Self {
        let mut state = Self::new(config.ui.title.clone());
        state.layout = config.ui.layout;
        state.panel_open = config.ui.layout == Layout::Full;
        state.suggestions = config.ui.suggestions.clone();
        state.endpoint = config.backend.url.clone();
        state
    }

    /// Whether the chat panel is visible.
    pub fn is_open(&self) -> bool {
        self.layout == Layout::Full || self.panel_open
    }

    /// Flip the collapsible panel. No effect in the full layout.
    pub fn toggle_panel(&mut self) {
        if self.layout == Layout::Collapsible {
            self.panel_open = !self.panel_open;
        }
    }

    /// The current input if it has non-blank content. The buffer is left as is;
    /// the chat widget clears it once the message is recorded.
    pub fn take_submission(&self) -> Option<String> {
        if self.input.trim().is_empty() {
            None
        } else {
            Some(self.input.clone())
        }
    }

    /// Replace the input buffer and move the cursor to its end.
    pub fn prefill_input(&mut self, text: &str) {
        self.input = text.to_string();
        self.cursor_pos = self.input_char_len();
    }

    /// Fill the input from suggestion `index` (zero-based). Returns false if there is none.
    pub fn apply_suggestion(&mut self, index: usize) -> bool {
        match self.suggestions.get(index).cloned() {
            Some(text) => {
                self.prefill_input(&text);
                true
            }
            None => false,
        }
    }

    /// Clamp the cursor position to the valid character range of the input buffer.
    pub fn clamp_cursor(&mut self) {
        self.cursor_pos = self.cursor_pos.min(self.input_char_len());
    }

    /// Return the current cursor byte index in the UTF-8 input buffer.
    pub fn cursor_byte_index(&self) -> usize {
        char_index_to_byte_index(&self.input, self.cursor_pos)
    }

    /// Return the total number of characters in the input buffer.
    pub fn input_char_len(&self) -> usize {
        self.input.chars().count()
    }

    /// Insert a character at the cursor and advance by one character.
    pub fn insert_char_at_cursor(&mut self, c: char) {
        self.clamp_cursor();
        let byte_index = self.cursor_byte_index();
        self.input.insert(byte_index, c);
        self.cursor_pos += 1;
    }

    /// Insert pasted text at the cursor.
    pub fn insert_str_at_cursor(&mut self, text: &str) {
        for c in text.chars().filter(|c| *c == '\n' || !c.is_control()) {
            self.insert_char_at_cursor(c);
        }
    }

    /// Delete the character before the cursor (backspace behavior).
    pub fn backspace_char(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos == 0 {
            return;
        }

        let end = self.cursor_byte_index();
        let start = char_index_to_byte_index(&self.input, self.cursor_pos - 1);
        self.input.replace_range(start..end, "");
        self.cursor_pos -= 1;
    }

    /// Delete the character at the cursor (delete behavior).
    pub fn delete_char_at_cursor(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos >= self.input_char_len() {
            return;
        }

        let start = self.cursor_byte_index();
        let end = char_index_to_byte_index(&self.input, self.cursor_pos + 1);
        self.input.replace_range(start..end, "");
    }

    pub fn move_cursor_left(&mut self) {
        self.clamp_cursor();
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.clamp_cursor();
        if self.cursor_pos < self.input_char_len() {
            self.cursor_pos += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_pos = self.input_char_len();
    }

    /// The input buffer split into its lines (at least one).
    pub fn input_lines(&self) -> Vec<&str> {
        self.input.split('\n').collect()
    }

    pub fn input_line_count(&self) -> usize {
        self.input_lines().len()
    }

    /// Zero-based line index of the cursor within the input.
    pub fn cursor_line(&self) -> usize {
        self.input
            .chars()
            .take(self.cursor_pos)
            .filter(|c| *c == '\n')
            .count()
    }

    /// Zero-based character column of the cursor within its line.
    pub fn cursor_column(&self) -> usize {
        self.input
            .chars()
            .take(self.cursor_pos)
            .collect::<Vec<_>>()
            .iter()
            .rev()
            .take_while(|c| **c != '\n')
            .count()
    }
}

impl RenderSink for TuiState {
    fn reset(&mut self) {
        self.rows.clear();
        self.typing = false;
        self.scroll_offset = 0;
    }

    fn append_row(&mut self, message: &Message) {
        self.rows.push(ChatRow::from_message(message));
    }

    fn set_typing(&mut self, on: bool) {
        self.typing = on;
    }

    fn clear_input(&mut self) {
        self.input.clear();
        self.cursor_pos = 0;
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }
}

/// Strip control characters (escape sequences included) so remote text cannot
/// drive the terminal. Newlines survive; tabs become spaces.
pub fn sanitize_for_display(text: &str) -> String {
    text.chars()
        .filter_map(|c| match c {
            '\n' => Some('\n'),
            '\t' => Some(' '),
            c if c.is_control() => None,
            c => Some(c),
        })
        .collect()
}

fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    if char_index == 0 {
        return 0;
    }

    match s.char_indices().nth(char_index) {
        Some((idx, _)) => idx,
        None => s.len(),
    }
}
