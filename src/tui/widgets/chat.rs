// ABOUTME: Chat widget — renders chat rows and the typing indicator into styled ratatui Lines.
// ABOUTME: User and bot rows have distinct prefixes; each row carries a dim HH:MM stamp.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::store::Sender;
use crate::tui::state::ChatRow;

pub const USER_PREFIX: &str = "❯ ";
pub const BOT_PREFIX: &str = "⏺ ";
pub const TYPING_DOTS: &str = "● ● ●";

/// Render chat rows (and the typing indicator, if shown) into styled Lines.
pub fn render_chat_lines(rows: &[ChatRow], typing: bool) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        if idx > 0 {
            lines.push(Line::from(""));
        }

        let prefix = match row.sender {
            Sender::User => Span::styled(
                USER_PREFIX,
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            ),
            Sender::Bot => Span::styled(
                BOT_PREFIX,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
        };

        // First line gets the prefix, continuation lines are indented to match.
        let content_lines: Vec<&str> = row.text.split('\n').collect();
        let last = content_lines.len() - 1;
        for (i, text) in content_lines.iter().enumerate() {
            let mut spans = if i == 0 {
                vec![prefix.clone()]
            } else {
                vec![Span::raw("  ")]
            };
            spans.push(Span::raw(text.to_string()));
            if i == last && !row.time.is_empty() {
                spans.push(Span::styled(
                    format!("  {}", row.time),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            lines.push(Line::from(spans));
        }
    }

    if typing {
        if !rows.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(vec![
            Span::styled(BOT_PREFIX, Style::default().fg(Color::Cyan)),
            Span::styled(
                TYPING_DOTS,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]));
    }

    lines
}
