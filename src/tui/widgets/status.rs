// ABOUTME: Status bar widget — renders session token, endpoint, message count, and activity.
// ABOUTME: Displayed at the bottom of the TUI as a single-line summary.

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// Inputs for the status bar.
pub struct StatusBarParams<'a> {
    pub session_id: &'a str,
    pub endpoint: &'a str,
    pub message_count: usize,
    pub outstanding: usize,
    pub listening: bool,
}

/// Render the status bar line.
pub fn status_line(params: &StatusBarParams<'_>) -> Line<'static> {
    let dim = Style::default().fg(Color::DarkGray);
    let mut spans = vec![
        Span::styled(
            format!(" {} ", params.session_id),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled("| ", dim),
        Span::styled(
            format!("{} ", display_endpoint(params.endpoint)),
            Style::default().fg(Color::White),
        ),
        Span::styled("| ", dim),
        Span::styled(
            format!("{} ", format_messages(params.message_count)),
            Style::default().fg(Color::White),
        ),
    ];

    if params.outstanding > 0 {
        spans.push(Span::styled("| ", dim));
        let label = if params.outstanding == 1 {
            "waiting for reply... ".to_string()
        } else {
            format!("waiting for {} replies... ", params.outstanding)
        };
        spans.push(Span::styled(label, Style::default().fg(Color::Yellow)));
    }

    if params.listening {
        spans.push(Span::styled("| ", dim));
        spans.push(Span::styled(
            "🎙 listening... ",
            Style::default().fg(Color::Magenta),
        ));
    }

    Line::from(spans)
}

/// "1 message" / "N messages".
pub fn format_messages(count: usize) -> String {
    if count == 1 {
        "1 message".to_string()
    } else {
        format!("{} messages", count)
    }
}

/// Endpoint without its scheme, to save width.
fn display_endpoint(url: &str) -> &str {
    url.split_once("://").map_or(url, |(_, rest)| rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.to_string()).collect()
    }

    #[test]
    fn format_messages_pluralizes() {
        assert_eq!(format_messages(0), "0 messages");
        assert_eq!(format_messages(1), "1 message");
        assert_eq!(format_messages(12), "12 messages");
    }

    #[test]
    fn status_line_shows_waiting() {
        let line = status_line(&StatusBarParams {
            session_id: "sess_abc12345",
            endpoint: "http://127.0.0.1:4000/chat",
            message_count: 3,
            outstanding: 1,
            listening: false,
        });
        let text = text(&line);
        assert!(text.contains("sess_abc12345"));
        assert!(text.contains("127.0.0.1:4000/chat"));
        assert!(!text.contains("http://"));
        assert!(text.contains("3 messages"));
        assert!(text.contains("waiting for reply"));
        assert!(!text.contains("listening"));
    }

    #[test]
    fn status_line_idle_with_listening() {
        let line = status_line(&StatusBarParams {
            session_id: "sess_x",
            endpoint: "localhost/chat",
            message_count: 1,
            outstanding: 0,
            listening: true,
        });
        let text = text(&line);
        assert!(text.contains("localhost/chat"));
        assert!(!text.contains("waiting"));
        assert!(text.contains("listening"));
    }

    #[test]
    fn status_line_counts_multiple_replies() {
        let line = status_line(&StatusBarParams {
            session_id: "s",
            endpoint: "e",
            message_count: 0,
            outstanding: 2,
            listening: false,
        });
        assert!(text(&line).contains("waiting for 2 replies"));
    }
}
