// ABOUTME: Suggestion bar widget — lists canned prompts with the function key that prefills each.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Suggestions beyond F9 have no key and are not shown.
pub const MAX_SUGGESTIONS: usize = 9;

pub fn suggestion_line(suggestions: &[String]) -> Line<'static> {
    let mut spans = Vec::new();
    for (i, text) in suggestions.iter().take(MAX_SUGGESTIONS).enumerate() {
        spans.push(Span::styled(
            format!(" F{} ", i + 1),
            Style::default()
                .fg(Color::Black)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            format!(" {}  ", text),
            Style::default().fg(Color::Gray),
        ));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_each_suggestion() {
        let line = suggestion_line(&["Fees".to_string(), "Events".to_string()]);
        let text: String = line.spans.iter().map(|s| s.content.to_string()).collect();
        assert!(text.contains("F1"));
        assert!(text.contains("Fees"));
        assert!(text.contains("F2"));
        assert!(text.contains("Events"));
    }

    #[test]
    fn caps_at_nine() {
        let many: Vec<String> = (0..12).map(|i| format!("s{}", i)).collect();
        let line = suggestion_line(&many);
        assert_eq!(line.spans.len(), MAX_SUGGESTIONS * 2);
    }
}
