// ABOUTME: Main TUI rendering function — assembles header, chat, suggestions, input, and status bar.
// ABOUTME: In the collapsible layout a closed panel renders only a one-line launcher.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::tui::state::TuiState;
use crate::tui::widgets::chat::render_chat_lines;
use crate::tui::widgets::status::{StatusBarParams, status_line};
use crate::tui::widgets::suggestions::suggestion_line;

// Maximum height the input area can grow to (in terminal rows).
const MAX_INPUT_HEIGHT: u16 = 8;

/// Render the full TUI screen layout to the given frame.
pub fn render(frame: &mut Frame, state: &mut TuiState) {
    let area = frame.area();

    if !state.is_open() {
        render_launcher(frame, state, area);
        return;
    }

    // +2 accounts for top and bottom borders
    let input_height = to_u16(state.input_line_count())
        .saturating_add(2)
        .clamp(3, MAX_INPUT_HEIGHT);
    let has_suggestions = !state.suggestions.is_empty();

    let mut constraints = vec![
        Constraint::Length(1), // Header
        Constraint::Min(3),    // Chat area
    ];
    if has_suggestions {
        constraints.push(Constraint::Length(1)); // Suggestions
    }
    constraints.push(Constraint::Length(input_height)); // Input area
    constraints.push(Constraint::Length(1)); // Status bar

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    // Header
    let mut header = vec![Span::styled(
        format!(" 💬 {}", state.title),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )];
    let mut hints = vec!["Ctrl+L clear"];
    if state.voice_supported {
        hints.push("Ctrl+R voice");
    }
    if state.layout == crate::config::Layout::Collapsible {
        hints.push("Ctrl+O hide");
    }
    header.push(Span::styled(
        format!("  {}", hints.join(" · ")),
        Style::default().fg(Color::DarkGray),
    ));
    frame.render_widget(Paragraph::new(Line::from(header)), chunks[0]);

    // Chat area
    let chat_chunk = chunks[1];
    let chat_lines = render_chat_lines(&state.rows, state.typing);
    let mut chat_paragraph = Paragraph::new(chat_lines.clone()).wrap(Wrap { trim: false });

    // Use ratatui's own line_count() so the scroll math matches its wrapping.
    let mut total_lines = chat_paragraph.line_count(chat_chunk.width);
    if total_lines > usize::from(u16::MAX) {
        let tail = tail_within_scroll_range(chat_lines, chat_chunk.width);
        chat_paragraph = Paragraph::new(tail).wrap(Wrap { trim: false });
        total_lines = chat_paragraph.line_count(chat_chunk.width);
    }
    let max_scroll = to_u16(total_lines).saturating_sub(chat_chunk.height);
    if state.scroll_offset > max_scroll {
        state.scroll_offset = max_scroll;
    }
    // scroll_offset is lines scrolled up from the bottom (0 = at bottom)
    let scroll = max_scroll.saturating_sub(state.scroll_offset);
    frame.render_widget(chat_paragraph.scroll((scroll, 0)), chat_chunk);

    let (input_chunk, status_chunk) = if has_suggestions {
        frame.render_widget(Paragraph::new(suggestion_line(&state.suggestions)), chunks[2]);
        (chunks[3], chunks[4])
    } else {
        (chunks[2], chunks[3])
    };

    // Input area, with activity in the border title.
    let mut input_block = Block::default()
        .borders(Borders::TOP | Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));
    if state.listening {
        input_block = input_block.title(Span::styled(
            " 🎙 listening... ",
            Style::default().fg(Color::Magenta),
        ));
    } else if state.typing {
        input_block = input_block.title(Span::styled(
            " waiting for reply... ",
            Style::default().fg(Color::DarkGray),
        ));
    }
    state.clamp_cursor();
    let cursor_line = state.cursor_line();
    // Keep the cursor's line inside the bordered input viewport.
    let input_rows = usize::from(input_chunk.height.saturating_sub(2).max(1));
    let input_scroll = cursor_line.saturating_sub(input_rows - 1);
    let visible_input: Vec<Line> = state
        .input_lines()
        .into_iter()
        .skip(input_scroll)
        .take(input_rows)
        .map(|line| Line::from(line.to_string()))
        .collect();
    let input = Paragraph::new(visible_input).block(input_block);
    frame.render_widget(input, input_chunk);

    if input_chunk.width > 0 && input_chunk.height > 1 {
        let cursor_col = state.cursor_column();

        // Visual (display) width of the text before the cursor on its line.
        let lines = state.input_lines();
        let line_text = lines.get(cursor_line).copied().unwrap_or("");
        let prefix: String = line_text.chars().take(cursor_col).collect();
        let visual_col = UnicodeWidthStr::width(prefix.as_str());

        let max_visual_col = input_chunk.width.saturating_sub(1) as usize;
        let clamped_visual_col = visual_col.min(max_visual_col);

        let cursor_x = input_chunk.x.saturating_add(clamped_visual_col as u16);
        // +1 for the top border, then offset by the cursor's visible row.
        let visible_row = cursor_line - input_scroll;
        let cursor_y = input_chunk
            .y
            .saturating_add(1)
            .saturating_add(to_u16(visible_row));
        frame.set_cursor_position(Position::new(cursor_x, cursor_y));
    }

    // Status bar
    let status = status_line(&StatusBarParams {
        session_id: &state.session_id,
        endpoint: &state.endpoint,
        message_count: state.rows.len(),
        outstanding: state.outstanding,
        listening: state.listening,
    });
    frame.render_widget(Paragraph::new(status), status_chunk);
}

/// Saturating conversion for terminal row counts.
fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// The newest lines whose wrapped height still fits a `u16` scroll offset.
/// Older lines are dropped from the rendered view, never from the history.
fn tail_within_scroll_range(lines: Vec<Line<'static>>, width: u16) -> Vec<Line<'static>> {
    let budget = usize::from(u16::MAX);
    let mut used = 0usize;
    let mut keep = 0usize;
    for line in lines.iter().rev() {
        let height = Paragraph::new(line.clone())
            .wrap(Wrap { trim: false })
            .line_count(width);
        if used + height > budget {
            break;
        }
        used += height;
        keep += 1;
    }
    let start = lines.len() - keep;
    lines.into_iter().skip(start).collect()
}

/// The closed collapsible panel: a single launcher line at the bottom.
fn render_launcher(frame: &mut Frame, state: &TuiState, area: Rect) {
    if area.height == 0 {
        return;
    }
    let row = Rect::new(area.x, area.y + area.height - 1, area.width, 1);
    let launcher = Line::from(vec![
        Span::styled(
            format!(" 💬 {} ", state.title),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "  Ctrl+O to chat · Esc to quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(launcher), row);
}
