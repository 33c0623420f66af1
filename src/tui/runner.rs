// ABOUTME: Terminal event loop — draws the screen and multiplexes key, mouse, and task events.
// ABOUTME: Sets up raw mode and mouse capture, and always restores the terminal on exit.

use std::io::stdout;

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture, Event,
    EventStream, KeyEventKind, MouseEventKind,
};
use crossterm::execute;
use futures::StreamExt;
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;

use crate::tui::controller::{Controller, LoopEvent};
use crate::tui::input::handle_key;
use crate::tui::state::TuiState;
use crate::tui::ui;

const MOUSE_SCROLL_STEP: u16 = 3;

/// Run the TUI until the user quits.
pub async fn run(
    controller: Controller,
    state: TuiState,
    rx: mpsc::Receiver<LoopEvent>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();
    execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)?;

    let result = event_loop(&mut terminal, controller, state, rx).await;

    let _ = execute!(stdout(), DisableBracketedPaste, DisableMouseCapture);
    ratatui::restore();
    result
}

async fn event_loop(
    terminal: &mut DefaultTerminal,
    mut controller: Controller,
    mut state: TuiState,
    mut rx: mpsc::Receiver<LoopEvent>,
) -> anyhow::Result<()> {
    let mut events = EventStream::new();
    controller.start(&mut state);

    loop {
        terminal.draw(|frame| ui::render(frame, &mut state))?;

        tokio::select! {
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    let action = handle_key(&mut state, key);
                    if !controller.handle_input(action, &mut state) {
                        break;
                    }
                }
                Some(Ok(Event::Mouse(mouse))) => match mouse.kind {
                    MouseEventKind::ScrollUp => {
                        state.scroll_offset = state.scroll_offset.saturating_add(MOUSE_SCROLL_STEP);
                    }
                    MouseEventKind::ScrollDown => {
                        state.scroll_offset = state.scroll_offset.saturating_sub(MOUSE_SCROLL_STEP);
                    }
                    _ => {}
                },
                Some(Ok(Event::Paste(text))) => {
                    if state.is_open() {
                        state.insert_str_at_cursor(&text);
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            Some(event) = rx.recv() => {
                controller.handle_event(event, &mut state);
            }
        }
    }

    tracing::info!(
        messages = controller.widget().messages().len(),
        "chat closed"
    );
    Ok(())
}
