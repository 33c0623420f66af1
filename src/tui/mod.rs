// ABOUTME: TUI module — ratatui full-screen chat for chatbox.
// ABOUTME: Chat thread, input handling, suggestions, status bar, and the terminal event loop.

pub mod controller;
pub mod input;
pub mod runner;
pub mod state;
pub mod ui;
pub mod widgets;

pub use state::*;
