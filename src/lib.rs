// ABOUTME: Library root for chatbox — re-exports all modules for integration testing.
// ABOUTME: The binary entry point is in main.rs, which uses this crate as a library.

pub mod app;
pub mod backend;
pub mod chat;
pub mod config;
pub mod logging;
pub mod store;
pub mod tui;
pub mod voice;
