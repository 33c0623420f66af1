// ABOUTME: App orchestrator — wires config, profile storage, backend, voice capture, and the TUI.
// ABOUTME: Also backs the one-shot CLI commands (send, history, clear, reset-history).

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::mpsc;

use crate::backend::{ChatBackend, HttpBackend};
use crate::chat::{ChatWidget, PrintSink, RecordingSink, SendOutcome};
use crate::config::Config;
use crate::store::{ConversationStore, FileStorage, StoreKeys};
use crate::tui::controller::Controller;
use crate::tui::runner;
use crate::tui::state::TuiState;
use crate::voice::{CommandVoiceCapture, VoiceCapture};

/// Top-level application for one profile.
pub struct App {
    config: Config,
    storage_path: PathBuf,
}

impl App {
    pub fn new(config: Config, storage_path: PathBuf) -> Self {
        Self {
            config,
            storage_path,
        }
    }

    fn open_widget(&self) -> anyhow::Result<ChatWidget> {
        let storage = FileStorage::open(&self.storage_path).with_context(|| {
            format!("failed to open chat storage {}", self.storage_path.display())
        })?;
        let store = ConversationStore::load(Box::new(storage), StoreKeys::from(&self.config.storage));
        Ok(ChatWidget::new(store, self.config.chat.clone()))
    }

    /// The HTTP backend described by the config.
    pub fn http_backend(&self) -> anyhow::Result<HttpBackend> {
        HttpBackend::from_config(&self.config.backend)
    }

    /// Run the interactive chat until the user quits.
    pub async fn run(self) -> anyhow::Result<()> {
        let widget = self.open_widget()?;
        let backend: Arc<dyn ChatBackend> = Arc::new(self.http_backend()?);
        let voice: Arc<dyn VoiceCapture> =
            Arc::new(CommandVoiceCapture::from_config(&self.config.voice));

        tracing::info!(
            endpoint = %self.config.backend.url,
            storage = %self.storage_path.display(),
            voice = voice.is_supported(),
            "starting chat"
        );

        let (tx, rx) = mpsc::channel(64);
        let controller = Controller::new(widget, backend, voice, tx);
        let state = TuiState::from_config(&self.config);
        runner::run(controller, state, rx).await
    }

    /// Send one message and print the rows it produced.
    pub async fn send_once<W: Write>(
        &self,
        text: &str,
        backend: &dyn ChatBackend,
        out: W,
    ) -> anyhow::Result<SendOutcome> {
        let mut widget = self.open_widget()?;
        widget.initialize(&mut RecordingSink::default());

        let mut sink = PrintSink::new(out);
        let outcome = widget.send_and_await_reply(text, backend, &mut sink).await;
        sink.into_inner().flush()?;
        Ok(outcome)
    }

    /// Print the stored transcript. Returns the number of messages.
    pub fn history<W: Write>(&self, out: W) -> anyhow::Result<usize> {
        let widget = self.open_widget()?;
        let mut sink = PrintSink::new(out);
        widget.render_all(&mut sink);
        sink.into_inner().flush()?;
        Ok(widget.messages().len())
    }

    /// Clear the conversation and start a new session. Returns the new token.
    pub fn clear(&self) -> anyhow::Result<String> {
        let mut widget = self.open_widget()?;
        widget.clear_conversation(&mut RecordingSink::default());
        Ok(widget.session_id().to_string())
    }

    /// Empty the transcript but keep the session.
    pub fn reset_history(&self) -> anyhow::Result<()> {
        let mut widget = self.open_widget()?;
        widget.reset_history(&mut RecordingSink::default());
        Ok(())
    }
}
