// ABOUTME: TUI controller — routes input actions and background results into the chat widget.
// ABOUTME: Backend calls and voice capture run as spawned tasks that report back over an mpsc channel.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::backend::{ChatBackend, ReplyResult};
use crate::chat::{ChatWidget, SendTicket};
use crate::config::Layout;
use crate::tui::input::InputResult;
use crate::tui::state::TuiState;
use crate::voice::VoiceCapture;

/// Results delivered to the event loop from background tasks.
pub enum LoopEvent {
    /// A backend call finished.
    Reply {
        ticket: SendTicket,
        result: ReplyResult,
    },
    /// Voice capture ended, with the recognized utterance if any.
    Voice(anyhow::Result<Option<String>>),
}

pub struct Controller {
    widget: ChatWidget,
    backend: Arc<dyn ChatBackend>,
    voice: Arc<dyn VoiceCapture>,
    tx: mpsc::Sender<LoopEvent>,
}

impl Controller {
    pub fn new(
        widget: ChatWidget,
        backend: Arc<dyn ChatBackend>,
        voice: Arc<dyn VoiceCapture>,
        tx: mpsc::Sender<LoopEvent>,
    ) -> Self {
        Self {
            widget,
            backend,
            voice,
            tx,
        }
    }

    pub fn widget(&self) -> &ChatWidget {
        &self.widget
    }

    /// Load the conversation onto the screen. The collapsible panel opens
    /// itself the first time a profile is used.
    pub fn start(&mut self, state: &mut TuiState) {
        state.voice_supported = self.voice.is_supported();
        if state.layout == Layout::Collapsible && self.widget.store_mut().first_visit() {
            state.panel_open = true;
        }
        self.widget.initialize(state);
        self.sync(state);
    }

    /// Apply a key action. Returns false when the app should quit.
    pub fn handle_input(&mut self, action: InputResult, state: &mut TuiState) -> bool {
        match action {
            InputResult::None => {}
            InputResult::Send(text) => self.dispatch_send(&text, state),
            InputResult::Clear => self.widget.clear_conversation(state),
            InputResult::Voice => self.start_listening(state),
            InputResult::Quit => return false,
        }
        self.sync(state);
        true
    }

    /// Apply a result from a background task.
    pub fn handle_event(&mut self, event: LoopEvent, state: &mut TuiState) {
        match event {
            LoopEvent::Reply { ticket, result } => {
                self.widget.complete_send(ticket, result, state);
            }
            LoopEvent::Voice(result) => {
                state.listening = false;
                match result {
                    Ok(Some(text)) => {
                        state.prefill_input(&text);
                        self.dispatch_send(&text, state);
                    }
                    Ok(None) => tracing::debug!("voice capture heard nothing"),
                    Err(e) => tracing::warn!(error = %e, "voice capture failed"),
                }
            }
        }
        self.sync(state);
    }

    fn dispatch_send(&mut self, text: &str, state: &mut TuiState) {
        let Some(pending) = self.widget.begin_send(text, state) else {
            return;
        };
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = backend.send(&pending.request).await;
            let _ = tx
                .send(LoopEvent::Reply {
                    ticket: pending.ticket,
                    result,
                })
                .await;
        });
    }

    fn start_listening(&mut self, state: &mut TuiState) {
        if !self.voice.is_supported() || state.listening {
            return;
        }
        state.listening = true;
        let voice = Arc::clone(&self.voice);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = voice.listen().await;
            let _ = tx.send(LoopEvent::Voice(result)).await;
        });
    }

    fn sync(&self, state: &mut TuiState) {
        state.session_id = self.widget.session_id().to_string();
        state.outstanding = self.widget.outstanding_sends();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendError, ChatRequest};
    use crate::config::{ChatConfig, Config};
    use crate::store::{ConversationStore, MemoryStorage, Sender, StoreKeys};
    use async_trait::async_trait;

    struct EchoBackend;

    #[async_trait]
    impl ChatBackend for EchoBackend {
        async fn send(&self, request: &ChatRequest) -> ReplyResult {
            Ok(Some(format!("echo: {}", request.message)))
        }
    }

    struct DownBackend;

    #[async_trait]
    impl ChatBackend for DownBackend {
        async fn send(&self, _request: &ChatRequest) -> ReplyResult {
            Err(BackendError::Status(502))
        }
    }

    struct FixedVoice(Option<&'static str>);

    #[async_trait]
    impl VoiceCapture for FixedVoice {
        fn is_supported(&self) -> bool {
            self.0.is_some()
        }

        async fn listen(&self) -> anyhow::Result<Option<String>> {
            Ok(self.0.map(str::to_string))
        }
    }

    fn controller(
        backend: Arc<dyn ChatBackend>,
        voice: Option<&'static str>,
        storage: &MemoryStorage,
    ) -> (Controller, mpsc::Receiver<LoopEvent>) {
        let store = ConversationStore::load(Box::new(storage.clone()), StoreKeys::default());
        let widget = ChatWidget::new(store, ChatConfig::default());
        let (tx, rx) = mpsc::channel(16);
        (
            Controller::new(widget, backend, Arc::new(FixedVoice(voice)), tx),
            rx,
        )
    }

    #[tokio::test]
    async fn send_round_trip_updates_screen() {
        let storage = MemoryStorage::new();
        let (mut ctl, mut rx) = controller(Arc::new(EchoBackend), None, &storage);
        let mut state = TuiState::from_config(&Config::default());
        ctl.start(&mut state);
        assert_eq!(state.rows.len(), 1, "greeting");
        assert!(state.session_id.starts_with("sess_"));

        state.prefill_input("Hello");
        assert!(ctl.handle_input(InputResult::Send("Hello".to_string()), &mut state));
        assert_eq!(state.rows.len(), 2);
        assert_eq!(state.input, "");
        assert!(state.typing);
        assert_eq!(state.outstanding, 1);

        let event = rx.recv().await.unwrap();
        ctl.handle_event(event, &mut state);
        assert_eq!(state.rows.len(), 3);
        assert_eq!(state.rows[2].sender, Sender::Bot);
        assert_eq!(state.rows[2].text, "echo: Hello");
        assert!(!state.typing);
        assert_eq!(state.outstanding, 0);
    }

    #[tokio::test]
    async fn failed_send_shows_error_bubble() {
        let storage = MemoryStorage::new();
        let (mut ctl, mut rx) = controller(Arc::new(DownBackend), None, &storage);
        let mut state = TuiState::from_config(&Config::default());
        ctl.start(&mut state);

        ctl.handle_input(InputResult::Send("hi".to_string()), &mut state);
        let event = rx.recv().await.unwrap();
        ctl.handle_event(event, &mut state);

        let last = state.rows.last().unwrap();
        assert_eq!(last.sender, Sender::Bot);
        assert_eq!(last.text, ChatConfig::default().error_text);
        assert!(!state.typing);
    }

    #[tokio::test]
    async fn voice_utterance_is_sent() {
        let storage = MemoryStorage::new();
        let (mut ctl, mut rx) = controller(Arc::new(EchoBackend), Some("library hours"), &storage);
        let mut state = TuiState::from_config(&Config::default());
        ctl.start(&mut state);
        assert!(state.voice_supported);

        ctl.handle_input(InputResult::Voice, &mut state);
        assert!(state.listening);

        let voice_event = rx.recv().await.unwrap();
        ctl.handle_event(voice_event, &mut state);
        assert!(!state.listening);
        assert_eq!(state.rows.last().unwrap().text, "library hours");

        let reply = rx.recv().await.unwrap();
        ctl.handle_event(reply, &mut state);
        assert_eq!(state.rows.last().unwrap().text, "echo: library hours");
    }

    #[tokio::test]
    async fn clear_drops_reply_in_flight() {
        let storage = MemoryStorage::new();
        let (mut ctl, mut rx) = controller(Arc::new(EchoBackend), None, &storage);
        let mut state = TuiState::from_config(&Config::default());
        ctl.start(&mut state);
        let before = state.session_id.clone();

        ctl.handle_input(InputResult::Send("hello".to_string()), &mut state);
        ctl.handle_input(InputResult::Clear, &mut state);
        assert!(state.rows.is_empty());
        assert_ne!(state.session_id, before);

        let event = rx.recv().await.unwrap();
        ctl.handle_event(event, &mut state);
        assert!(state.rows.is_empty());
        assert!(ctl.widget().messages().is_empty());
    }

    #[tokio::test]
    async fn collapsible_panel_auto_opens_only_first_time() {
        let storage = MemoryStorage::new();
        let mut config = Config::default();
        config.ui.layout = Layout::Collapsible;

        let (mut ctl, _rx) = controller(Arc::new(EchoBackend), None, &storage);
        let mut state = TuiState::from_config(&config);
        ctl.start(&mut state);
        assert!(state.is_open());

        let (mut ctl, _rx) = controller(Arc::new(EchoBackend), None, &storage);
        let mut state = TuiState::from_config(&config);
        ctl.start(&mut state);
        assert!(!state.is_open());
    }

    #[tokio::test]
    async fn quit_returns_false() {
        let storage = MemoryStorage::new();
        let (mut ctl, _rx) = controller(Arc::new(EchoBackend), None, &storage);
        let mut state = TuiState::from_config(&Config::default());
        assert!(!ctl.handle_input(InputResult::Quit, &mut state));
    }
}
