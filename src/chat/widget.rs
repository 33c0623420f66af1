// ABOUTME: Chat widget — drives the conversation: greeting, user input, backend round trips, and clearing.
// ABOUTME: Owns the store and reply sequencer; all rendering goes through a RenderSink.

use crate::backend::{BackendError, ChatBackend, ChatRequest, ReplyResult};
use crate::chat::sequencer::{Completion, ReplySequencer, SendTicket};
use crate::chat::sink::RenderSink;
use crate::config::ChatConfig;
use crate::store::{ConversationStore, Message};

/// A send that has been recorded locally and is waiting on the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSend {
    pub ticket: SendTicket,
    pub request: ChatRequest,
}

/// What a send ended up doing to the conversation.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Blank input; nothing was appended and no request was made.
    Ignored,
    /// The backend answered. `placeholder` is set when the body had no reply field.
    Replied { text: String, placeholder: bool },
    /// The call failed and the fixed error bubble was appended.
    Failed(BackendError),
    /// The reply is held until an earlier send resolves. Only reachable when
    /// `send_and_await_reply` runs while sends started with `begin_send` are
    /// still outstanding; the held reply is applied by their `complete_send`.
    Deferred,
}

pub struct ChatWidget {
    store: ConversationStore,
    copy: ChatConfig,
    sequencer: ReplySequencer<ReplyResult>,
    typing: bool,
}

impl ChatWidget {
    pub fn new(store: ConversationStore, copy: ChatConfig) -> Self {
        Self {
            store,
            copy,
            sequencer: ReplySequencer::new(),
            typing: false,
        }
    }

    pub fn messages(&self) -> &[Message] {
        self.store.messages()
    }

    pub fn session_id(&self) -> &str {
        self.store.session_id()
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    /// Sends still waiting to be applied.
    pub fn outstanding_sends(&self) -> usize {
        self.sequencer.outstanding()
    }

    pub fn store_mut(&mut self) -> &mut ConversationStore {
        &mut self.store
    }

    /// Greet on an empty history, then render everything.
    pub fn initialize(&mut self, sink: &mut dyn RenderSink) {
        if self.store.is_empty() {
            self.store.append(Message::bot(self.copy.greeting.clone()));
        }
        tracing::info!(
            session_id = %self.store.session_id(),
            messages = self.store.len(),
            "conversation loaded"
        );
        self.render_all(sink);
    }

    /// Append trimmed user text. Returns false (and does nothing) for blank input.
    pub fn append_user_message(&mut self, text: &str, sink: &mut dyn RenderSink) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return false;
        }
        let message = self.store.append(Message::user(trimmed));
        sink.append_row(message);
        sink.scroll_to_bottom();
        sink.clear_input();
        true
    }

    /// Show or hide the typing indicator. Repeated calls with the same value are no-ops.
    pub fn set_typing_indicator(&mut self, on: bool, sink: &mut dyn RenderSink) {
        if self.typing == on {
            return;
        }
        self.typing = on;
        sink.set_typing(on);
        if on {
            sink.scroll_to_bottom();
        }
    }

    /// Record the user message locally and produce the request to send.
    ///
    /// Returns `None` for blank input.
    pub fn begin_send(&mut self, text: &str, sink: &mut dyn RenderSink) -> Option<PendingSend> {
        if !self.append_user_message(text, sink) {
            return None;
        }
        self.set_typing_indicator(true, sink);
        let ticket = self.sequencer.issue();
        Some(PendingSend {
            ticket,
            request: ChatRequest {
                message: text.to_string(),
                session_id: self.store.session_id().to_string(),
            },
        })
    }

    /// Feed a backend result back in. Returns every send applied as a result,
    /// in send order.
    pub fn complete_send(
        &mut self,
        ticket: SendTicket,
        result: ReplyResult,
        sink: &mut dyn RenderSink,
    ) -> Vec<(SendTicket, SendOutcome)> {
        let ready = match self.sequencer.complete(ticket, result) {
            Completion::Stale => {
                tracing::debug!(seq = ticket.seq, "dropping reply from a cleared conversation");
                return Vec::new();
            }
            Completion::Ready(ready) => ready,
        };

        let mut applied = Vec::with_capacity(ready.len());
        for (t, result) in ready {
            applied.push((t, self.apply_reply(result, sink)));
        }

        if self.sequencer.outstanding() == 0 {
            self.set_typing_indicator(false, sink);
        }
        applied
    }

    fn apply_reply(&mut self, result: ReplyResult, sink: &mut dyn RenderSink) -> SendOutcome {
        let (text, outcome) = match result {
            Ok(Some(text)) => (
                text.clone(),
                SendOutcome::Replied {
                    text,
                    placeholder: false,
                },
            ),
            Ok(None) => {
                let text = self.copy.placeholder_reply.clone();
                (
                    text.clone(),
                    SendOutcome::Replied {
                        text,
                        placeholder: true,
                    },
                )
            }
            Err(e) => {
                tracing::error!(error = %e, "backend error");
                (self.copy.error_text.clone(), SendOutcome::Failed(e))
            }
        };
        let message = self.store.append(Message::bot(text));
        sink.append_row(message);
        sink.scroll_to_bottom();
        outcome
    }

    /// Append the user message, ask the backend, and record its reply (or the error bubble).
    ///
    /// Calls never overlap each other since this borrows the widget mutably, so
    /// on its own it always returns `Ignored`, `Replied` or `Failed`. Mixed with
    /// an outstanding `begin_send` it returns `Deferred`.
    pub async fn send_and_await_reply(
        &mut self,
        text: &str,
        backend: &dyn ChatBackend,
        sink: &mut dyn RenderSink,
    ) -> SendOutcome {
        let Some(pending) = self.begin_send(text, sink) else {
            return SendOutcome::Ignored;
        };
        let result = backend.send(&pending.request).await;
        self.complete_send(pending.ticket, result, sink)
            .into_iter()
            .find(|(t, _)| *t == pending.ticket)
            .map_or(SendOutcome::Deferred, |(_, outcome)| outcome)
    }

    /// Forget the conversation and start a new backend session.
    pub fn clear_conversation(&mut self, sink: &mut dyn RenderSink) {
        self.store.clear_messages();
        self.sequencer.reset();
        self.typing = false;
        sink.reset();
        self.store.rotate_session();
        sink.scroll_to_bottom();
    }

    /// Empty the history but keep the session token.
    pub fn reset_history(&mut self, sink: &mut dyn RenderSink) {
        self.store.clear_messages();
        self.sequencer.reset();
        self.typing = false;
        self.render_all(sink);
    }

    /// Re-render every message in stored order.
    pub fn render_all(&self, sink: &mut dyn RenderSink) {
        sink.reset();
        for message in self.store.messages() {
            sink.append_row(message);
        }
        if self.typing {
            sink.set_typing(true);
        }
        sink.scroll_to_bottom();
    }
}
