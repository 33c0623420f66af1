// ABOUTME: Chat module — conversation orchestration independent of any particular screen.
// ABOUTME: The widget mutates the store and reports rendering effects through a RenderSink.

pub mod sequencer;
pub mod sink;
pub mod widget;

pub use sequencer::{ReplySequencer, SendTicket};
pub use sink::{PrintSink, RecordingSink, RenderSink};
pub use widget::{ChatWidget, PendingSend, SendOutcome};
