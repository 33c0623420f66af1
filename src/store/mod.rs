// ABOUTME: Store module — messages, session tokens, and their local persistence.
// ABOUTME: Knows nothing about rendering or the network.

pub mod conversation;
pub mod message;
pub mod session;
pub mod storage;

pub use conversation::{ConversationStore, StoreKeys};
pub use message::{Message, Sender};
pub use storage::{FileStorage, MemoryStorage, Storage};
