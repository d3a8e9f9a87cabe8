#![deny(unsafe_code)]

//! Chat domain for the Lawwise desktop app: transcript storage, the canned
//! reply simulator and the per-surface session state. Nothing here depends on
//! the GUI toolkit.

pub mod catalog;
pub mod error;
pub mod history;
pub mod message;
pub mod persona;
pub mod session;
pub mod simulator;
pub mod store;

pub use catalog::{RESPONSE_CATALOG, ResponseCatalog};
pub use error::{ChatError, ChatResult};
pub use history::{HISTORY_PREVIEW_CHARS, HistoryEntry, TRUNCATION_MARKER, preview};
pub use message::{ASSISTANT_NAME, Avatar, ChatMessage, MessageId, Role};
pub use persona::{ParsePersonaError, Persona};
pub use session::{
    ChatSession, ComposeRejection, ComposeState, ComposeTransition, ReplyTicket, SendOutcome,
};
pub use simulator::{
    REPLY_DELAY, ReplyHandle, ReplyProvider, ReplyStream, ReplyWorker, ResponseSimulator,
    SimulatedReply,
};
pub use store::MessageStore;
