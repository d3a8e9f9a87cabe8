/// Event contracts for chat module wiring.
pub mod events;
mod history;
pub mod message_input;
pub mod message_list;
pub mod scroll_manager;
pub mod view;

pub use events::{ChatTab, DraftChanged, Submit};
pub use message_input::MessageInput;
pub use message_list::{MessageList, default_assets_path};
pub use scroll_manager::ScrollManager;
pub use view::ChatView;
