/// Emitted when the user commits the input with Enter or the Send button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submit {
    pub content: String,
}

impl Submit {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Emitted on every edit so the owning surface can mirror the draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftChanged {
    pub content: String,
}

/// Which half of the chat surface is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatTab {
    #[default]
    Transcript,
    History,
}

impl ChatTab {
    pub const ALL: [ChatTab; 2] = [ChatTab::Transcript, ChatTab::History];

    pub fn label(self) -> &'static str {
        match self {
            Self::Transcript => "Chat",
            Self::History => "History",
        }
    }

    pub fn element_id(self) -> &'static str {
        match self {
            Self::Transcript => "chat-tab-transcript",
            Self::History => "chat-tab-history",
        }
    }
}
