use chrono::{DateTime, Local};

/// Display name of the simulated assistant.
pub const ASSISTANT_NAME: &str = "Lawwise";

/// Stable identifier for one message within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(pub u64);

impl MessageId {
    /// Creates a typed message identifier.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// Chat speaker role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Label used by the compact history view.
    pub fn speaker_label(self) -> &'static str {
        match self {
            Self::User => "You",
            Self::Assistant => ASSISTANT_NAME,
        }
    }

    pub fn avatar(self) -> Avatar {
        match self {
            Self::User => USER_AVATAR,
            Self::Assistant => BOT_AVATAR,
        }
    }
}

/// Static avatar reference with the text shown when the image cannot load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Avatar {
    pub asset: &'static str,
    pub alt: &'static str,
    pub fallback: &'static str,
}

pub const BOT_AVATAR: Avatar = Avatar {
    asset: "bot-avatar.png",
    alt: "Bot",
    fallback: "LW",
};

pub const USER_AVATAR: Avatar = Avatar {
    asset: "user-avatar.png",
    alt: "User",
    fallback: "US",
};

/// One immutable transcript entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Local>,
}

impl ChatMessage {
    pub fn new(
        id: MessageId,
        role: Role,
        content: impl Into<String>,
        timestamp: DateTime<Local>,
    ) -> Self {
        Self {
            id,
            role,
            content: content.into(),
            timestamp,
        }
    }

    /// Local wall-clock time, e.g. `3:07:45 PM`.
    pub fn display_time(&self) -> String {
        self.timestamp.format("%-I:%M:%S %p").to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn display_time_uses_twelve_hour_clock() {
        let timestamp = Local.with_ymd_and_hms(2024, 5, 1, 15, 7, 45).unwrap();
        let message = ChatMessage::new(MessageId::new(1), Role::User, "hi", timestamp);

        assert_eq!(message.display_time(), "3:07:45 PM");
    }

    #[test]
    fn avatars_carry_textual_fallbacks() {
        assert_eq!(Role::Assistant.avatar().fallback, "LW");
        assert_eq!(Role::User.avatar().fallback, "US");
        assert_eq!(Role::Assistant.speaker_label(), "Lawwise");
        assert_eq!(Role::User.speaker_label(), "You");
    }
}
