use crate::message::{ChatMessage, MessageId, Role};

/// Characters kept per line in the history view.
pub const HISTORY_PREVIEW_CHARS: usize = 50;
/// Marker appended when a preview was cut.
pub const TRUNCATION_MARKER: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub id: MessageId,
    pub role: Role,
    pub preview: String,
}

impl HistoryEntry {
    pub fn from_message(message: &ChatMessage) -> Self {
        Self {
            id: message.id,
            role: message.role,
            preview: preview(&message.content),
        }
    }

    pub fn speaker_label(&self) -> &'static str {
        self.role.speaker_label()
    }

    /// Full rendered line, e.g. `You: What is fair use?`.
    pub fn line(&self) -> String {
        format!("{}: {}", self.speaker_label(), self.preview)
    }
}

/// Cuts `content` to [`HISTORY_PREVIEW_CHARS`] characters.
///
/// Counting is by `char` so multi-byte text never splits mid-codepoint.
pub fn preview(content: &str) -> String {
    match content.char_indices().nth(HISTORY_PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}{TRUNCATION_MARKER}", &content[..cut]),
        None => content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Local;

    use super::*;

    #[test]
    fn short_content_has_no_marker() {
        assert_eq!(preview("What is fair use?"), "What is fair use?");
        assert_eq!(preview(""), "");
    }

    #[test]
    fn exactly_fifty_characters_is_not_truncated() {
        let boundary = "a".repeat(HISTORY_PREVIEW_CHARS);
        assert_eq!(preview(&boundary), boundary);
    }

    #[test]
    fn fifty_one_characters_gets_marker() {
        let over = "b".repeat(HISTORY_PREVIEW_CHARS + 1);
        assert_eq!(preview(&over), format!("{}...", "b".repeat(50)));
    }

    #[test]
    fn multibyte_text_is_cut_on_char_boundaries() {
        let text = "é".repeat(60);
        let cut = preview(&text);

        assert_eq!(cut.chars().count(), HISTORY_PREVIEW_CHARS + TRUNCATION_MARKER.len());
        assert!(cut.starts_with(&"é".repeat(50)));
    }

    #[test]
    fn line_prefixes_speaker_label() {
        let message = ChatMessage::new(
            MessageId::new(3),
            Role::Assistant,
            "Under the at-will employment doctrine, an employer can terminate",
            Local::now(),
        );
        let entry = HistoryEntry::from_message(&message);

        assert_eq!(
            entry.line(),
            "Lawwise: Under the at-will employment doctrine, an employer..."
        );
    }
}
