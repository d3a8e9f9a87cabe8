use gpui::*;
use gpui_component::{ActiveTheme, h_flex, v_flex};
use lawwise_chat::HistoryEntry;

use super::ChatView;

/// Compact one-line-per-message view of the current conversation.
pub(super) fn render(entries: Vec<HistoryEntry>, cx: &mut Context<ChatView>) -> AnyElement {
    let theme = cx.theme();

    let rows = entries.into_iter().map(|entry| {
        h_flex()
            .id(ElementId::Name(SharedString::from(format!(
                "history-row-{}",
                entry.id.0
            ))))
            .gap_1()
            .text_sm()
            .text_color(theme.foreground)
            .child(
                div()
                    .font_weight(FontWeight::MEDIUM)
                    .child(format!("{}:", entry.speaker_label())),
            )
            .child(div().min_w_0().child(entry.preview))
    });

    v_flex()
        .id("chat-history")
        .size_full()
        .min_h_0()
        .p_4()
        .gap_2()
        .overflow_y_scroll()
        .child(
            div()
                .text_lg()
                .font_weight(FontWeight::SEMIBOLD)
                .text_color(theme.foreground)
                .mb_2()
                .child("Chat History"),
        )
        .children(rows)
        .into_any_element()
}
