use std::path::{Path, PathBuf};

use gpui::prelude::FluentBuilder as _;
use gpui::*;
use gpui_component::{ActiveTheme, h_flex, v_flex};
use lawwise_chat::{ASSISTANT_NAME, Avatar, ChatMessage, Role};

use crate::chat::scroll_manager::ScrollManager;

const AVATAR_SIZE: Pixels = px(32.);
const BUBBLE_PADDING: Pixels = px(12.);
/// Bubbles take at most this share of the transcript width.
const BUBBLE_MAX_WIDTH_RATIO: f32 = 0.7;

/// Returns the directory avatar images are loaded from.
pub fn default_assets_path() -> PathBuf {
    PathBuf::from("./assets")
}

/// Scrollable transcript of message bubbles.
pub struct MessageList {
    messages: Vec<ChatMessage>,
    composing: bool,
    scroll_manager: ScrollManager,
    assets_path: PathBuf,
}

impl MessageList {
    pub fn new(_cx: &mut Context<Self>) -> Self {
        Self {
            messages: Vec::new(),
            composing: false,
            scroll_manager: ScrollManager::new(),
            assets_path: default_assets_path(),
        }
    }

    pub fn set_messages(&mut self, messages: Vec<ChatMessage>, composing: bool, cx: &mut Context<Self>) {
        self.scroll_manager.observe_len(messages.len());
        if composing && !self.composing {
            // The typing row is appended below the tail as well.
            self.scroll_manager.request_scroll_to_bottom();
        }

        self.messages = messages;
        self.composing = composing;
        cx.notify();
    }

    fn avatar_source(&self, avatar: Avatar) -> PathBuf {
        self.assets_path.join(Path::new(avatar.asset))
    }

    fn render_avatar(&self, avatar: Avatar, cx: &Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let fallback_text = avatar.fallback;
        let fallback_bg = theme.muted;
        let fallback_fg = theme.muted_foreground;

        div()
            .size(AVATAR_SIZE)
            .flex_shrink_0()
            .rounded_full()
            .overflow_hidden()
            .child(
                img(self.avatar_source(avatar))
                    .size_full()
                    .with_fallback(move || {
                        div()
                            .size_full()
                            .flex()
                            .items_center()
                            .justify_center()
                            .bg(fallback_bg)
                            .text_xs()
                            .font_weight(FontWeight::MEDIUM)
                            .text_color(fallback_fg)
                            .child(fallback_text)
                            .into_any_element()
                    }),
            )
    }

    fn render_message_row(&self, message: &ChatMessage, window: &Window, cx: &Context<Self>) -> AnyElement {
        let theme = cx.theme();
        let is_user = message.role == Role::User;
        let (bubble_bg, bubble_fg) = if is_user {
            (theme.primary, theme.primary_foreground)
        } else {
            (theme.secondary, theme.secondary_foreground)
        };
        let max_width = window.viewport_size().width * BUBBLE_MAX_WIDTH_RATIO;

        let bubble = v_flex()
            .max_w(max_width)
            .p(BUBBLE_PADDING)
            .gap_1()
            .rounded_lg()
            .bg(bubble_bg)
            .text_color(bubble_fg)
            .child(div().text_sm().child(message.content.clone()))
            .child(
                div()
                    .text_xs()
                    .opacity(0.5)
                    .child(message.display_time()),
            );

        h_flex()
            .id(ElementId::Name(SharedString::from(format!(
                "transcript-row-{}",
                message.id.0
            ))))
            .w_full()
            .when(is_user, |row| row.justify_end())
            .when(!is_user, |row| row.justify_start())
            .child(
                h_flex()
                    .items_start()
                    .gap_2()
                    .when(!is_user, |row| row.child(self.render_avatar(message.role.avatar(), cx)))
                    .child(bubble)
                    .when(is_user, |row| row.child(self.render_avatar(message.role.avatar(), cx))),
            )
            .into_any_element()
    }

    fn render_typing_indicator(&self, cx: &Context<Self>) -> impl IntoElement {
        let theme = cx.theme();

        h_flex().id("transcript-typing").w_full().justify_start().child(
            div()
                .p(BUBBLE_PADDING)
                .rounded_lg()
                .bg(theme.secondary)
                .text_color(theme.secondary_foreground)
                .text_sm()
                .child(format!("{ASSISTANT_NAME} is typing...")),
        )
    }
}

impl Render for MessageList {
    fn render(&mut self, window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        if self.scroll_manager.apply_pending_scroll() {
            // The new tail is measured during this frame; pin again on the next one.
            window.request_animation_frame();
        }

        let rows = self
            .messages
            .iter()
            .map(|message| self.render_message_row(message, window, cx))
            .collect::<Vec<_>>();

        v_flex().size_full().min_h_0().child(
            v_flex()
                .id("transcript")
                .size_full()
                .min_h_0()
                .p_4()
                .gap_4()
                .overflow_y_scroll()
                .track_scroll(self.scroll_manager.handle())
                .children(rows)
                .when(self.composing, |list| list.child(self.render_typing_indicator(cx))),
        )
    }
}
