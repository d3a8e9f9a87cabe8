use gpui::*;
use gpui_component::{
    ActiveTheme, IconName, Sizable,
    button::{Button, ButtonVariants},
    h_flex,
    input::{Input, InputEvent, InputState},
};

use crate::chat::events::{DraftChanged, Submit};

/// Single-line prompt box with a send control.
pub struct MessageInput {
    input_state: Entity<InputState>,
    awaiting_reply: bool,
}

impl EventEmitter<Submit> for MessageInput {}
impl EventEmitter<DraftChanged> for MessageInput {}

impl MessageInput {
    pub fn new(placeholder: String, window: &mut Window, cx: &mut Context<Self>) -> Self {
        let input_state = cx.new(|cx| InputState::new(window, cx).placeholder(placeholder));

        cx.subscribe_in(
            &input_state,
            window,
            |this, state, event: &InputEvent, _window, cx| match event {
                InputEvent::PressEnter { .. } => this.handle_submit(cx),
                InputEvent::Change { .. } => {
                    let content = state.read(cx).value().to_string();
                    cx.emit(DraftChanged { content });
                }
                _ => {}
            },
        )
        .detach();

        Self {
            input_state,
            awaiting_reply: false,
        }
    }

    pub fn set_awaiting_reply(&mut self, awaiting_reply: bool, cx: &mut Context<Self>) {
        self.awaiting_reply = awaiting_reply;
        cx.notify();
    }

    pub fn clear(&mut self, window: &mut Window, cx: &mut Context<Self>) {
        self.input_state.update(cx, |state, cx| {
            state.set_value("", window, cx);
        });
    }

    pub fn focus(&self, window: &mut Window, cx: &mut Context<Self>) {
        self.input_state.update(cx, |state, cx| {
            state.focus(window, cx);
        });
    }

    fn handle_submit(&mut self, cx: &mut Context<Self>) {
        if self.awaiting_reply {
            return;
        }

        // Blank input is dropped silently; the surface decides everything else.
        let content = self.input_state.read(cx).value().to_string();
        if content.trim().is_empty() {
            return;
        }

        cx.emit(Submit::new(content));
    }
}

impl Render for MessageInput {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let theme = cx.theme();
        let awaiting_reply = self.awaiting_reply;

        h_flex()
            .id("message-input")
            .w_full()
            .gap_2()
            .p_4()
            .border_t_1()
            .border_color(theme.border)
            .bg(theme.background)
            .child(
                div().flex_1().min_w_0().child(
                    Input::new(&self.input_state)
                        .w_full()
                        .disabled(awaiting_reply),
                ),
            )
            .child(
                Button::new("send")
                    .small()
                    .primary()
                    .icon(IconName::ArrowUp)
                    .child(if awaiting_reply { "Waiting..." } else { "Send" })
                    .disabled(awaiting_reply)
                    .on_click(cx.listener(|this, _, _window, cx| {
                        this.handle_submit(cx);
                    })),
            )
    }
}
