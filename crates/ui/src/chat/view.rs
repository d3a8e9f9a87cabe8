use std::sync::Arc;

use gpui::*;
use gpui_component::{
    ActiveTheme, Sizable,
    button::{Button, ButtonVariants},
    h_flex, v_flex,
};
use gpui_tokio_bridge::Tokio;
use lawwise_chat::{
    ChatResult, ChatSession, Persona, ReplyHandle, ReplyProvider, ReplyStream, ReplyTicket,
    ReplyWorker, ResponseSimulator, SendOutcome, SimulatedReply,
};

use crate::chat::events::{ChatTab, DraftChanged, Submit};
use crate::chat::{MessageInput, MessageList, history};

/// One chat surface: owns its conversation, input and pending reply.
///
/// Dropping the view drops the reply tasks, which cancels the simulator worker;
/// a reply that still races in lands on a dead weak handle and is ignored.
pub struct ChatView {
    persona: Persona,
    session: ChatSession,
    reply_provider: Arc<dyn ReplyProvider>,
    active_tab: ChatTab,
    message_list: Entity<MessageList>,
    message_input: Entity<MessageInput>,
    reply_worker_task: Option<Task<Result<(), gpui_tokio_bridge::JoinError>>>,
    reply_reader_task: Option<Task<()>>,
}

impl ChatView {
    pub fn new(persona: Persona, window: &mut Window, cx: &mut Context<Self>) -> Self {
        Self::with_reply_provider(persona, Arc::new(ResponseSimulator::default()), window, cx)
    }

    pub fn with_reply_provider(
        persona: Persona,
        reply_provider: Arc<dyn ReplyProvider>,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) -> Self {
        let message_list = cx.new(MessageList::new);
        let message_input = cx.new(|cx| MessageInput::new(persona.placeholder(), window, cx));

        cx.subscribe_in(
            &message_input,
            window,
            |this, _, event: &Submit, window, cx| {
                this.handle_submit(event.clone(), window, cx);
            },
        )
        .detach();

        cx.subscribe(&message_input, |this, _, event: &DraftChanged, _cx| {
            this.session.set_draft(event.content.clone());
        })
        .detach();

        tracing::info!(
            persona = %persona,
            reply_provider = reply_provider.id(),
            "chat surface mounted"
        );

        Self {
            persona,
            session: ChatSession::new(),
            reply_provider,
            active_tab: ChatTab::default(),
            message_list,
            message_input,
            reply_worker_task: None,
            reply_reader_task: None,
        }
    }

    pub fn focus_input(&self, window: &mut Window, cx: &mut Context<Self>) {
        self.message_input
            .update(cx, |input, cx| input.focus(window, cx));
    }

    pub fn select_tab(&mut self, tab: ChatTab, cx: &mut Context<Self>) {
        if self.active_tab == tab {
            return;
        }
        self.active_tab = tab;
        cx.notify();
    }

    fn handle_submit(&mut self, event: Submit, window: &mut Window, cx: &mut Context<Self>) {
        self.session.set_draft(event.content);

        match self.session.submit_draft() {
            SendOutcome::Sent { ticket, .. } => {
                self.message_input.update(cx, |input, cx| {
                    input.clear(window, cx);
                    input.set_awaiting_reply(true, cx);
                });
                self.sync_messages(cx);
                self.schedule_reply(ticket, cx);
            }
            SendOutcome::Empty => {}
            SendOutcome::Busy { pending } => {
                tracing::debug!(?pending, "send ignored while a reply is pending");
            }
        }
    }

    fn schedule_reply(&mut self, ticket: ReplyTicket, cx: &mut Context<Self>) {
        match self.reply_provider.simulate(ticket) {
            Ok(ReplyHandle { stream, worker }) => {
                tracing::debug!(
                    ?ticket,
                    provider = self.reply_provider.id(),
                    delay = ?self.reply_provider.delay(),
                    "awaiting simulated reply"
                );
                self.spawn_reply_worker(worker, cx);
                self.spawn_reply_reader(stream, cx);
            }
            Err(error) => {
                tracing::error!(?ticket, error = %error, "failed to schedule reply");
                self.session.abandon_reply();
                self.finish_reply(cx);
            }
        }
    }

    fn spawn_reply_worker(&mut self, worker: ReplyWorker, cx: &mut Context<Self>) {
        self.reply_worker_task = Some(Tokio::spawn(cx, worker));
    }

    fn spawn_reply_reader(&mut self, mut stream: ReplyStream, cx: &mut Context<Self>) {
        self.reply_reader_task = Some(cx.spawn(async move |this, cx| {
            let result = stream.recv().await;
            let _ = this.update(cx, |this, cx| {
                this.handle_reply(result, cx);
            });
        }));
    }

    fn handle_reply(&mut self, result: ChatResult<SimulatedReply>, cx: &mut Context<Self>) {
        match result {
            Ok(reply) => {
                let ticket = reply.ticket;
                match self.session.deliver_reply(reply) {
                    Ok(message_id) => {
                        tracing::debug!(?ticket, message_id = message_id.0, "reply appended");
                    }
                    Err(error) => {
                        tracing::debug!(?ticket, error = %error, "discarded stale reply");
                        return;
                    }
                }
            }
            Err(error) => {
                tracing::warn!(error = %error, "reply stream ended without a reply");
                self.session.abandon_reply();
            }
        }

        self.finish_reply(cx);
    }

    fn finish_reply(&mut self, cx: &mut Context<Self>) {
        self.reply_worker_task = None;
        self.reply_reader_task = None;

        let awaiting_reply = self.session.is_composing();
        self.message_input.update(cx, |input, cx| {
            input.set_awaiting_reply(awaiting_reply, cx);
        });
        self.sync_messages(cx);
        cx.notify();
    }

    fn sync_messages(&mut self, cx: &mut Context<Self>) {
        let messages = self.session.messages().to_vec();
        let composing = self.session.is_composing();

        self.message_list.update(cx, |list, cx| {
            list.set_messages(messages, composing, cx);
        });
    }

    fn render_tab_bar(&self, cx: &mut Context<Self>) -> impl IntoElement {
        let tab_bar_bg = cx.theme().muted;
        let active_tab = self.active_tab;

        h_flex()
            .id("chat-tabs")
            .w_full()
            .gap_1()
            .p_1()
            .rounded_lg()
            .bg(tab_bar_bg)
            .children(ChatTab::ALL.into_iter().map(|tab| {
                let button = Button::new(tab.element_id()).small().child(tab.label());
                let button = if tab == active_tab {
                    button.primary()
                } else {
                    button.ghost()
                };

                button.on_click(cx.listener(move |this, _, _window, cx| {
                    this.select_tab(tab, cx);
                }))
            }))
    }
}

impl Drop for ChatView {
    fn drop(&mut self) {
        if let Some(ticket) = self.session.abandon_reply() {
            tracing::debug!(?ticket, persona = %self.persona, "pending reply dropped with surface");
        }
    }
}

impl Render for ChatView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let border = cx.theme().border;
        let background = cx.theme().background;
        let body = match self.active_tab {
            ChatTab::Transcript => v_flex()
                .id("chat-transcript-tab")
                .flex_1()
                .min_h_0()
                .child(
                    div()
                        .id("chat-view-message-list")
                        .flex_1()
                        .min_h_0()
                        .child(self.message_list.clone()),
                )
                .child(
                    div()
                        .id("chat-view-message-input")
                        .flex_shrink_0()
                        .w_full()
                        .child(self.message_input.clone()),
                )
                .into_any_element(),
            ChatTab::History => history::render(self.session.history(), cx),
        };

        v_flex()
            .id("chat-view")
            .size_full()
            .min_h_0()
            .overflow_hidden()
            .rounded_lg()
            .border_1()
            .border_color(border)
            .bg(background)
            .child(div().p_2().child(self.render_tab_bar(cx)))
            .child(body)
    }
}
