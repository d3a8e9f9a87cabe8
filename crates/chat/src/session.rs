use chrono::{DateTime, Local};

use crate::error::{ChatResult, StaleReplySnafu};
use crate::history::HistoryEntry;
use crate::message::{ChatMessage, MessageId, Role};
use crate::simulator::SimulatedReply;
use crate::store::MessageStore;

/// Identifier for one scheduled reply.
///
/// Every accepted send gets a fresh ticket so a late reply can be told apart
/// from the one the session is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReplyTicket(pub u64);

impl ReplyTicket {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// Composing state of one chat surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ComposeState {
    #[default]
    Idle,
    AwaitingReply(ReplyTicket),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeTransition {
    Start(ReplyTicket),
    Deliver(ReplyTicket),
    Abandon(ReplyTicket),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeRejection {
    AlreadyAwaiting {
        active: ReplyTicket,
        attempted: ReplyTicket,
    },
    NothingPending,
    TicketMismatch {
        active: ReplyTicket,
        attempted: ReplyTicket,
    },
}

pub type ComposeTransitionResult = Result<ComposeState, ComposeRejection>;

impl ComposeState {
    pub fn pending_ticket(self) -> Option<ReplyTicket> {
        match self {
            Self::AwaitingReply(ticket) => Some(ticket),
            Self::Idle => None,
        }
    }

    pub fn is_composing(self) -> bool {
        matches!(self, Self::AwaitingReply(_))
    }

    /// Applies one transition. Terminal transitions must name the pending ticket.
    pub fn apply(self, transition: ComposeTransition) -> ComposeTransitionResult {
        match (self, transition) {
            (Self::Idle, ComposeTransition::Start(ticket)) => Ok(Self::AwaitingReply(ticket)),
            (Self::AwaitingReply(active), ComposeTransition::Start(attempted)) => {
                Err(ComposeRejection::AlreadyAwaiting { active, attempted })
            }
            (
                Self::AwaitingReply(active),
                ComposeTransition::Deliver(attempted) | ComposeTransition::Abandon(attempted),
            ) => {
                if active == attempted {
                    Ok(Self::Idle)
                } else {
                    Err(ComposeRejection::TicketMismatch { active, attempted })
                }
            }
            (Self::Idle, ComposeTransition::Deliver(_) | ComposeTransition::Abandon(_)) => {
                Err(ComposeRejection::NothingPending)
            }
        }
    }
}

/// Result of one send attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// User message appended; a reply for `ticket` should now be scheduled.
    Sent {
        message_id: MessageId,
        ticket: ReplyTicket,
    },
    /// Input was empty or whitespace only.
    Empty,
    /// A reply is still pending; input stays disabled until it lands.
    Busy { pending: ReplyTicket },
}

/// Transient state owned by one chat surface: transcript, draft input and
/// composing flag. Nothing here outlives the surface.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    store: MessageStore,
    draft: String,
    state: ComposeState,
    next_ticket: u64,
}

impl ChatSession {
    pub fn new() -> Self {
        Self {
            store: MessageStore::new(),
            draft: String::new(),
            state: ComposeState::Idle,
            next_ticket: 1,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.store.messages()
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.store.history()
    }

    pub fn state(&self) -> ComposeState {
        self.state
    }

    pub fn is_composing(&self) -> bool {
        self.state.is_composing()
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Sends the current draft and clears it when the send is accepted.
    pub fn submit_draft(&mut self) -> SendOutcome {
        let text = std::mem::take(&mut self.draft);
        let outcome = self.send_at(&text, Local::now());
        if !matches!(outcome, SendOutcome::Sent { .. }) {
            self.draft = text;
        }
        outcome
    }

    pub fn send(&mut self, text: &str) -> SendOutcome {
        self.send_at(text, Local::now())
    }

    /// Appends `text` as a user message and moves into the awaiting state.
    ///
    /// The stored content is the text as typed; trimming only decides emptiness.
    pub fn send_at(&mut self, text: &str, timestamp: DateTime<Local>) -> SendOutcome {
        if text.trim().is_empty() {
            return SendOutcome::Empty;
        }

        if let ComposeState::AwaitingReply(pending) = self.state {
            return SendOutcome::Busy { pending };
        }

        let ticket = ReplyTicket::new(self.next_ticket.max(1));
        let Ok(next_state) = self.state.apply(ComposeTransition::Start(ticket)) else {
            return SendOutcome::Busy { pending: ticket };
        };

        let message_id = match self.store.append(Role::User, text, timestamp) {
            Ok(message_id) => message_id,
            Err(error) => {
                tracing::warn!(error = %error, "user message rejected by store");
                return SendOutcome::Empty;
            }
        };

        self.next_ticket = ticket.0.saturating_add(1);
        self.state = next_state;
        tracing::debug!(?ticket, message_id = message_id.0, "user message appended");

        SendOutcome::Sent { message_id, ticket }
    }

    pub fn deliver_reply(&mut self, reply: SimulatedReply) -> ChatResult<MessageId> {
        self.deliver_reply_at(reply, Local::now())
    }

    /// Appends the assistant reply if it answers the pending ticket.
    pub fn deliver_reply_at(
        &mut self,
        reply: SimulatedReply,
        timestamp: DateTime<Local>,
    ) -> ChatResult<MessageId> {
        let next_state = self
            .state
            .apply(ComposeTransition::Deliver(reply.ticket))
            .map_err(|reason| {
                StaleReplySnafu {
                    stage: "deliver-reply",
                    ticket: reply.ticket,
                    reason,
                }
                .build()
            })?;

        let message_id = self
            .store
            .append(Role::Assistant, reply.content, timestamp)?;
        self.state = next_state;
        Ok(message_id)
    }

    /// Drops the pending reply, if any. Used on teardown.
    pub fn abandon_reply(&mut self) -> Option<ReplyTicket> {
        let ticket = self.state.pending_ticket()?;
        match self.state.apply(ComposeTransition::Abandon(ticket)) {
            Ok(next_state) => {
                self.state = next_state;
                Some(ticket)
            }
            Err(_) => None,
        }
    }
}
