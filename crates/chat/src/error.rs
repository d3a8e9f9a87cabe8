use snafu::Snafu;

use crate::message::Role;
use crate::session::{ComposeRejection, ReplyTicket};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ChatError {
    #[snafu(display("refusing to append an empty {role:?} message on `{stage}`"))]
    EmptyUserMessage { stage: &'static str, role: Role },
    #[snafu(display("reply {ticket:?} was rejected on `{stage}`: {reason:?}"))]
    StaleReply {
        stage: &'static str,
        ticket: ReplyTicket,
        reason: ComposeRejection,
    },
    #[snafu(display("reply channel for {ticket:?} closed before delivery on `{stage}`"))]
    ReplyChannelClosed {
        stage: &'static str,
        ticket: ReplyTicket,
    },
}

pub type ChatResult<T> = Result<T, ChatError>;
