use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};

use crate::catalog::{RESPONSE_CATALOG, ResponseCatalog};
use crate::error::{ChatResult, ReplyChannelClosedSnafu};
use crate::session::ReplyTicket;

/// Delay between a send and its simulated reply.
pub const REPLY_DELAY: Duration = Duration::from_millis(1500);
pub const SIMULATOR_PROVIDER_ID: &str = "canned";

pub type ReplyWorker = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Assistant reply produced by the simulator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatedReply {
    pub ticket: ReplyTicket,
    pub content: String,
}

/// Receiving end of one scheduled reply.
///
/// Dropping the stream cancels the worker, so a torn-down surface never
/// receives a late append.
pub struct ReplyStream {
    ticket: ReplyTicket,
    replies: mpsc::UnboundedReceiver<SimulatedReply>,
    cancel_tx: Option<oneshot::Sender<()>>,
}

pub struct ReplyHandle {
    pub stream: ReplyStream,
    pub worker: ReplyWorker,
}

impl ReplyStream {
    pub(crate) fn new(
        ticket: ReplyTicket,
        replies: mpsc::UnboundedReceiver<SimulatedReply>,
        cancel_tx: oneshot::Sender<()>,
    ) -> Self {
        Self {
            ticket,
            replies,
            cancel_tx: Some(cancel_tx),
        }
    }

    pub fn ticket(&self) -> ReplyTicket {
        self.ticket
    }

    /// Waits for the reply. Fails if the worker ended without producing one.
    pub async fn recv(&mut self) -> ChatResult<SimulatedReply> {
        match self.replies.recv().await {
            Some(reply) => Ok(reply),
            None => ReplyChannelClosedSnafu {
                stage: "reply-stream-recv",
                ticket: self.ticket,
            }
            .fail(),
        }
    }

    pub fn try_recv(&mut self) -> Option<SimulatedReply> {
        self.replies.try_recv().ok()
    }

    pub fn cancel(&mut self) -> bool {
        self.cancel_tx
            .take()
            .map(|tx| tx.send(()).is_ok())
            .unwrap_or(false)
    }
}

impl Drop for ReplyStream {
    fn drop(&mut self) {
        if let Some(cancel_tx) = self.cancel_tx.take() {
            let _ = cancel_tx.send(());
        }
    }
}

/// Source of assistant replies for a chat surface.
pub trait ReplyProvider: Send + Sync {
    fn id(&self) -> &str;
    fn delay(&self) -> Duration;
    fn simulate(&self, ticket: ReplyTicket) -> ChatResult<ReplyHandle>;
}

/// Content-blind responder: waits a fixed delay, then answers with a random
/// catalog entry regardless of what was asked.
#[derive(Debug, Clone, Copy)]
pub struct ResponseSimulator {
    delay: Duration,
    catalog: &'static ResponseCatalog,
}

impl Default for ResponseSimulator {
    fn default() -> Self {
        Self::new(REPLY_DELAY)
    }
}

impl ResponseSimulator {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            catalog: &RESPONSE_CATALOG,
        }
    }

    pub fn catalog(&self) -> &'static ResponseCatalog {
        self.catalog
    }

    async fn run_reply_worker(
        delay: Duration,
        catalog: &'static ResponseCatalog,
        ticket: ReplyTicket,
        reply_tx: mpsc::UnboundedSender<SimulatedReply>,
        mut cancel_rx: oneshot::Receiver<()>,
    ) {
        tokio::select! {
            _ = &mut cancel_rx => {
                tracing::debug!(?ticket, "simulated reply cancelled");
            }
            _ = tokio::time::sleep(delay) => {
                let content = catalog.pick(&mut rand::thread_rng()).to_string();
                if reply_tx.send(SimulatedReply { ticket, content }).is_err() {
                    tracing::debug!(?ticket, "reply receiver dropped before delivery");
                }
            }
        }
    }
}

impl ReplyProvider for ResponseSimulator {
    fn id(&self) -> &str {
        SIMULATOR_PROVIDER_ID
    }

    fn delay(&self) -> Duration {
        self.delay
    }

    fn simulate(&self, ticket: ReplyTicket) -> ChatResult<ReplyHandle> {
        let (reply_tx, reply_rx) = mpsc::unbounded_channel();
        let (cancel_tx, cancel_rx) = oneshot::channel();
        let stream = ReplyStream::new(ticket, reply_rx, cancel_tx);
        let worker: ReplyWorker = Box::pin(Self::run_reply_worker(
            self.delay,
            self.catalog,
            ticket,
            reply_tx,
            cancel_rx,
        ));

        tracing::debug!(?ticket, delay = ?self.delay, "reply scheduled");
        Ok(ReplyHandle { stream, worker })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Role;
    use crate::session::{ChatSession, SendOutcome};

    #[tokio::test(start_paused = true)]
    async fn reply_arrives_after_the_fixed_delay() {
        let simulator = ResponseSimulator::default();
        let ReplyHandle { mut stream, worker } = simulator.simulate(ReplyTicket::new(1)).unwrap();
        let started = tokio::time::Instant::now();
        tokio::spawn(worker);

        let reply = stream.recv().await.unwrap();

        assert!(started.elapsed() >= REPLY_DELAY);
        assert_eq!(reply.ticket, ReplyTicket::new(1));
        assert!(RESPONSE_CATALOG.contains(&reply.content));
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_is_delivered_before_the_delay() {
        let simulator = ResponseSimulator::default();
        let ReplyHandle { mut stream, worker } = simulator.simulate(ReplyTicket::new(1)).unwrap();
        tokio::spawn(worker);

        tokio::time::sleep(REPLY_DELAY - Duration::from_millis(1)).await;
        assert!(stream.try_recv().is_none());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(stream.try_recv().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_stream_never_delivers() {
        let simulator = ResponseSimulator::default();
        let ReplyHandle { mut stream, worker } = simulator.simulate(ReplyTicket::new(4)).unwrap();
        let worker = tokio::spawn(worker);

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(stream.cancel());
        worker.await.unwrap();

        assert!(stream.recv().await.is_err());
        assert!(!stream.cancel());
    }

    #[tokio::test(start_paused = true)]
    async fn composing_flag_spans_send_to_reply() {
        let simulator = ResponseSimulator::default();
        let mut session = ChatSession::new();
        assert!(!session.is_composing());

        let SendOutcome::Sent { ticket, .. } = session.send("What is fair use?") else {
            panic!("send should be accepted");
        };
        let ReplyHandle { mut stream, worker } = simulator.simulate(ticket).unwrap();
        tokio::spawn(worker);

        tokio::time::sleep(Duration::from_millis(1_000)).await;
        assert!(session.is_composing());
        assert_eq!(session.messages().len(), 1);

        let reply = stream.recv().await.unwrap();
        assert!(session.is_composing());
        session.deliver_reply(reply).unwrap();

        assert!(!session.is_composing());
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[1].role, Role::Assistant);
        assert!(RESPONSE_CATALOG.contains(&session.messages()[1].content));
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_midway_stops_the_worker_and_appends_nothing() {
        let simulator = ResponseSimulator::default();
        let mut session = ChatSession::new();
        let SendOutcome::Sent { ticket, .. } = session.send("What is fair use?") else {
            panic!("send should be accepted");
        };
        let ReplyHandle { stream, worker } = simulator.simulate(ticket).unwrap();
        assert_eq!(stream.ticket(), ticket);
        let started = tokio::time::Instant::now();
        let worker = tokio::spawn(worker);

        tokio::time::sleep(Duration::from_millis(500)).await;
        drop(stream);

        // The worker must exit on the cancel signal, long before its timer.
        let finished = tokio::time::timeout(Duration::from_millis(1), worker).await;
        assert!(matches!(finished, Ok(Ok(()))));
        assert!(started.elapsed() < simulator.delay());

        assert_eq!(session.abandon_reply(), Some(ticket));
        tokio::time::sleep(REPLY_DELAY).await;

        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].role, Role::User);
        assert!(!session.is_composing());
    }

    #[tokio::test(start_paused = true)]
    async fn uncancelled_worker_runs_to_its_deadline() {
        let simulator = ResponseSimulator::new(Duration::from_millis(200));
        let ReplyHandle { mut stream, worker } = simulator.simulate(ReplyTicket::new(9)).unwrap();
        let worker = tokio::spawn(worker);

        let pending = tokio::time::timeout(Duration::from_millis(100), stream.recv()).await;
        assert!(pending.is_err());

        let reply = stream.recv().await.unwrap();
        worker.await.unwrap();
        assert_eq!(reply.ticket, ReplyTicket::new(9));
        assert!(simulator.catalog().contains(&reply.content));
    }
}
