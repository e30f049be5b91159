//! Rolling message history owned by a single worker task

use std::collections::VecDeque;
use tokio::sync::{mpsc, oneshot};

use crate::application::errors::HistoryError;
use crate::domain::entities::Message;

/// Default number of messages kept
pub const DEFAULT_CAPACITY: usize = 100;

const QUEUE_DEPTH: usize = 256;

/// Requests processed by the history worker, in arrival order.
enum HistoryRequest {
    Append(Box<Message>),
    Last {
        channel: String,
        reply: oneshot::Sender<Option<Message>>,
    },
    Recent {
        channel: String,
        limit: usize,
        reply: oneshot::Sender<Vec<Message>>,
    },
    Len {
        reply: oneshot::Sender<usize>,
    },
}

/// Handle to the history worker
///
/// Cloning the handle is cheap; all clones talk to the same worker, which is
/// the only code that touches the underlying buffer.
#[derive(Clone)]
pub struct MessageHistory {
    tx: mpsc::Sender<HistoryRequest>,
}

impl MessageHistory {
    /// Start the worker on the current tokio runtime
    pub fn spawn(capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(QUEUE_DEPTH);
        let log = HistoryLog::new(capacity);
        tokio::spawn(run(log, rx));
        Self { tx }
    }

    pub async fn append(&self, msg: Message) -> Result<(), HistoryError> {
        self.tx
            .send(HistoryRequest::Append(Box::new(msg)))
            .await
            .map_err(|_| HistoryError::Closed)
    }

    /// Most recent message seen in `channel` (case-insensitive)
    pub async fn last_message(&self, channel: &str) -> Result<Option<Message>, HistoryError> {
        let (reply, rx) = oneshot::channel();
        self.request(HistoryRequest::Last { channel: channel.to_string(), reply }, rx)
            .await
    }

    /// Up to `limit` messages from `channel`, newest first
    pub async fn recent(&self, channel: &str, limit: usize) -> Result<Vec<Message>, HistoryError> {
        let (reply, rx) = oneshot::channel();
        self.request(
            HistoryRequest::Recent { channel: channel.to_string(), limit, reply },
            rx,
        )
        .await
    }

    pub async fn len(&self) -> Result<usize, HistoryError> {
        let (reply, rx) = oneshot::channel();
        self.request(HistoryRequest::Len { reply }, rx).await
    }

    async fn request<T>(
        &self,
        req: HistoryRequest,
        rx: oneshot::Receiver<T>,
    ) -> Result<T, HistoryError> {
        self.tx.send(req).await.map_err(|_| HistoryError::Closed)?;
        rx.await.map_err(|_| HistoryError::Closed)
    }
}

async fn run(mut log: HistoryLog, mut rx: mpsc::Receiver<HistoryRequest>) {
    tracing::debug!("History worker started (capacity {})", log.capacity);

    while let Some(req) = rx.recv().await {
        match req {
            HistoryRequest::Append(msg) => log.push(*msg),
            HistoryRequest::Last { channel, reply } => {
                let _ = reply.send(log.last_in(&channel).cloned());
            }
            HistoryRequest::Recent { channel, limit, reply } => {
                let _ = reply.send(log.recent_in(&channel, limit));
            }
            HistoryRequest::Len { reply } => {
                let _ = reply.send(log.entries.len());
            }
        }
    }

    tracing::debug!("History worker stopped");
}

/// The bounded buffer itself; only ever owned by the worker.
struct HistoryLog {
    entries: VecDeque<Message>,
    capacity: usize,
}

impl HistoryLog {
    fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    fn push(&mut self, msg: Message) {
        self.entries.push_back(msg);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    fn in_channel<'a>(&'a self, channel: &str) -> impl Iterator<Item = &'a Message> + 'a {
        let channel = channel.to_lowercase();
        self.entries
            .iter()
            .rev()
            .filter(move |m| m.channel.to_lowercase() == channel)
    }

    fn last_in(&self, channel: &str) -> Option<&Message> {
        self.in_channel(channel).next()
    }

    fn recent_in(&self, channel: &str, limit: usize) -> Vec<Message> {
        self.in_channel(channel).take(limit).cloned().collect()
    }
}
