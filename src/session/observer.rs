//! Listeners for messages appended to a session

use tokio::sync::mpsc;

use crate::types::Message;

/// Notified once for every message appended to a session's history, in
/// append order.
pub trait MessageObserver: Send + Sync {
    fn message_added(&self, message: &Message);
}

impl<F> MessageObserver for F
where
    F: Fn(&Message) + Send + Sync,
{
    fn message_added(&self, message: &Message) {
        self(message)
    }
}

/// Forwards appended messages into an unbounded channel.
///
/// Appends never block on the receiver; once the receiver is dropped further
/// messages are discarded.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<Message>,
}

impl ChannelObserver {
    /// Create an observer and the receiving end of its stream
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl MessageObserver for ChannelObserver {
    fn message_added(&self, message: &Message) {
        let _ = self.tx.send(message.clone());
    }
}
