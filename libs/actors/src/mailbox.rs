//! Actor Mailbox
//!
//! Unbounded FIFO of envelopes: any number of producers, exactly one
//! consumer (the owning actor's execution loop).

use crate::messages::{Envelope, Message};
use tokio::sync::mpsc;

/// Producer side of an actor mailbox
#[derive(Debug)]
pub struct Mailbox<M: Message> {
    sender: mpsc::UnboundedSender<Envelope<M>>,
}

impl<M: Message> Clone for Mailbox<M> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

/// Consumer side of an actor mailbox
#[derive(Debug)]
pub struct MailboxReceiver<M: Message> {
    receiver: mpsc::UnboundedReceiver<Envelope<M>>,
}

/// Outcome of an enqueue attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Appended to the tail of the mailbox
    Enqueued,
    /// The consumer is gone; the envelope is dropped
    Stranded,
}

impl<M: Message> Mailbox<M> {
    pub fn new() -> (Self, MailboxReceiver<M>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, MailboxReceiver { receiver })
    }

    /// Append an envelope without blocking
    pub fn enqueue(&self, envelope: Envelope<M>) -> Delivery {
        match self.sender.send(envelope) {
            Ok(()) => Delivery::Enqueued,
            Err(_) => Delivery::Stranded,
        }
    }
}

impl<M: Message> MailboxReceiver<M> {
    /// Wait for the next envelope; `None` once every producer is dropped
    pub async fn recv(&mut self) -> Option<Envelope<M>> {
        self.receiver.recv().await
    }

    /// Refuse further envelopes; later enqueues are stranded
    pub(crate) fn close(&mut self) {
        self.receiver.close();
    }
}
