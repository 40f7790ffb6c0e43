//! Actor Messages
//!
//! Payloads are a closed set: a user message, or the shutdown marker that
//! ends an actor's execution loop once handled.

use crate::address::Address;

/// Marker trait for user message types carried by an actor system
pub trait Message: Send + 'static {}

impl<T: Send + 'static> Message for T {}

/// Mailbox payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload<M> {
    /// Application message
    Message(M),
    /// Reserved shutdown marker
    Shutdown,
}

impl<M> Payload<M> {
    /// Check if this is the shutdown marker
    pub fn is_shutdown(&self) -> bool {
        matches!(self, Payload::Shutdown)
    }

    /// Borrow the user message, if any
    pub fn message(&self) -> Option<&M> {
        match self {
            Payload::Message(msg) => Some(msg),
            Payload::Shutdown => None,
        }
    }

    /// Take the user message, if any
    pub fn into_message(self) -> Option<M> {
        match self {
            Payload::Message(msg) => Some(msg),
            Payload::Shutdown => None,
        }
    }
}

impl<M> From<M> for Payload<M> {
    fn from(msg: M) -> Self {
        Payload::Message(msg)
    }
}

/// Unit of mailbox transport: sender plus payload
#[derive(Debug, Clone)]
pub struct Envelope<M> {
    sender: Address,
    payload: Payload<M>,
}

impl<M> Envelope<M> {
    pub fn new(sender: Address, payload: Payload<M>) -> Self {
        Self { sender, payload }
    }

    pub fn sender(&self) -> &Address {
        &self.sender
    }

    pub fn payload(&self) -> &Payload<M> {
        &self.payload
    }

    /// Split into (payload, sender) in handler argument order
    pub fn into_parts(self) -> (Payload<M>, Address) {
        (self.payload, self.sender)
    }
}
