//! Echo/Proxy Actors
//!
//! A `Proxy` spawns a `Printer` child from its spawn hook. Echo requests
//! sent to the proxy are forwarded to the printer as plain text; the
//! printer logs each message and replies to whoever sent it; the proxy
//! logs the reply.

pub mod config;

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use switchboard_actors::{Actor, ActorError, Address, Context, Payload, Result};
use tokio::sync::Notify;
use tracing::info;

pub use config::{DemoSettings, EchoProxyConfig};

/// Messages exchanged by the echo actors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EchoMessage {
    /// Ask the proxy to pass `text` on to its printer
    Echo(String),
    /// Plain text for the printer
    Text(String),
    /// Printer acknowledgement
    Response(String),
}

impl EchoMessage {
    pub fn text(&self) -> &str {
        match self {
            EchoMessage::Echo(text) | EchoMessage::Text(text) | EchoMessage::Response(text) => text,
        }
    }
}

/// One handled message, as seen by the receiving actor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptEntry {
    pub actor: Address,
    pub message: EchoMessage,
    pub sender: Address,
}

/// Shared, append-only record of user messages handled by echo actors
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Arc<Mutex<Vec<TranscriptEntry>>>,
    notify: Arc<Notify>,
}

impl Transcript {
    pub fn record(&self, actor: &Address, message: &EchoMessage, sender: &Address) {
        self.entries.lock().push(TranscriptEntry {
            actor: actor.clone(),
            message: message.clone(),
            sender: sender.clone(),
        });
        self.notify.notify_waiters();
    }

    pub fn entries(&self) -> Vec<TranscriptEntry> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Wait until at least `count` entries exist; false on timeout
    pub async fn wait_for(&self, count: usize, within: Duration) -> bool {
        tokio::time::timeout(within, async {
            loop {
                let notified = self.notify.notified();
                if self.len() >= count {
                    return;
                }
                notified.await;
            }
        })
        .await
        .is_ok()
    }
}

/// Logs every message and answers its sender
#[derive(Debug, Default)]
pub struct Printer {
    transcript: Transcript,
}

impl Printer {
    pub fn new(transcript: Transcript) -> Self {
        Self { transcript }
    }
}

#[async_trait]
impl Actor for Printer {
    type Message = EchoMessage;

    async fn handle(
        &mut self,
        ctx: &Context<EchoMessage>,
        payload: Payload<EchoMessage>,
        sender: Address,
    ) -> Result<()> {
        // Shutdown needs no reply
        let Payload::Message(message) = payload else {
            return Ok(());
        };

        info!(msg = message.text(), sender = %sender, "Printer received message");
        self.transcript.record(ctx.address(), &message, &sender);

        let reply = EchoMessage::Response(format!("Got your message! '{}'", message.text()));
        ctx.send(&sender, reply)
    }
}

/// Forwards echo requests to a printer it owns
#[derive(Debug, Default)]
pub struct Proxy {
    printer: Option<Address>,
    transcript: Transcript,
}

impl Proxy {
    pub fn new(transcript: Transcript) -> Self {
        Self {
            printer: None,
            transcript,
        }
    }

    pub fn printer(&self) -> Option<&Address> {
        self.printer.as_ref()
    }
}

#[async_trait]
impl Actor for Proxy {
    type Message = EchoMessage;

    async fn on_spawn(&mut self, ctx: &Context<EchoMessage>) -> Result<()> {
        let printer = ctx.spawn(Printer::new(self.transcript.clone()), None).await?;
        info!(proxy = %ctx.address(), printer = %printer, "Proxy spawned printer");
        self.printer = Some(printer);
        Ok(())
    }

    async fn handle(
        &mut self,
        ctx: &Context<EchoMessage>,
        payload: Payload<EchoMessage>,
        sender: Address,
    ) -> Result<()> {
        let Payload::Message(message) = payload else {
            return Ok(());
        };
        self.transcript.record(ctx.address(), &message, &sender);

        match message {
            EchoMessage::Echo(text) => {
                let printer = self
                    .printer
                    .as_ref()
                    .ok_or_else(|| ActorError::handler(ctx.address(), "no printer spawned"))?;
                ctx.send(printer, EchoMessage::Text(text))
            }
            EchoMessage::Response(text) => {
                info!(response = %text, from = %sender, "Proxy received response");
                Ok(())
            }
            EchoMessage::Text(_) => Ok(()),
        }
    }
}
