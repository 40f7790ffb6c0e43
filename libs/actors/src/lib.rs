//! Switchboard Actor Runtime
//!
//! Minimal actor runtime: independent actors that communicate only by
//! asynchronous messages routed through a shared directory of addresses.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │              ActorSystem (directory)          │
//! │  registry: Address -> mailbox, status         │
//! │  counters: ClassName -> N                     │
//! └──────┬──────────────────────────┬─────────────┘
//!        │ route(Envelope)          │ route(Envelope)
//!  ┌─────▼──────┐            ┌──────▼─────┐
//!  │  Proxy.1   │── send ──▶ │ Printer.1  │
//!  │  mailbox   │◀── send ── │  mailbox   │
//!  │  loop task │            │  loop task │
//!  └────────────┘            └────────────┘
//! ```
//!
//! # Guarantees
//!
//! - **FIFO**: one total order per mailbox across all senders
//! - **Shutdown is a message**: handled like any other, then the loop exits
//! - **Unbounded mailboxes**: `tell` never blocks
//!
//! # Examples
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use switchboard_actors::{Actor, ActorSystem, Address, Context, Payload, Result};
//!
//! struct Greeter;
//!
//! #[async_trait]
//! impl Actor for Greeter {
//!     type Message = String;
//!
//!     async fn handle(
//!         &mut self,
//!         _ctx: &Context<String>,
//!         payload: Payload<String>,
//!         sender: Address,
//!     ) -> Result<()> {
//!         if let Payload::Message(name) = payload {
//!             println!("Hello, {} (from {})", name, sender);
//!         }
//!         Ok(())
//!     }
//! }
//!
//! # async fn run() -> Result<()> {
//! let system = ActorSystem::new();
//! let greeter = system.spawn(Greeter, None).await?;
//! system.tell(&greeter, "world".to_string())?;
//! system.broadcast_shutdown();
//! # Ok(())
//! # }
//! ```

pub mod address;
pub mod config;
pub mod error;
pub mod mailbox;
pub mod messages;
pub mod metrics;
mod registry;
pub mod system;

pub use address::Address;
pub use config::{RuntimeConfig, Supervision, DEFAULT_DIRECTORY_NAME};
pub use error::{ActorError, Result};
pub use mailbox::{Delivery, Mailbox, MailboxReceiver};
pub use messages::{Envelope, Message, Payload};
pub use metrics::{SystemMetrics, SystemStats};
pub use system::{short_type_name, Actor, ActorStatus, ActorSystem, Context};
