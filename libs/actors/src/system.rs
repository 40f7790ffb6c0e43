//! Actor System Core
//!
//! The directory that spawns actors, routes envelopes into their mailboxes
//! and broadcasts shutdown. Every actor runs its own execution loop as a
//! tokio task; the loop waits on the mailbox, hands each envelope to the
//! actor's handler in FIFO order, and exits for good after handling the
//! shutdown marker.
//!
//! # Shared state
//!
//! `ActorSystem` is a cheap handle. All clones, including the one inside
//! every actor's [`Context`], share one registry and one set of per-class
//! counters. The registry mutex is never held across an `.await`: counter
//! increment, name reservation and insertion each happen inside a single
//! synchronous critical section. A reserved name stays claimed while the
//! spawn hook runs, so no other spawn can take it in the meantime.
//!
//! # Handler failures
//!
//! By default a failing handler (an `Err` or a panic) ends that actor's
//! loop without notifying anyone; its address stays registered and inert.
//! [`Supervision::LogAndStop`] catches both, logs them and stops the actor
//! cleanly. Nothing is ever restarted.

use crate::address::Address;
use crate::config::{RuntimeConfig, Supervision};
use crate::error::{ActorError, Result};
use crate::mailbox::{Delivery, Mailbox, MailboxReceiver};
use crate::messages::{Envelope, Message, Payload};
use crate::metrics::SystemMetrics;
use crate::registry::{ActorEntry, ActorRegistry};

use async_trait::async_trait;
use futures::FutureExt;
use parking_lot::Mutex;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tracing::{debug, error, info, trace, warn};

/// Behavior of a concrete actor
#[async_trait]
pub trait Actor: Send + 'static {
    type Message: Message;

    /// Class name used for default addresses (`<ClassName>.<N>`)
    fn class_name() -> String
    where
        Self: Sized,
    {
        short_type_name::<Self>()
    }

    /// Called once after construction, before the execution loop starts.
    /// May spawn children through `ctx`. An error aborts the spawn.
    async fn on_spawn(&mut self, _ctx: &Context<Self::Message>) -> Result<()> {
        Ok(())
    }

    /// Handle one dequeued envelope, including the shutdown marker
    async fn handle(
        &mut self,
        ctx: &Context<Self::Message>,
        payload: Payload<Self::Message>,
        sender: Address,
    ) -> Result<()>;
}

/// Unqualified type name: module path and generic arguments stripped
pub fn short_type_name<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

/// Actor lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorStatus {
    Running,
    /// Handled the shutdown marker
    Stopped,
    /// Handler failed; the loop is gone
    Failed,
}

impl ActorStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, ActorStatus::Running)
    }
}

/// Shared status flag; leaves `Running` exactly once and wakes every waiter
#[derive(Debug, Clone)]
pub(crate) struct StatusCell(Arc<watch::Sender<ActorStatus>>);

impl StatusCell {
    pub fn new() -> Self {
        let (status, _) = watch::channel(ActorStatus::Running);
        Self(Arc::new(status))
    }

    pub fn load(&self) -> ActorStatus {
        *self.0.borrow()
    }

    /// Move from `Running` to `to`; false if already terminal.
    ///
    /// `on_settle` runs before any waiter observes the new status.
    pub fn settle(&self, to: ActorStatus, on_settle: impl FnOnce()) -> bool {
        self.0.send_if_modified(|current| {
            if current.is_terminal() {
                return false;
            }
            *current = to;
            on_settle();
            true
        })
    }

    /// Wait until the status is terminal
    pub async fn terminal(&self) -> ActorStatus {
        let mut updates = self.0.subscribe();
        let status = match updates.wait_for(|status| status.is_terminal()).await {
            Ok(status) => *status,
            Err(_) => self.load(),
        };
        status
    }
}

/// Per-actor view of the system, handed to hooks and handlers
pub struct Context<M: Message> {
    address: Address,
    system: ActorSystem<M>,
}

impl<M: Message> Clone for Context<M> {
    fn clone(&self) -> Self {
        Self {
            address: self.address.clone(),
            system: self.system.clone(),
        }
    }
}

impl<M: Message> Context<M> {
    /// This actor's own address
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Route a message with this actor as sender
    pub fn send(&self, target: &Address, msg: M) -> Result<()> {
        self.system
            .route(target, Payload::Message(msg), Some(self.address.clone()))
    }

    /// Route the shutdown marker with this actor as sender
    pub fn send_shutdown(&self, target: &Address) -> Result<()> {
        self.system
            .route(target, Payload::Shutdown, Some(self.address.clone()))
    }

    /// Spawn another actor into the same system
    pub async fn spawn<A>(&self, actor: A, name: Option<&str>) -> Result<Address>
    where
        A: Actor<Message = M>,
    {
        self.system.spawn(actor, name).await
    }
}

struct SystemInner<M: Message> {
    address: Address,
    config: RuntimeConfig,
    registry: Mutex<ActorRegistry<M>>,
    metrics: Arc<SystemMetrics>,
}

/// Actor directory: spawning, routing and shutdown broadcast
pub struct ActorSystem<M: Message> {
    inner: Arc<SystemInner<M>>,
}

impl<M: Message> Clone for ActorSystem<M> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<M: Message> Default for ActorSystem<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Message> std::fmt::Debug for ActorSystem<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActorSystem")
            .field("address", &self.inner.address)
            .field("actors", &self.len())
            .field("supervision", &self.inner.config.supervision)
            .finish()
    }
}

impl<M: Message> ActorSystem<M> {
    /// Create a system with the default configuration
    pub fn new() -> Self {
        Self::build(RuntimeConfig::default())
    }

    /// Create a system from a validated configuration
    pub fn with_config(config: RuntimeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: RuntimeConfig) -> Self {
        let address = Address::new(&config.directory_name);
        info!(
            directory = %address,
            supervision = ?config.supervision,
            "Creating new actor system"
        );

        Self {
            inner: Arc::new(SystemInner {
                address,
                config,
                registry: Mutex::new(ActorRegistry::new()),
                metrics: Arc::new(SystemMetrics::default()),
            }),
        }
    }

    /// The directory's own reserved address
    pub fn address(&self) -> &Address {
        &self.inner.address
    }

    pub fn metrics(&self) -> Arc<SystemMetrics> {
        Arc::clone(&self.inner.metrics)
    }

    /// Spawn an actor under `name`, or under `<ClassName>.<N>` when absent.
    ///
    /// Runs the spawn hook, starts the execution loop and registers the
    /// actor. Returns once the actor is registered, not once it handled
    /// anything. Unnamed spawns consume a counter slot even if the hook
    /// fails; named spawns never touch the counter.
    ///
    /// The name is claimed before the hook runs: a name that is registered
    /// or claimed by another in-flight spawn fails with `DuplicateAddress`
    /// without running the hook. A failed or abandoned spawn releases it.
    pub async fn spawn<A>(&self, mut actor: A, name: Option<&str>) -> Result<Address>
    where
        A: Actor<Message = M>,
    {
        let start_time = Instant::now();
        let address = self.reserve_address(&A::class_name(), name)?;
        let _reservation = Reservation {
            registry: &self.inner.registry,
            address: address.clone(),
        };

        debug!(
            actor = %address,
            actor_type = std::any::type_name::<A>(),
            "Spawning actor"
        );

        let ctx = Context {
            address: address.clone(),
            system: self.clone(),
        };

        if let Err(e) = actor.on_spawn(&ctx).await {
            warn!(
                actor = %address,
                error = %e,
                "Spawn hook failed, actor not started"
            );
            return Err(ActorError::construction(&address, e));
        }

        self.launch(actor, ctx)?;

        debug!(
            actor = %address,
            spawn_duration_us = start_time.elapsed().as_micros(),
            "Actor spawned"
        );
        Ok(address)
    }

    /// Spawn a default-constructed actor
    pub async fn spawn_default<A>(&self, name: Option<&str>) -> Result<Address>
    where
        A: Actor<Message = M> + Default,
    {
        self.spawn(A::default(), name).await
    }

    /// Pick the actor's name and claim it. A generated name that collides
    /// with an explicit one still consumes its counter slot.
    fn reserve_address(&self, class_name: &str, name: Option<&str>) -> Result<Address> {
        let mut registry = self.inner.registry.lock();
        let address = match name {
            Some(name) => Address::new(name),
            None => registry.next_address(class_name),
        };
        registry.reserve(&address)?;
        Ok(address)
    }

    /// Start the execution loop and register it, atomically w.r.t. other spawns
    fn launch<A>(&self, actor: A, ctx: Context<M>) -> Result<()>
    where
        A: Actor<Message = M>,
    {
        let (mailbox, receiver) = Mailbox::new();
        let status = StatusCell::new();
        let address = ctx.address.clone();

        let mut registry = self.inner.registry.lock();
        if registry.contains(&address) {
            return Err(ActorError::duplicate(&address));
        }

        let task = ActorTask {
            actor,
            ctx,
            receiver,
            supervision: self.inner.config.supervision,
            status: status.clone(),
            metrics: Arc::clone(&self.inner.metrics),
        };
        tokio::spawn(task.run());

        registry.insert(address, ActorEntry { mailbox, status })?;
        self.inner.metrics.record_spawned();
        Ok(())
    }

    /// Enqueue `payload` for `target`, fire-and-forget.
    ///
    /// Fails with `AddressNotFound` if `target` was never registered. A
    /// registered actor whose loop already exited accepts the envelope and
    /// drops it.
    pub fn route(
        &self,
        target: &Address,
        payload: Payload<M>,
        sender: Option<Address>,
    ) -> Result<()> {
        let mailbox = self.inner.registry.lock().mailbox(target);
        let mailbox = mailbox.ok_or_else(|| {
            debug!(target = %target, "Route to unknown address");
            ActorError::address_not_found(target)
        })?;

        let sender = sender.unwrap_or_else(|| self.inner.address.clone());
        trace!(
            target = %target,
            sender = %sender,
            shutdown = payload.is_shutdown(),
            "Routing envelope"
        );

        self.inner.metrics.record_routed();
        if mailbox.enqueue(Envelope::new(sender, payload)) == Delivery::Stranded {
            self.inner.metrics.record_stranded();
            trace!(target = %target, "Envelope stranded, actor loop has exited");
        }
        Ok(())
    }

    /// Route a user message from the directory's own address
    pub fn tell(&self, target: &Address, msg: M) -> Result<()> {
        self.route(target, Payload::Message(msg), None)
    }

    /// Route the shutdown marker to every actor registered right now.
    ///
    /// Does not wait for any actor to stop. Returns how many actors the
    /// marker was routed to.
    pub fn broadcast_shutdown(&self) -> usize {
        let addresses = self.list_actors();
        info!(
            directory = %self.inner.address,
            actor_count = addresses.len(),
            "Broadcasting shutdown"
        );
        self.inner.metrics.record_broadcast();

        let mut routed = 0;
        for address in &addresses {
            match self.route(address, Payload::Shutdown, None) {
                Ok(()) => routed += 1,
                Err(e) => warn!(actor = %address, error = %e, "Failed to route shutdown"),
            }
        }
        routed
    }

    /// Wait until `address`'s execution loop has ended.
    ///
    /// Any number of callers may wait at once; each gets the terminal
    /// status. An actor that already ended reports right away.
    pub async fn join(&self, address: &Address) -> Result<ActorStatus> {
        let status = self.inner.registry.lock().status_cell(address);
        let status = status.ok_or_else(|| ActorError::address_not_found(address))?;
        Ok(status.terminal().await)
    }

    pub fn status(&self, address: &Address) -> Option<ActorStatus> {
        self.inner.registry.lock().status(address)
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.inner.registry.lock().contains(address)
    }

    /// Snapshot of registered addresses
    pub fn list_actors(&self) -> Vec<Address> {
        self.inner.registry.lock().addresses()
    }

    pub fn len(&self) -> usize {
        self.inner.registry.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.registry.lock().is_empty()
    }
}

/// Holds a claimed name until the spawn registers the actor or gives up
struct Reservation<'a, M: Message> {
    registry: &'a Mutex<ActorRegistry<M>>,
    address: Address,
}

impl<M: Message> Drop for Reservation<'_, M> {
    fn drop(&mut self) {
        self.registry.lock().release(&self.address);
    }
}

/// Settles the actor's status when its loop ends, including by panic
struct ExitGuard {
    address: Address,
    status: StatusCell,
    metrics: Arc<SystemMetrics>,
}

impl ExitGuard {
    fn settle(&self, to: ActorStatus) {
        self.status.settle(to, || match to {
            ActorStatus::Stopped => self.metrics.record_stopped(),
            ActorStatus::Failed => self.metrics.record_failed(),
            ActorStatus::Running => {}
        });
    }
}

impl Drop for ExitGuard {
    fn drop(&mut self) {
        if self.status.load() == ActorStatus::Running {
            debug!(actor = %self.address, "Actor loop unwound");
        }
        self.settle(ActorStatus::Failed);
    }
}

/// Why a handler invocation did not succeed
enum HandlerFailure {
    Error(ActorError),
    Panic(String),
}

/// Execution loop of one actor
struct ActorTask<A: Actor> {
    actor: A,
    ctx: Context<A::Message>,
    receiver: MailboxReceiver<A::Message>,
    supervision: Supervision,
    status: StatusCell,
    metrics: Arc<SystemMetrics>,
}

impl<A: Actor> ActorTask<A> {
    async fn run(mut self) {
        let guard = ExitGuard {
            address: self.ctx.address.clone(),
            status: self.status.clone(),
            metrics: Arc::clone(&self.metrics),
        };
        debug!(actor = %self.ctx.address, "Entering message loop");

        let outcome = loop {
            let Some(envelope) = self.receiver.recv().await else {
                break ActorStatus::Stopped;
            };
            let (payload, sender) = envelope.into_parts();
            let shutdown = payload.is_shutdown();

            match self.dispatch(payload, sender).await {
                Ok(()) => self.metrics.record_handled(),
                Err(failure) => {
                    self.report(failure);
                    break ActorStatus::Failed;
                }
            }

            if shutdown {
                debug!(actor = %self.ctx.address, "Actor stopped after shutdown marker");
                break ActorStatus::Stopped;
            }
        };

        // Closed before settling: anything routed once `join` returns is stranded
        self.receiver.close();
        guard.settle(outcome);
    }

    async fn dispatch(
        &mut self,
        payload: Payload<A::Message>,
        sender: Address,
    ) -> std::result::Result<(), HandlerFailure> {
        match self.supervision {
            Supervision::Unsupervised => self
                .actor
                .handle(&self.ctx, payload, sender)
                .await
                .map_err(HandlerFailure::Error),
            Supervision::LogAndStop => {
                let handled = AssertUnwindSafe(self.actor.handle(&self.ctx, payload, sender))
                    .catch_unwind()
                    .await;
                match handled {
                    Ok(result) => result.map_err(HandlerFailure::Error),
                    Err(panic) => Err(HandlerFailure::Panic(panic_message(&*panic))),
                }
            }
        }
    }

    fn report(&self, failure: HandlerFailure) {
        let address = &self.ctx.address;
        match (self.supervision, failure) {
            (Supervision::Unsupervised, HandlerFailure::Error(e)) => {
                debug!(actor = %address, error = %e, "Handler failed, actor loop terminated");
            }
            (Supervision::Unsupervised, HandlerFailure::Panic(message)) => {
                debug!(
                    actor = %address,
                    panic = %message,
                    "Handler panicked, actor loop terminated"
                );
            }
            (Supervision::LogAndStop, HandlerFailure::Error(e)) => {
                error!(
                    actor = %address,
                    error = %e,
                    error_category = e.category(),
                    "Handler failed, stopping actor"
                );
            }
            (Supervision::LogAndStop, HandlerFailure::Panic(message)) => {
                let e = ActorError::handler(address, format!("panicked: {}", message));
                error!(
                    actor = %address,
                    error = %e,
                    error_category = e.category(),
                    "Handler panicked, stopping actor"
                );
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::sync::mpsc;

    /// Forwards every payload it handles to the test
    struct Recorder {
        seen: mpsc::UnboundedSender<(Payload<u32>, Address)>,
    }

    #[async_trait]
    impl Actor for Recorder {
        type Message = u32;

        async fn handle(
            &mut self,
            _ctx: &Context<u32>,
            payload: Payload<u32>,
            sender: Address,
        ) -> Result<()> {
            let _ = self.seen.send((payload, sender));
            Ok(())
        }
    }

    fn recorder() -> (Recorder, mpsc::UnboundedReceiver<(Payload<u32>, Address)>) {
        let (seen, rx) = mpsc::unbounded_channel();
        (Recorder { seen }, rx)
    }

    mod generic {
        pub struct Wrapper<T>(pub T);
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name::<Recorder>(), "Recorder");
        assert_eq!(short_type_name::<generic::Wrapper<Vec<u8>>>(), "Wrapper");
        assert_eq!(Recorder::class_name(), "Recorder");
    }

    #[test]
    fn test_status_settles_once() {
        let cell = StatusCell::new();
        assert_eq!(cell.load(), ActorStatus::Running);
        assert!(!cell.load().is_terminal());

        let mut settled = 0;
        assert!(cell.settle(ActorStatus::Stopped, || settled += 1));
        assert!(!cell.settle(ActorStatus::Failed, || settled += 1));
        assert_eq!(cell.load(), ActorStatus::Stopped);
        assert_eq!(settled, 1);
    }

    #[tokio::test]
    async fn test_status_wakes_every_waiter() {
        let cell = StatusCell::new();
        let waiters: Vec<_> = (0..3)
            .map(|_| {
                let cell = cell.clone();
                tokio::spawn(async move { cell.terminal().await })
            })
            .collect();

        tokio::time::sleep(Duration::from_millis(10)).await;
        cell.settle(ActorStatus::Failed, || {});

        for waiter in waiters {
            assert_eq!(waiter.await.unwrap(), ActorStatus::Failed);
        }
        // Already terminal: returns at once
        assert_eq!(cell.terminal().await, ActorStatus::Failed);
    }

    #[test]
    fn test_panic_message() {
        let boxed: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(&*boxed), "boom");
        let boxed: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(&*boxed), "bang");
        let boxed: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(&*boxed), "non-string panic payload");
    }

    #[tokio::test]
    async fn test_actor_system_creation() {
        let system = ActorSystem::<u32>::new();
        assert!(system.is_empty());
        assert_eq!(system.address().name(), "/ActorSys");
    }

    #[tokio::test]
    async fn test_tell_uses_directory_as_sender() {
        let system = ActorSystem::new();
        let (actor, mut seen) = recorder();
        let address = system.spawn(actor, None).await.unwrap();

        assert_eq!(address.name(), "Recorder.1");
        system.tell(&address, 5).unwrap();

        let (payload, sender) = seen.recv().await.unwrap();
        assert_eq!(payload, Payload::Message(5));
        assert_eq!(&sender, system.address());
    }

    #[tokio::test]
    async fn test_shutdown_marker_is_handled_then_stops() {
        let system = ActorSystem::new();
        let (actor, mut seen) = recorder();
        let address = system.spawn(actor, Some("recorder")).await.unwrap();

        system.route(&address, Payload::Shutdown, None).unwrap();
        assert_eq!(system.join(&address).await.unwrap(), ActorStatus::Stopped);

        let (payload, _) = seen.recv().await.unwrap();
        assert!(payload.is_shutdown());

        // Still registered: accepted and stranded
        system.tell(&address, 1).unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(seen.try_recv().is_err());
        assert_eq!(system.metrics().snapshot().messages_stranded, 1);
    }

    #[tokio::test]
    async fn test_join_unknown_address() {
        let system = ActorSystem::<u32>::new();
        let err = system.join(&Address::new("ghost")).await.unwrap_err();
        assert_eq!(err.category(), "address_not_found");
    }

    #[tokio::test]
    async fn test_with_config_rejects_invalid() {
        let config = RuntimeConfig {
            directory_name: String::new(),
            ..RuntimeConfig::default()
        };
        assert!(ActorSystem::<u32>::with_config(config).is_err());
    }
}
