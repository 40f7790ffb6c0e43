//! Actor Registry
//!
//! Address-to-actor table plus the per-class counters used for default
//! names. Entries are append-only: a stopped actor stays registered.
//! Callers hold the owning system's mutex for every operation here.

use crate::address::Address;
use crate::error::{ActorError, Result};
use crate::mailbox::Mailbox;
use crate::messages::Message;
use crate::system::{ActorStatus, StatusCell};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Registered actor: producer side of its mailbox plus its status
#[derive(Debug)]
pub(crate) struct ActorEntry<M: Message> {
    pub mailbox: Mailbox<M>,
    pub status: StatusCell,
}

/// Directory state shared by every handle of one actor system
#[derive(Debug)]
pub(crate) struct ActorRegistry<M: Message> {
    actors: HashMap<Address, ActorEntry<M>>,
    /// Names claimed by spawns whose hook has not finished yet
    pending: HashSet<Address>,
    class_counters: HashMap<String, u64>,
}

impl<M: Message> ActorRegistry<M> {
    pub fn new() -> Self {
        Self {
            actors: HashMap::new(),
            pending: HashSet::new(),
            class_counters: HashMap::new(),
        }
    }

    /// Consume the next sequence number of `class_name`, starting at 1
    pub fn next_address(&mut self, class_name: &str) -> Address {
        let counter = self.class_counters.entry(class_name.to_string()).or_insert(0);
        *counter += 1;
        Address::sequenced(class_name, *counter)
    }

    /// Claim `address` for an in-flight spawn.
    ///
    /// Fails if it is registered or already claimed. The claim ends with
    /// `insert` or `release`.
    pub fn reserve(&mut self, address: &Address) -> Result<()> {
        if self.actors.contains_key(address) || self.pending.contains(address) {
            return Err(ActorError::duplicate(address));
        }
        self.pending.insert(address.clone());
        Ok(())
    }

    /// Drop an unfinished claim; no effect once the actor is registered
    pub fn release(&mut self, address: &Address) {
        if self.pending.remove(address) {
            debug!(actor = %address, "Released address reservation");
        }
    }

    pub fn insert(&mut self, address: Address, entry: ActorEntry<M>) -> Result<()> {
        if self.actors.contains_key(&address) {
            return Err(ActorError::duplicate(&address));
        }
        self.pending.remove(&address);
        debug!(actor = %address, "Registering actor");
        self.actors.insert(address, entry);
        Ok(())
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.actors.contains_key(address)
    }

    pub fn mailbox(&self, address: &Address) -> Option<Mailbox<M>> {
        self.actors.get(address).map(|entry| entry.mailbox.clone())
    }

    pub fn status(&self, address: &Address) -> Option<ActorStatus> {
        self.actors.get(address).map(|entry| entry.status.load())
    }

    pub fn status_cell(&self, address: &Address) -> Option<StatusCell> {
        self.actors.get(address).map(|entry| entry.status.clone())
    }

    /// Snapshot of registered addresses, sorted by name
    pub fn addresses(&self) -> Vec<Address> {
        let mut addresses: Vec<Address> = self.actors.keys().cloned().collect();
        addresses.sort();
        addresses
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> ActorEntry<String> {
        let (mailbox, _receiver) = Mailbox::new();
        ActorEntry {
            mailbox,
            status: StatusCell::new(),
        }
    }

    #[test]
    fn test_counters_are_per_class() {
        let mut registry = ActorRegistry::<String>::new();

        assert_eq!(registry.next_address("Printer").name(), "Printer.1");
        assert_eq!(registry.next_address("Printer").name(), "Printer.2");
        assert_eq!(registry.next_address("Proxy").name(), "Proxy.1");
    }

    #[test]
    fn test_insert_rejects_duplicates() {
        let mut registry = ActorRegistry::<String>::new();
        let address = Address::new("logger");

        registry.insert(address.clone(), entry()).unwrap();
        let err = registry.insert(address.clone(), entry()).unwrap_err();

        assert_eq!(err.category(), "duplicate_address");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.status(&address), Some(ActorStatus::Running));
    }

    #[test]
    fn test_reservation_blocks_second_claim() {
        let mut registry = ActorRegistry::<String>::new();
        let address = Address::new("logger");

        registry.reserve(&address).unwrap();
        assert_eq!(registry.reserve(&address).unwrap_err().category(), "duplicate_address");
        // Claimed names are not routable yet
        assert!(!registry.contains(&address));
        assert!(registry.mailbox(&address).is_none());

        registry.release(&address);
        registry.reserve(&address).unwrap();
        registry.insert(address.clone(), entry()).unwrap();

        // Registered names cannot be claimed, and release leaves them alone
        assert!(registry.reserve(&address).is_err());
        registry.release(&address);
        assert!(registry.contains(&address));
    }

    #[test]
    fn test_addresses_snapshot() {
        let mut registry = ActorRegistry::<String>::new();
        assert!(registry.is_empty());

        for name in ["b", "a", "c"] {
            registry.insert(Address::new(name), entry()).unwrap();
        }

        let names: Vec<_> = registry
            .addresses()
            .iter()
            .map(|a| a.name().to_string())
            .collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert!(registry.mailbox(&Address::new("a")).is_some());
        assert!(registry.mailbox(&Address::new("z")).is_none());
    }

    #[test]
    fn test_status_cell_is_shared() {
        let mut registry = ActorRegistry::<String>::new();
        let address = Address::new("a");
        registry.insert(address.clone(), entry()).unwrap();

        let cell = registry.status_cell(&address).unwrap();
        assert!(cell.settle(ActorStatus::Stopped, || {}));
        assert_eq!(registry.status(&address), Some(ActorStatus::Stopped));
        assert!(registry.status_cell(&Address::new("missing")).is_none());
    }
}
