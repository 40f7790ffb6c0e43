//! System Metrics
//!
//! Relaxed atomic counters shared by every handle of one actor system.

use std::sync::atomic::{AtomicU64, Ordering};

/// System-wide counters
#[derive(Debug, Default)]
pub struct SystemMetrics {
    pub actors_spawned: AtomicU64,
    pub actors_stopped: AtomicU64,
    pub actors_failed: AtomicU64,
    pub messages_routed: AtomicU64,
    pub messages_handled: AtomicU64,
    /// Routed to a registered actor whose loop had already exited
    pub messages_stranded: AtomicU64,
    pub shutdown_broadcasts: AtomicU64,
}

/// Point-in-time copy of [`SystemMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemStats {
    pub actors_spawned: u64,
    pub actors_stopped: u64,
    pub actors_failed: u64,
    pub messages_routed: u64,
    pub messages_handled: u64,
    pub messages_stranded: u64,
    pub shutdown_broadcasts: u64,
}

impl SystemMetrics {
    pub fn record_spawned(&self) {
        self.actors_spawned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stopped(&self) {
        self.actors_stopped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.actors_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_routed(&self) {
        self.messages_routed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_handled(&self) {
        self.messages_handled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stranded(&self) {
        self.messages_stranded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_broadcast(&self) {
        self.shutdown_broadcasts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> SystemStats {
        SystemStats {
            actors_spawned: self.actors_spawned.load(Ordering::Relaxed),
            actors_stopped: self.actors_stopped.load(Ordering::Relaxed),
            actors_failed: self.actors_failed.load(Ordering::Relaxed),
            messages_routed: self.messages_routed.load(Ordering::Relaxed),
            messages_handled: self.messages_handled.load(Ordering::Relaxed),
            messages_stranded: self.messages_stranded.load(Ordering::Relaxed),
            shutdown_broadcasts: self.shutdown_broadcasts.load(Ordering::Relaxed),
        }
    }
}
