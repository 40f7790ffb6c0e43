//! Actor Runtime Error Types
//!
//! Errors surfaced synchronously by spawning, routing and configuration.
//! Handler failures never propagate out of an actor's execution context;
//! `HandlerFailure` exists so handlers and supervision share one vocabulary.

use crate::address::Address;
use thiserror::Error;

/// Main actor runtime error type
#[derive(Error, Debug)]
pub enum ActorError {
    /// Route or send targeting an address absent from the directory
    #[error("Address not found: {address}")]
    AddressNotFound { address: Address },

    /// The spawn-time hook failed; the actor was never registered
    #[error("Construction failed for {address}: {source}")]
    ConstructionFailure {
        address: Address,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A message handler failed
    #[error("Handler failed in {address}: {message}")]
    HandlerFailure { address: Address, message: String },

    /// Explicit name already registered in the directory
    #[error("Address already registered: {address}")]
    DuplicateAddress { address: Address },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        message: String,
        field: Option<String>,
    },
}

/// Result type alias for actor runtime operations
pub type Result<T> = std::result::Result<T, ActorError>;

impl ActorError {
    /// Create an address-not-found error
    pub fn address_not_found(address: &Address) -> Self {
        Self::AddressNotFound {
            address: address.clone(),
        }
    }

    /// Wrap a hook failure as a construction failure
    pub fn construction(
        address: &Address,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ConstructionFailure {
            address: address.clone(),
            source: Box::new(source),
        }
    }

    /// Create a handler failure
    pub fn handler(address: &Address, message: impl Into<String>) -> Self {
        Self::HandlerFailure {
            address: address.clone(),
            message: message.into(),
        }
    }

    /// Create a duplicate-address error
    pub fn duplicate(address: &Address) -> Self {
        Self::DuplicateAddress {
            address: address.clone(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: &str, field: Option<&str>) -> Self {
        Self::Configuration {
            message: message.to_string(),
            field: field.map(|f| f.to_string()),
        }
    }

    /// Error category for structured logging
    pub fn category(&self) -> &'static str {
        match self {
            Self::AddressNotFound { .. } => "address_not_found",
            Self::ConstructionFailure { .. } => "construction_failure",
            Self::HandlerFailure { .. } => "handler_failure",
            Self::DuplicateAddress { .. } => "duplicate_address",
            Self::Configuration { .. } => "configuration",
        }
    }

    /// Address the error refers to, if any
    pub fn address(&self) -> Option<&Address> {
        match self {
            Self::AddressNotFound { address }
            | Self::ConstructionFailure { address, .. }
            | Self::HandlerFailure { address, .. }
            | Self::DuplicateAddress { address } => Some(address),
            Self::Configuration { .. } => None,
        }
    }
}
