//! # Adapters Layer (Outer Hexagon)
//!
//! In-memory implementations of the outbound ports, used by tests and by
//! single-process deployments.

pub mod event_bus;
pub mod memory_ledger;
pub mod memory_substrate;

pub use event_bus::{InMemoryEventBus, DEFAULT_CHANNEL_CAPACITY};
pub use memory_ledger::InMemoryLedger;
pub use memory_substrate::InMemorySubstrate;
