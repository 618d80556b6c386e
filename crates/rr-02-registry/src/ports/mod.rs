//! # Ports Layer (Middle Hexagon)
//!
//! - **Driving Ports (Inbound)**: `RegistryApi`, `RegistryQueries`
//! - **Driven Ports (Outbound)**: `StorageSubstrate`, `FundsTransfer`,
//!   `TimeSource`, `EventSink`

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
