//! # rr-01-derivation
//!
//! Codec and location derivation for the risk registry.
//!
//! ## Role in System
//!
//! - **Codec**: fixed-width identifiers, hex addresses, UUID ↔ u128 seeds
//! - **Deriver**: collision-resistant, deterministic entity locations
//!
//! Both are pure functions. Occupancy of a derived location is the entity
//! store's concern (see `rr-02-registry`).
//!
//! ```text
//! (network name) ──derive("network")──→ network location
//!                                          │
//!         ┌──────────────┬─────────────────┼──────────────┐
//!         ↓              ↓                 ↓              ↓
//!     reporter         case            address          asset
//!                                          │              │
//!                                          └──────┬───────┘
//!                                                 ↓
//!                                           confirmation
//! ```

pub mod codec;
pub mod deriver;
pub mod errors;
pub mod location;

pub use codec::*;
pub use deriver::{tags, Derivation, Deriver};
pub use errors::DerivationError;
pub use location::{FullSpace, Location, LocationSpace};
