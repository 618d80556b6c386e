//! Domain layer: entities, value objects, authorization and stake rules.
//!
//! Everything here is synchronous and free of I/O.

pub mod entities;
pub mod ledger;
pub mod policy;
pub mod value_objects;

pub use entities::*;
pub use ledger::{RewardKind, RewardOutcome};
pub use policy::{Action, Actor};
pub use value_objects::*;
