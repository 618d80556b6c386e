//! # Risk Registry Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # End-to-end registry flows
//!     ├── fixtures.rs   # Shared network/reporter/case setup
//!     ├── flows.rs      # Reporter and flag lifecycles
//!     └── concurrency.rs# Racing writers, timeouts
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p rr-tests
//!
//! # By category
//! cargo test -p rr-tests integration::flows
//!
//! # Benchmarks
//! cargo bench -p rr-tests
//! ```

pub mod integration;
