//! Registry engine configuration.

use crate::domain::value_objects::Identity;
use std::env;
use std::time::Duration;

/// Default bound on every storage and transfer call.
pub const DEFAULT_COLLABORATOR_TIMEOUT_MS: u64 = 30_000;

/// Default and hard cap for list page sizes.
pub const DEFAULT_MAX_PAGE_SIZE: usize = 100;

/// Engine-wide settings. Per-network economics live in the network record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryConfig {
    /// If set, only this identity may create networks.
    pub bootstrap_authority: Option<Identity>,

    /// Timeout for storage and transfer calls, in milliseconds.
    pub collaborator_timeout_ms: u64,

    /// Reject reporter-driven mutations from non-active reporters.
    pub require_active_reporter: bool,

    /// Largest page a list query returns.
    pub max_page_size: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            bootstrap_authority: None,
            collaborator_timeout_ms: DEFAULT_COLLABORATOR_TIMEOUT_MS,
            require_active_reporter: true,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }
}

impl RegistryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `RR_BOOTSTRAP_AUTHORITY`: hex identity allowed to create networks (default: anyone)
    /// - `RR_COLLABORATOR_TIMEOUT_MS`: collaborator timeout (default: 30000)
    /// - `RR_REQUIRE_ACTIVE_REPORTER`: enforce active status (default: true)
    /// - `RR_MAX_PAGE_SIZE`: page size cap (default: 100)
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        Self {
            bootstrap_authority: env::var("RR_BOOTSTRAP_AUTHORITY")
                .ok()
                .and_then(|v| Identity::from_hex(v.trim())),

            collaborator_timeout_ms: env::var("RR_COLLABORATOR_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_COLLABORATOR_TIMEOUT_MS),

            require_active_reporter: env::var("RR_REQUIRE_ACTIVE_REPORTER")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),

            max_page_size: env::var("RR_MAX_PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|size| *size > 0)
                .unwrap_or(DEFAULT_MAX_PAGE_SIZE),
        }
    }

    /// Collaborator timeout as a `Duration`.
    #[must_use]
    pub fn collaborator_timeout(&self) -> Duration {
        Duration::from_millis(self.collaborator_timeout_ms)
    }

    /// Clamp a requested page size to `1..=max_page_size`.
    #[must_use]
    pub fn page_size(&self, requested: usize) -> usize {
        requested.clamp(1, self.max_page_size.max(1))
    }
}
