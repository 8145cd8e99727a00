//! Process configuration.
//!
//! [`BlockformConfig`] collects the few policy knobs of the component model.
//! It can be built in code with the `with_*` methods or loaded from TOML:
//!
//! ```
//! use horizon_blockform_core::BlockformConfig;
//!
//! let config = BlockformConfig::from_toml_str(r#"
//!     thread_checks = true
//!     asset_failure_escalation = 5
//! "#).unwrap();
//!
//! assert!(config.thread_checks);
//! assert_eq!(config.asset_failure_escalation, Some(5));
//! assert!(!config.trace_dispatch);
//! ```

use serde::Deserialize;

use crate::error::ConfigError;
use crate::thread_check::ThreadAffinity;

/// Configuration shared by the designer and the runtime.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BlockformConfig {
    /// Verify that trees and forms are only touched from their owning thread.
    pub thread_checks: bool,
    /// After this many consecutive failures to load the same asset path, log
    /// the failure at error level instead of warn. `None` never escalates.
    pub asset_failure_escalation: Option<u32>,
    /// Log every dispatch at debug level.
    pub trace_dispatch: bool,
}

impl Default for BlockformConfig {
    fn default() -> Self {
        Self {
            thread_checks: cfg!(debug_assertions),
            asset_failure_escalation: Some(3),
            trace_dispatch: false,
        }
    }
}

impl BlockformConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        crate::blockform_debug!(?config, "loaded configuration");
        Ok(config)
    }

    /// Set whether thread affinity is checked.
    pub fn with_thread_checks(mut self, enabled: bool) -> Self {
        self.thread_checks = enabled;
        self
    }

    /// Set the asset failure escalation threshold.
    pub fn with_asset_failure_escalation(mut self, threshold: Option<u32>) -> Self {
        self.asset_failure_escalation = threshold;
        self
    }

    /// Set whether dispatches are logged.
    pub fn with_trace_dispatch(mut self, enabled: bool) -> Self {
        self.trace_dispatch = enabled;
        self
    }

    /// A thread affinity for the current thread honoring `thread_checks`.
    pub fn affinity(&self) -> ThreadAffinity {
        ThreadAffinity::with_checks(self.thread_checks)
    }
}
