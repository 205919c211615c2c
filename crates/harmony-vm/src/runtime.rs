//! VM runtime - the main entry point
//!
//! The runtime owns configuration and hands out execution contexts. Each
//! context gets its own realm (intrinsics and global object).

use serde::Deserialize;

use crate::context::VmContext;

/// The VM runtime
///
/// `Send + Sync`; contexts it creates are independent of each other.
pub struct VmRuntime {
    /// Runtime configuration
    config: RuntimeConfig,
}

/// Runtime configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Maximum nested call depth before `StackOverflow`
    pub max_stack_depth: usize,
    /// Start contexts in strict mode
    pub strict_mode: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_stack_depth: 10_000,
            strict_mode: false,
        }
    }
}

impl RuntimeConfig {
    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }
}

impl VmRuntime {
    /// Create a new runtime with default configuration
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    /// Create a new runtime with custom configuration
    pub fn with_config(config: RuntimeConfig) -> Self {
        tracing::debug!(
            max_stack_depth = config.max_stack_depth,
            strict_mode = config.strict_mode,
            "creating runtime"
        );
        Self { config }
    }

    /// Create a new execution context with a fresh realm
    pub fn create_context(&self) -> VmContext {
        VmContext::new(self.config.clone())
    }

    /// Get runtime configuration
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }
}

impl Default for VmRuntime {
    fn default() -> Self {
        Self::new()
    }
}
