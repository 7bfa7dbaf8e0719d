//! # Runtime Configuration Module
//!
//! Environment-driven settings for the coroutine runtime that serves
//! requests.
//!
//! ## Environment Variables
//!
//! ### `GROVE_STACK_SIZE`
//!
//! Stack size of each request coroutine. Accepts decimal (`32768`) or
//! hexadecimal (`0x8000`). Default: `0x8000` (32 KB).
//!
//! Handler chains recurse once per middleware through [`crate::Context::next`],
//! so deep middleware stacks need more room than a bare handler.
//!
//! ```rust
//! use grove::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! assert!(config.stack_size > 0);
//! ```

use std::env;

use tracing::{info, warn};

/// Default coroutine stack size (32 KB)
pub const DEFAULT_STACK_SIZE: usize = 0x8000;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Stack size for coroutines in bytes
    pub stack_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let stack_size = match env::var("GROVE_STACK_SIZE") {
            Ok(val) => parse_size(&val).unwrap_or_else(|| {
                warn!(value = %val, "Invalid GROVE_STACK_SIZE, using default");
                DEFAULT_STACK_SIZE
            }),
            Err(_) => DEFAULT_STACK_SIZE,
        };
        Self { stack_size }
    }

    /// Apply to the global `may` scheduler configuration.
    ///
    /// Must run before the first coroutine is spawned to take effect.
    pub fn apply(&self) {
        may::config().set_stack_size(self.stack_size);
        info!(stack_size = self.stack_size, "Coroutine runtime configured");
    }
}

fn parse_size(val: &str) -> Option<usize> {
    let val = val.trim();
    let parsed = match val.strip_prefix("0x").or_else(|| val.strip_prefix("0X")) {
        Some(hex) => usize::from_str_radix(hex, 16).ok(),
        None => val.parse().ok(),
    };
    parsed.filter(|size| *size > 0)
}
