//! # Runtime Configuration Module
//!
//! Environment variable based configuration for the coroutine runtime.
//!
//! ## Environment Variables
//!
//! ### `TRELLIS_STACK_SIZE`
//!
//! Stack size in bytes for request-serving coroutines. Accepts decimal
//! (`65536`) or hexadecimal (`0x10000`) values. Default: `0x10000` (64 KB).
//!
//! Total memory is roughly `stack_size x concurrent_requests`, so tune it
//! to the call depth of your handlers: too small overflows, too large wastes
//! memory under high concurrency.
//!
//! ```rust
//! use trellis::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("Stack size: {} bytes", config.stack_size);
//! ```

use std::env;

const DEFAULT_STACK_SIZE: usize = 0x10000;

/// Runtime configuration loaded from environment variables.
///
/// Load at startup with [`RuntimeConfig::from_env`]; unparsable values fall
/// back to the defaults.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeConfig {
    /// Stack size for request coroutines in bytes (default: 64 KB / 0x10000).
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
        let stack_size = match env::var("TRELLIS_STACK_SIZE") {
            Ok(val) => {
                if let Some(hex) = val.strip_prefix("0x") {
                    usize::from_str_radix(hex, 16).unwrap_or(DEFAULT_STACK_SIZE)
                } else {
                    val.parse().unwrap_or(DEFAULT_STACK_SIZE)
                }
            }
            Err(_) => DEFAULT_STACK_SIZE,
        };
        RuntimeConfig { stack_size }
    }
}
