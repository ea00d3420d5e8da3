//! Store configuration.
//!
//! Loadable from TOML; missing keys take their defaults.
//!
//! ```toml
//! # Sessions older than this are dropped by the eviction sweep.
//! session_ttl_secs = 86400
//! ```

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::{LottieError, LottieResult};

/// Default session lifetime: 24 hours.
pub const DEFAULT_SESSION_TTL_SECS: u64 = 60 * 60 * 24;

/// Configuration for [`DocumentStore`](super::DocumentStore).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreConfig {
    /// Session time-to-live in seconds.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
}

fn default_session_ttl_secs() -> u64 {
    DEFAULT_SESSION_TTL_SECS
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
        }
    }
}

impl StoreConfig {
    /// Parses and validates a TOML config.
    pub fn from_toml_str(text: &str) -> LottieResult<Self> {
        let config: StoreConfig =
            toml::from_str(text).map_err(|e| LottieError::invalid_config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Builder: Set the session TTL.
    pub fn with_session_ttl_secs(mut self, secs: u64) -> Self {
        self.session_ttl_secs = secs;
        self
    }

    pub fn validate(&self) -> LottieResult<()> {
        if self.session_ttl_secs == 0 {
            return Err(LottieError::invalid_config("session_ttl_secs must be positive"));
        }
        if i64::try_from(self.session_ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .is_none()
        {
            return Err(LottieError::invalid_config("session_ttl_secs is too large"));
        }
        Ok(())
    }

    /// TTL as a duration, saturating at the largest representable value.
    pub fn session_ttl(&self) -> Duration {
        i64::try_from(self.session_ttl_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .unwrap_or(Duration::MAX)
    }
}
