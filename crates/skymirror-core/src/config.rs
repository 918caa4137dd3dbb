// ── Mirror configuration ──

use std::time::Duration;

use crate::error::CoreError;

/// Depth at which rendering stops and the continue-on-Bluesky link takes
/// over. Counted from the root reply level (first level of replies = 1).
pub const DEFAULT_DEPTH_LIMIT: usize = 3;

/// Period of the scheduled refresh timer.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Client-level request deadline (the caller's execution context -- the
/// fetcher itself imposes no per-request timeout).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings shared by every view a controller mounts.
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    /// Base URL of the AppView the fetcher talks to.
    pub api_base: String,

    /// Maximum nesting level rendered locally. Must be at least 1.
    pub depth_limit: usize,

    /// How often each view re-runs its fetch→render cycle.
    pub refresh_interval: Duration,

    /// Escape post body text before embedding it in markup. Disabling
    /// this restores the permissive pass-through behavior and trusts
    /// the remote payload wholesale.
    pub escape_body: bool,

    /// HTTP client timeout.
    pub timeout: Duration,
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            api_base: skymirror_api::client::PUBLIC_APPVIEW_BASE.to_owned(),
            depth_limit: DEFAULT_DEPTH_LIMIT,
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            escape_body: true,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl MirrorConfig {
    /// Reject configurations no view could run with.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.depth_limit < 1 {
            return Err(CoreError::Config {
                message: "depth_limit must be at least 1".into(),
            });
        }
        if self.refresh_interval.is_zero() {
            return Err(CoreError::Config {
                message: "refresh_interval must be nonzero".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(MirrorConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_depth_is_rejected() {
        let cfg = MirrorConfig {
            depth_limit: 0,
            ..MirrorConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(CoreError::Config { .. })));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let cfg = MirrorConfig {
            refresh_interval: Duration::ZERO,
            ..MirrorConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(CoreError::Config { .. })));
    }
}
