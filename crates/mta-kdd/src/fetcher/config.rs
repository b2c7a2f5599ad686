//! Configuration for fetch operations

use std::time::Duration;

/// Network timeout applied to every fetch
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for fetch operations
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Bound on connecting and on each wait for response data, not on the
    /// whole transfer
    pub timeout: Duration,
    pub user_agent: String,
}

impl FetchConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent<S: Into<String>>(mut self, user_agent: S) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: concat!("mta-kdd/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
