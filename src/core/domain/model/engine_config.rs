use std::time::Duration;

/// Configuration for rate limiting outgoing API calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Sustained number of calls allowed per second.
    pub requests_per_second: u32,
    /// Calls allowed back to back before throttling starts.
    pub burst_size: u32,
}

/// Behavioural knobs of an engine that are not connection parameters.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Age after which a cached ticket is treated as stale without waiting
    /// for the server to reject it.
    pub ticket_lifetime: Duration,
    /// Optional client-side rate limit; `None` disables it.
    pub rate_limit: Option<RateLimitConfig>,
}

impl EngineConfig {
    /// PVE tickets are valid for two hours.
    pub const DEFAULT_TICKET_LIFETIME: Duration = Duration::from_secs(2 * 60 * 60);
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            ticket_lifetime: Self::DEFAULT_TICKET_LIFETIME,
            rate_limit: None,
        }
    }
}
