use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

/// Configuration constants for the bot

/// Root directory for all per-user state and spreadsheet files
/// Read once at startup from DATA_DIR or defaults to "data_sps"
pub static DATA_DIR: Lazy<String> = Lazy::new(|| env::var("DATA_DIR").unwrap_or_else(|_| "data_sps".to_string()));

/// Path to the log file
/// Read from LOG_FILE environment variable
pub static LOG_FILE_PATH: Lazy<String> =
    Lazy::new(|| env::var("LOG_FILE").unwrap_or_else(|_| "sheetstash.log".to_string()));

/// Bot access token, required for startup
/// Read from BOT_TOKEN environment variable; `None` if unset or empty
pub static BOT_TOKEN: Lazy<Option<String>> = Lazy::new(|| env::var("BOT_TOKEN").ok().filter(|t| !t.is_empty()));

/// Network configuration
pub mod network {
    use super::Duration;

    /// Request timeout for Telegram API requests (in seconds)
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;

    /// Request timeout duration
    pub fn timeout() -> Duration {
        Duration::from_secs(REQUEST_TIMEOUT_SECS)
    }
}

/// Retry configuration for the outer dispatch loop
pub mod retry {
    use super::Duration;

    /// Maximum number of retries for dispatcher reconnection
    pub const MAX_DISPATCHER_RETRIES: u32 = 5;

    /// Delay between dispatcher retry attempts (in seconds)
    pub const DISPATCHER_RETRY_DELAY_SECS: u64 = 5;

    /// Dispatcher retry delay duration
    pub fn dispatcher_delay() -> Duration {
        Duration::from_secs(DISPATCHER_RETRY_DELAY_SECS)
    }

    /// Base for exponential backoff calculation
    pub const EXPONENTIAL_BACKOFF_BASE: u64 = 2;
}
