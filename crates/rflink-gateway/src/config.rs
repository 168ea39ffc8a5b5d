use std::time::Duration;

use rflink_frame::DEFAULT_MAX_LINE_LENGTH;

/// Timeouts and limits for a gateway connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// How long to wait for the welcome banner.
    pub identify_timeout: Duration,
    /// How long to wait for all sixteen channel records.
    pub enumerate_timeout: Duration,
    /// How long to wait for a single command acknowledgment.
    pub command_timeout: Duration,
    /// Capacity of the request queue into the I/O task.
    pub request_buffer: usize,
    /// Longest unterminated line kept before it is discarded.
    pub max_line_length: usize,
}

impl GatewayConfig {
    /// Use `timeout` for identification, enumeration and commands alike.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.identify_timeout = timeout;
        self.enumerate_timeout = timeout;
        self.command_timeout = timeout;
        self
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            identify_timeout: Duration::from_secs(5),
            enumerate_timeout: Duration::from_secs(5),
            command_timeout: Duration::from_secs(5),
            request_buffer: 32,
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
        }
    }
}
