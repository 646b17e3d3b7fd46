use std::time::Duration;

use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Largest read buffer accepted by [`NetworkConfig::validate`].
pub const MAX_READ_BUFFER_SIZE: usize = 64 * 1024;

/// Socket parameters of the single client connection
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NetworkConfig {
    /// TCP connect timeout in milliseconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_in_ms: u64,

    /// Size of the buffer handed to every socket read.
    ///
    /// Each read is delivered as one logical message, so this is also the
    /// largest payload the consumer can observe in one piece.
    #[serde(default = "default_read_buffer_size")]
    pub read_buffer_size: usize,

    /// Disable Nagle's algorithm on the connected socket
    #[serde(default = "default_tcp_nodelay")]
    pub tcp_nodelay: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            connect_timeout_in_ms: default_connect_timeout(),
            read_buffer_size: default_read_buffer_size(),
            tcp_nodelay: default_tcp_nodelay(),
        }
    }
}

impl NetworkConfig {
    pub fn validate(&self) -> Result<()> {
        if self.connect_timeout_in_ms == 0 {
            return Err(Error::Config(ConfigError::Message(
                "connect timeout must be > 0".to_string(),
            )));
        }

        if self.read_buffer_size == 0 || self.read_buffer_size > MAX_READ_BUFFER_SIZE {
            return Err(Error::Config(ConfigError::Message(format!(
                "read buffer size {} out of range 1..={}",
                self.read_buffer_size, MAX_READ_BUFFER_SIZE
            ))));
        }

        Ok(())
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_in_ms)
    }
}

fn default_connect_timeout() -> u64 {
    5000
}
fn default_read_buffer_size() -> usize {
    1024
}
fn default_tcp_nodelay() -> bool {
    true
}
