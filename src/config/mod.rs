//! Configuration management module for the polling TCP client.
//!
//! Provides hierarchical configuration loading and validation with:
//! - Default values as code base
//! - Environment variable overrides
//! - Configuration file support
//! - Component-wise validation
mod codec;
mod network;
pub use codec::*;
pub use network::*;
use std::env;

use config::Config;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::Result;

/// Prefix of environment variables overriding configuration values,
/// e.g. `TCP_CLIENT__NETWORK__READ_BUFFER_SIZE=4096`.
pub const ENV_PREFIX: &str = "TCP_CLIENT";

/// Main configuration container for the client
///
/// Combines all subsystem configurations with hierarchical override support:
/// 1. Default values from code implementation
/// 2. Configuration file specified by `CONFIG_PATH`
/// 3. Environment variables (highest priority)
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ClientConfig {
    /// Socket level parameters
    #[serde(default)]
    pub network: NetworkConfig,
    /// Text encoding of the wire payloads
    #[serde(default)]
    pub codec: CodecConfig,
}

impl ClientConfig {
    /// Loads configuration from hierarchical sources without validation.
    ///
    /// Configuration sources are merged in the following order (later sources override earlier):
    /// 1. Type defaults (lowest priority)
    /// 2. Configuration file from `CONFIG_PATH` environment variable (if set)
    /// 3. Environment variables with `TCP_CLIENT__` prefix (highest priority)
    ///
    /// # Note
    /// Validation is deferred so further overrides can be layered with
    /// [`with_override_config`](ClientConfig::with_override_config). Callers
    /// MUST call [`validate`](ClientConfig::validate) before use.
    ///
    /// # Examples
    /// ```ignore
    /// std::env::set_var("TCP_CLIENT__NETWORK__CONNECT_TIMEOUT_IN_MS", "500");
    /// let cfg = ClientConfig::new()?.validate()?;
    /// ```
    pub fn new() -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Ok(config_path) = env::var("CONFIG_PATH") {
            builder = builder.add_source(File::with_name(&config_path).required(true));
        }

        builder = builder.add_source(env_source());

        let config: Self = builder.build()?.try_deserialize()?;
        Ok(config)
    }

    /// Applies additional configuration overrides from file without validation.
    ///
    /// Merging order (later sources override earlier):
    /// 1. Current configuration values
    /// 2. New configuration file
    /// 3. Latest environment variables (highest priority)
    pub fn with_override_config(
        &self,
        path: &str,
    ) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(Config::try_from(self)?)
            .add_source(File::with_name(path))
            .add_source(env_source())
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Validates configuration and returns validated instance.
    pub fn validate(self) -> Result<Self> {
        self.network.validate()?;
        Ok(self)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .ignore_empty(true)
        .try_parsing(true)
}
