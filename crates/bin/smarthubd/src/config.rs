//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `smarthub.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use serde::Deserialize;
use smarthub_app::controller::ControllerConfig;
use smarthub_app::device_pool;

/// Largest device pool the daemon will preload.
pub const MAX_POOL_SIZE: u32 = 1024;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Device pool settings.
    pub pool: PoolConfig,
    /// Rule evaluation settings.
    pub automation: AutomationConfig,
    /// Startup data.
    pub seed: SeedConfig,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Pre-built devices handed out by "add device".
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    /// First reserved device id.
    pub first_id: u32,
    /// Number of devices to preload.
    pub size: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AutomationConfig {
    /// Run an evaluation pass after every device or rule mutation.
    pub evaluate_after_mutation: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Load the demo household at startup.
    pub sample_data: bool,
}

impl Config {
    /// Load configuration from `smarthub.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting values are out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("smarthub.toml")?;
        config.apply_env_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("SMARTHUB_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("SMARTHUB_POOL_SIZE")
            && let Ok(size) = val.trim().parse()
        {
            self.pool.size = size;
        }
        if let Some(val) = var("SMARTHUB_AUTO_EVALUATE") {
            match val.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => self.automation.evaluate_after_mutation = true,
                "0" | "false" | "no" | "off" => self.automation.evaluate_after_mutation = false,
                _ => {}
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.pool.first_id == 0 {
            return Err(ConfigError::Validation(
                "pool.first_id must be non-zero".to_string(),
            ));
        }
        if self.pool.size > MAX_POOL_SIZE {
            return Err(ConfigError::Validation(format!(
                "pool.size must be at most {MAX_POOL_SIZE}"
            )));
        }
        Ok(())
    }

    /// Settings handed to the controller.
    #[must_use]
    pub fn controller(&self) -> ControllerConfig {
        ControllerConfig {
            evaluate_after_mutation: self.automation.evaluate_after_mutation,
            pool_first_id: self.pool.first_id,
            pool_size: self.pool.size,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "smarthubd=info,smarthub=info,smarthub_app=info".to_string(),
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            first_id: device_pool::DEFAULT_FIRST_ID,
            size: device_pool::DEFAULT_SIZE,
        }
    }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self { sample_data: true }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
