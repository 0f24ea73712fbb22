// Configuration File Support
//
// Settings for the turnstay-webhooks CLI and for services embedding the SDK.
// TOML format with environment variable overrides, loaded from the XDG config
// directory: ~/.config/turnstay-webhooks/config.toml

use crate::client::{ClientConfig, DeliveryMode};
use crate::signature::DEFAULT_TOLERANCE_SECS;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Outbound delivery client
    pub client: ClientConfig,

    /// Inbound signature verification
    pub verification: VerificationConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

/// Signature verification configuration
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VerificationConfig {
    /// Endpoint signing secret (whsec_...)
    pub secret: Option<String>,

    /// Replay window in seconds, 0 disables the age check
    pub tolerance_secs: u64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            secret: None,
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }
}

impl std::fmt::Debug for VerificationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationConfig")
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .field("tolerance_secs", &self.tolerance_secs)
            .finish()
    }
}

impl Settings {
    /// Load configuration from the default XDG config directory
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    /// If the config file does not exist, returns default configuration.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed, or
    /// the result fails validation.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let settings = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file from {:?}", path))?;

            let settings: Settings = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file from {:?}", path))?;

            tracing::info!("Loaded configuration from {:?}", path);
            settings
        } else {
            tracing::debug!("Config file not found at {:?}, using defaults", path);
            Self::default()
        };

        let settings = settings.apply_env_overrides();
        settings.validate()?;
        Ok(settings)
    }

    /// Get the default configuration file path
    ///
    /// Returns `~/.config/turnstay-webhooks/config.toml` on Linux
    pub fn config_path() -> PathBuf {
        if let Some(proj_dirs) = directories::ProjectDirs::from("com", "turnstay", "turnstay-webhooks") {
            proj_dirs.config_dir().join("config.toml")
        } else {
            // Fallback if XDG dirs cannot be determined
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home)
                .join(".config")
                .join("turnstay-webhooks")
                .join("config.toml")
        }
    }

    /// Apply environment variable overrides to the configuration
    ///
    /// Environment variables take precedence over config file values:
    /// - TURNSTAY_WEBHOOKS_LOG_LEVEL
    /// - TURNSTAY_WEBHOOKS_LOG_FORMAT
    /// - TURNSTAY_WEBHOOKS_MODE
    /// - TURNSTAY_WEBHOOKS_BASE_URL
    /// - TURNSTAY_WEBHOOKS_QUEUE_URL
    /// - TURNSTAY_WEBHOOKS_REGION
    /// - TURNSTAY_WEBHOOKS_MAX_RETRIES
    /// - TURNSTAY_WEBHOOKS_SECRET
    fn apply_env_overrides(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        // Logging overrides
        if let Some(level) = lookup("TURNSTAY_WEBHOOKS_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("TURNSTAY_WEBHOOKS_LOG_FORMAT") {
            self.logging.format = format;
        }

        // Client overrides
        if let Some(mode) = lookup("TURNSTAY_WEBHOOKS_MODE") {
            match mode.parse::<DeliveryMode>() {
                Ok(mode) => self.client.mode = mode,
                Err(e) => tracing::warn!("Ignoring TURNSTAY_WEBHOOKS_MODE: {}", e),
            }
        }
        if let Some(url) = lookup("TURNSTAY_WEBHOOKS_BASE_URL") {
            self.client.base_url = Some(url);
        }
        if let Some(url) = lookup("TURNSTAY_WEBHOOKS_QUEUE_URL") {
            self.client.queue_url = Some(url);
        }
        if let Some(region) = lookup("TURNSTAY_WEBHOOKS_REGION") {
            self.client.region = region;
        }
        if let Some(retries) = lookup("TURNSTAY_WEBHOOKS_MAX_RETRIES") {
            match retries.parse::<u32>() {
                Ok(retries) => self.client.max_retries = retries,
                Err(e) => tracing::warn!("Ignoring TURNSTAY_WEBHOOKS_MAX_RETRIES: {}", e),
            }
        }

        // Verification overrides
        if let Some(secret) = lookup("TURNSTAY_WEBHOOKS_SECRET") {
            self.verification.secret = Some(secret);
        }

        self
    }

    /// Validate the configuration
    ///
    /// Mode-specific URLs are not required here; the client checks them when
    /// it is constructed, so `sign`/`verify` work without a client section.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<()> {
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                self.logging.level
            ),
        }

        match self.logging.format.to_lowercase().as_str() {
            "json" | "pretty" | "compact" => {}
            _ => anyhow::bail!(
                "Invalid log format: {}. Must be one of: json, pretty, compact",
                self.logging.format
            ),
        }

        for (name, secs) in [
            ("client.timeout_secs", self.client.timeout_secs),
            ("client.retry_delay_secs", self.client.retry_delay_secs),
        ] {
            if std::time::Duration::try_from_secs_f64(secs).is_err() {
                anyhow::bail!("{} must be a non-negative number of seconds", name);
            }
        }

        Ok(())
    }

    /// Convert log level string to tracing::Level
    pub fn log_level(&self) -> Result<tracing::Level> {
        self.logging
            .level
            .to_lowercase()
            .parse()
            .map_err(|e| anyhow::anyhow!("Failed to parse log level: {}", e))
    }
}
