//! Notification manager configuration.
//!
//! Configuration is written in TOML:
//!
//! ```toml
//! max-notifications = 5
//! default-duration-ms = 5000
//! ```
//!
//! Both keys are optional; missing keys take the defaults above.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Default live-set capacity.
pub const DEFAULT_MAX_NOTIFICATIONS: usize = 5;
/// Default expiry for auto-closing notifications without an explicit duration.
pub const DEFAULT_DURATION: Duration = Duration::from_millis(5000);

/// Settings fixed at manager construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotifyConfig {
	/// Maximum number of live notifications. Always at least 1.
	pub max_notifications: usize,
	/// Expiry applied when an auto-closing descriptor carries no duration.
	pub default_duration: Duration,
}

impl Default for NotifyConfig {
	fn default() -> Self {
		Self {
			max_notifications: DEFAULT_MAX_NOTIFICATIONS,
			default_duration: DEFAULT_DURATION,
		}
	}
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
struct RawConfig {
	max_notifications: usize,
	default_duration_ms: u64,
}

impl Default for RawConfig {
	fn default() -> Self {
		Self {
			max_notifications: DEFAULT_MAX_NOTIFICATIONS,
			default_duration_ms: DEFAULT_DURATION.as_millis() as u64,
		}
	}
}

impl NotifyConfig {
	/// Sets the live-set capacity.
	#[must_use]
	pub fn with_max_notifications(mut self, max: usize) -> Self {
		self.max_notifications = max;
		self
	}

	/// Sets the fallback expiry for auto-closing notifications.
	#[must_use]
	pub fn with_default_duration(mut self, duration: Duration) -> Self {
		self.default_duration = duration;
		self
	}

	/// Parses and validates a TOML document.
	pub fn parse(input: &str) -> Result<Self, ConfigError> {
		let raw: RawConfig = toml::from_str(input)?;
		let config = Self {
			max_notifications: raw.max_notifications,
			default_duration: Duration::from_millis(raw.default_duration_ms),
		};
		config.validate()?;
		Ok(config)
	}

	/// Reads and parses a TOML file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::parse(&content)
	}

	/// Rejects values the manager cannot honor.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.max_notifications == 0 {
			return Err(ConfigError::Invalid("max-notifications must be at least 1".into()));
		}
		if self.default_duration.is_zero() {
			return Err(ConfigError::Invalid("default-duration-ms must be positive".into()));
		}
		Ok(())
	}
}
