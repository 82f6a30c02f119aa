//! Error types for notification handling.

use std::path::PathBuf;

use thiserror::Error;

/// Contract violations rejected at the `add` boundary.
///
/// None of these leave the live set modified.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotifyError {
	/// An auto-close duration of zero was supplied.
	#[error("notification duration must be positive")]
	ZeroDuration,

	/// The title was empty or whitespace only.
	#[error("notification title must not be blank")]
	BlankTitle,

	/// A kind name did not match any known notification kind.
	#[error("unknown notification kind: {0:?} (expected info, success, warning or error)")]
	UnknownKind(String),

	/// A tokio-backed scheduler was created outside a tokio runtime.
	#[error("tokio scheduler requires a running tokio runtime")]
	NoRuntime,
}

/// Errors that can occur when loading notification configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or types.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A value parsed but is out of range.
	#[error("invalid notification config: {0}")]
	Invalid(String),
}

/// Errors returned by [`NotificationHandle`](crate::NotificationHandle) calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
	/// The service loop has stopped; the command was not applied.
	#[error("notification service is closed")]
	Closed,

	/// The descriptor was rejected by the manager.
	#[error(transparent)]
	Rejected(#[from] NotifyError),
}

/// Result type for manager operations.
pub type Result<T> = std::result::Result<T, NotifyError>;
