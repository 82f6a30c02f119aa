//! Notification records and the descriptors producers submit.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use chrono_humanize::HumanTime;

use crate::error::NotifyError;

/// Read-only copy of the live set handed to renderers, oldest first.
pub type Snapshot = Arc<[Notification]>;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Kind {
	/// Informational message (default).
	#[default]
	Info,
	/// An operation completed.
	Success,
	/// Something needs attention but nothing failed.
	Warning,
	/// An operation failed.
	Error,
}

impl FromStr for Kind {
	type Err = NotifyError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim() {
			"info" => Ok(Self::Info),
			"success" => Ok(Self::Success),
			"warning" => Ok(Self::Warning),
			"error" => Ok(Self::Error),
			other => Err(NotifyError::UnknownKind(other.to_string())),
		}
	}
}

/// Identity assigned by the manager. Never reused within a process run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NotificationId(u64);

impl NotificationId {
	pub(crate) const fn new(raw: u64) -> Self {
		Self(raw)
	}

	/// Returns the raw counter value.
	pub const fn get(self) -> u64 {
		self.0
	}
}

impl fmt::Display for NotificationId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "#{}", self.0)
	}
}

/// Descriptor passed to [`NotificationManager::add`](crate::NotificationManager::add).
///
/// Identity and creation time are assigned by the manager, so there is no way
/// to supply them here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationSpec {
	pub(crate) kind: Kind,
	pub(crate) title: String,
	pub(crate) message: String,
	pub(crate) auto_close: bool,
	pub(crate) duration: Option<Duration>,
}

impl NotificationSpec {
	/// Creates a descriptor that stays until dismissed.
	pub fn new(kind: Kind, title: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			kind,
			title: title.into(),
			message: message.into(),
			auto_close: false,
			duration: None,
		}
	}

	/// Creates an informational descriptor.
	pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
		Self::new(Kind::Info, title, message)
	}

	/// Creates a success descriptor.
	pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
		Self::new(Kind::Success, title, message)
	}

	/// Creates a warning descriptor.
	pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
		Self::new(Kind::Warning, title, message)
	}

	/// Creates an error descriptor.
	pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
		Self::new(Kind::Error, title, message)
	}

	/// Sets whether the notification expires on its own.
	#[must_use]
	pub fn auto_close(mut self, auto_close: bool) -> Self {
		self.auto_close = auto_close;
		self
	}

	/// Sets the expiry duration. Only meaningful with `auto_close(true)`.
	#[must_use]
	pub fn duration(mut self, duration: Duration) -> Self {
		self.duration = Some(duration);
		self
	}

	/// Shorthand for `auto_close(true).duration(after)`.
	#[must_use]
	pub fn close_after(self, after: Duration) -> Self {
		self.auto_close(true).duration(after)
	}

	/// Returns the requested kind.
	pub fn kind(&self) -> Kind {
		self.kind
	}

	/// Checks the parts of the contract the type system cannot.
	pub(crate) fn validate(&self) -> Result<(), NotifyError> {
		if self.title.trim().is_empty() {
			return Err(NotifyError::BlankTitle);
		}
		if self.duration.is_some_and(|d| d.is_zero()) {
			return Err(NotifyError::ZeroDuration);
		}
		Ok(())
	}
}

/// Immutable notification record owned by the manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
	id: NotificationId,
	kind: Kind,
	title: String,
	message: String,
	auto_close: bool,
	duration: Duration,
	created_at: DateTime<Utc>,
}

impl Notification {
	/// Builds a record from a validated descriptor, resolving the duration.
	pub(crate) fn from_spec(id: NotificationId, spec: NotificationSpec, default_duration: Duration, created_at: DateTime<Utc>) -> Self {
		Self {
			id,
			kind: spec.kind,
			title: spec.title,
			message: spec.message,
			auto_close: spec.auto_close,
			duration: spec.duration.unwrap_or(default_duration),
			created_at,
		}
	}

	/// Returns the id assigned at creation.
	pub fn id(&self) -> NotificationId {
		self.id
	}

	/// Returns the severity.
	pub fn kind(&self) -> Kind {
		self.kind
	}

	/// Returns the short display string.
	pub fn title(&self) -> &str {
		&self.title
	}

	/// Returns the longer display string.
	pub fn message(&self) -> &str {
		&self.message
	}

	/// Returns true if the record expires on its own.
	pub fn auto_close(&self) -> bool {
		self.auto_close
	}

	/// Effective expiry duration, with the manager default already applied.
	pub fn duration(&self) -> Duration {
		self.duration
	}

	/// Returns the creation timestamp.
	pub fn created_at(&self) -> DateTime<Utc> {
		self.created_at
	}

	/// Instant after which an auto-closing record is due for removal.
	pub fn deadline(&self) -> Option<DateTime<Utc>> {
		if !self.auto_close {
			return None;
		}
		let delta = TimeDelta::from_std(self.duration).ok()?;
		self.created_at.checked_add_signed(delta)
	}

	/// Time elapsed since creation, clamped at zero.
	pub fn age(&self, now: DateTime<Utc>) -> TimeDelta {
		(now - self.created_at).max(TimeDelta::zero())
	}

	/// Relative label for display, e.g. "2 minutes ago" or "now".
	pub fn time_ago(&self, now: DateTime<Utc>) -> String {
		HumanTime::from(-self.age(now)).to_string()
	}
}
