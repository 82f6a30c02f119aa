//! Time sources for notification timestamps.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;

/// Source of creation timestamps.
pub trait Clock {
	fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> DateTime<Utc> {
		Utc::now()
	}
}

/// Virtual clock that only moves when told to.
///
/// Clones share the same instant, so a [`ManualScheduler`](crate::ManualScheduler)
/// and the manager it feeds always agree on the time.
#[derive(Debug, Clone)]
pub struct ManualClock {
	now: Arc<Mutex<DateTime<Utc>>>,
}

impl Default for ManualClock {
	fn default() -> Self {
		Self::new(DateTime::<Utc>::UNIX_EPOCH)
	}
}

impl ManualClock {
	/// Creates a clock frozen at `start`.
	pub fn new(start: DateTime<Utc>) -> Self {
		Self {
			now: Arc::new(Mutex::new(start)),
		}
	}

	/// Moves the clock forward and returns the new instant.
	pub fn advance(&self, by: Duration) -> DateTime<Utc> {
		let mut now = self.now.lock();
		let delta = TimeDelta::from_std(by).unwrap_or(TimeDelta::MAX);
		*now = now.checked_add_signed(delta).unwrap_or(DateTime::<Utc>::MAX_UTC);
		*now
	}

	/// Jumps to an absolute instant. Moving backwards is allowed.
	pub fn set(&self, at: DateTime<Utc>) {
		*self.now.lock() = at;
	}
}

impl Clock for ManualClock {
	fn now(&self) -> DateTime<Utc> {
		*self.now.lock()
	}
}
