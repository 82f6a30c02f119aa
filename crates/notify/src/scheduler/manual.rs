use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;

use super::{Scheduler, Timer};
use crate::clock::{Clock, ManualClock};
use crate::notification::NotificationId;

#[derive(Debug, Default)]
struct Pending {
	/// Keyed by (deadline, sequence) so equal deadlines fire in schedule order.
	timers: BTreeMap<(DateTime<Utc>, u64), NotificationId>,
	next_seq: u64,
}

/// Virtual-time scheduler for tests and deterministic replays.
///
/// Deadlines are measured on a shared [`ManualClock`]; nothing fires until
/// [`advance`](Self::advance) is called.
#[derive(Debug, Clone)]
pub struct ManualScheduler {
	clock: ManualClock,
	pending: Arc<Mutex<Pending>>,
}

/// Pending expiry on a [`ManualScheduler`].
#[derive(Debug)]
pub struct ManualTimer {
	key: (DateTime<Utc>, u64),
	pending: Arc<Mutex<Pending>>,
}

impl ManualScheduler {
	/// Creates a scheduler measuring deadlines on `clock`.
	pub fn new(clock: ManualClock) -> Self {
		Self {
			clock,
			pending: Arc::default(),
		}
	}

	/// Returns the shared virtual clock.
	pub fn clock(&self) -> &ManualClock {
		&self.clock
	}

	/// Number of timers that have neither fired nor been cancelled.
	pub fn pending(&self) -> usize {
		self.pending.lock().timers.len()
	}

	/// Moves virtual time forward by `by` and returns every id whose deadline
	/// is at or before the new instant, earliest first.
	pub fn advance(&self, by: Duration) -> Vec<NotificationId> {
		let now = self.clock.advance(by);
		self.drain_due(now)
	}

	fn drain_due(&self, now: DateTime<Utc>) -> Vec<NotificationId> {
		let mut pending = self.pending.lock();
		let later = match now.checked_add_signed(TimeDelta::nanoseconds(1)) {
			Some(bound) => pending.timers.split_off(&(bound, 0)),
			None => BTreeMap::new(),
		};
		let due = std::mem::replace(&mut pending.timers, later);
		due.into_values().collect()
	}
}

impl Scheduler for ManualScheduler {
	type Timer = ManualTimer;

	fn schedule(&mut self, id: NotificationId, after: Duration) -> ManualTimer {
		let delta = TimeDelta::from_std(after).unwrap_or(TimeDelta::MAX);
		let deadline = self.clock.now().checked_add_signed(delta).unwrap_or(DateTime::<Utc>::MAX_UTC);

		let mut pending = self.pending.lock();
		let seq = pending.next_seq;
		pending.next_seq += 1;
		pending.timers.insert((deadline, seq), id);

		ManualTimer {
			key: (deadline, seq),
			pending: Arc::clone(&self.pending),
		}
	}
}

impl Timer for ManualTimer {
	fn cancel(self) {
		self.pending.lock().timers.remove(&self.key);
	}
}
