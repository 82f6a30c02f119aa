//! Live notification set with FIFO capacity eviction and timed expiry.

use std::collections::VecDeque;
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::clock::{Clock, ManualClock, SystemClock};
use crate::config::{DEFAULT_DURATION, NotifyConfig};
use crate::error::Result;
use crate::notification::{Notification, NotificationId, NotificationSpec, Snapshot};
use crate::scheduler::{ManualScheduler, Scheduler, Timer};


struct Entry<T> {
	notification: Notification,
	/// Present only for auto-closing records.
	timer: Option<T>,
}

impl<T: Timer> Entry<T> {
	fn discard(self) -> Notification {
		if let Some(timer) = self.timer {
			timer.cancel();
		}
		self.notification
	}
}

/// Owns the live set of notifications.
///
/// Records are kept oldest first. The set never holds more than
/// `config.max_notifications` records; adding to a full set evicts the oldest.
pub struct NotificationManager<S: Scheduler, C = SystemClock> {
	entries: VecDeque<Entry<S::Timer>>,
	/// Next id to assign. Starts at 1 and only grows.
	next_id: u64,
	/// Bumped on every change to the live set.
	revision: u64,
	config: NotifyConfig,
	scheduler: S,
	clock: C,
}

impl<S: Scheduler> NotificationManager<S> {
	/// Creates a manager on the wall clock.
	pub fn new(config: NotifyConfig, scheduler: S) -> Self {
		Self::with_clock(config, scheduler, SystemClock)
	}
}

impl<S: Scheduler, C: Clock> NotificationManager<S, C> {
	/// Creates a manager reading timestamps from `clock`.
	///
	/// A capacity of zero is raised to one so the newest record always fits,
	/// and a zero default duration falls back to [`DEFAULT_DURATION`].
	pub fn with_clock(config: NotifyConfig, scheduler: S, clock: C) -> Self {
		let default_duration = if config.default_duration.is_zero() {
			DEFAULT_DURATION
		} else {
			config.default_duration
		};
		let config = NotifyConfig {
			max_notifications: config.max_notifications.max(1),
			default_duration,
		};
		Self {
			entries: VecDeque::with_capacity(config.max_notifications),
			next_id: 1,
			revision: 0,
			config,
			scheduler,
			clock,
		}
	}

	/// Adds a notification and returns its id.
	///
	/// A full set drops its oldest record first. Auto-closing records get one
	/// expiry timer for their duration, or the configured default.
	pub fn add(&mut self, spec: NotificationSpec) -> Result<NotificationId> {
		if let Err(err) = spec.validate() {
			warn!(kind = %spec.kind(), error = %err, "notify.add.rejected");
			return Err(err);
		}

		let id = NotificationId::new(self.next_id);
		self.next_id += 1;

		let notification = Notification::from_spec(id, spec, self.config.default_duration, self.clock.now());

		if self.entries.len() >= self.config.max_notifications
			&& let Some(oldest) = self.entries.pop_front()
		{
			let evicted = oldest.discard();
			debug!(id = %evicted.id(), kind = %evicted.kind(), "notify.evict");
		}

		let timer = notification
			.auto_close()
			.then(|| self.scheduler.schedule(id, notification.duration()));

		debug!(
			%id,
			kind = %notification.kind(),
			auto_close = notification.auto_close(),
			duration_ms = notification.duration().as_millis() as u64,
			"notify.add"
		);
		self.entries.push_back(Entry { notification, timer });
		self.revision += 1;
		Ok(id)
	}

	/// Removes a notification. Returns false when `id` is not live.
	pub fn remove(&mut self, id: NotificationId) -> bool {
		let removed = self.take(id);
		if removed {
			debug!(%id, "notify.remove");
		}
		removed
	}

	/// Removal requested by a fired timer.
	///
	/// Same effect as [`remove`](Self::remove); a timer firing for a record
	/// that is already gone is a no-op.
	pub fn expire(&mut self, id: NotificationId) -> bool {
		let removed = self.take(id);
		if removed {
			debug!(%id, "notify.expire");
		} else {
			trace!(%id, "notify.expire.stale");
		}
		removed
	}

	/// Empties the live set and cancels every pending timer.
	pub fn clear_all(&mut self) {
		if self.entries.is_empty() {
			return;
		}
		let count = self.entries.len();
		for entry in self.entries.drain(..) {
			entry.discard();
		}
		self.revision += 1;
		debug!(count, "notify.clear_all");
	}

	fn take(&mut self, id: NotificationId) -> bool {
		let Some(index) = self.entries.iter().position(|e| e.notification.id() == id) else {
			return false;
		};
		if let Some(entry) = self.entries.remove(index) {
			entry.discard();
		}
		self.revision += 1;
		true
	}

	/// Live notifications, oldest first.
	pub fn iter(&self) -> impl ExactSizeIterator<Item = &Notification> + '_ {
		self.entries.iter().map(|e| &e.notification)
	}

	/// Returns the live notification with `id`, if any.
	pub fn get(&self, id: NotificationId) -> Option<&Notification> {
		self.iter().find(|n| n.id() == id)
	}

	/// Returns true if `id` is live.
	pub fn contains(&self, id: NotificationId) -> bool {
		self.get(id).is_some()
	}

	/// Returns the number of live notifications.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true if there are no live notifications.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Maximum number of live notifications.
	pub fn capacity(&self) -> usize {
		self.config.max_notifications
	}

	/// Counter bumped on every change to the live set.
	///
	/// Renderers can compare it against the last value they drew.
	pub fn revision(&self) -> u64 {
		self.revision
	}

	/// Copies the live set for a renderer.
	pub fn snapshot(&self) -> Snapshot {
		self.iter().cloned().collect::<Vec<_>>().into()
	}

	/// Returns the effective configuration.
	pub fn config(&self) -> &NotifyConfig {
		&self.config
	}

	/// Returns the clock used for creation timestamps.
	pub fn clock(&self) -> &C {
		&self.clock
	}
}

impl NotificationManager<ManualScheduler, ManualClock> {
	/// Creates a manager on virtual time starting at `clock`'s current instant.
	pub fn manual(config: NotifyConfig, clock: ManualClock) -> Self {
		let scheduler = ManualScheduler::new(clock.clone());
		Self::with_clock(config, scheduler, clock)
	}

	/// Moves virtual time forward and expires every record that fell due.
	///
	/// Returns the ids that were actually removed.
	pub fn advance(&mut self, by: Duration) -> Vec<NotificationId> {
		let due = self.scheduler.advance(by);
		due.into_iter().filter(|&id| self.expire(id)).collect()
	}

	/// Timers still waiting to fire.
	pub fn pending_timers(&self) -> usize {
		self.scheduler.pending()
	}
}

impl<S: Scheduler, C> std::fmt::Debug for NotificationManager<S, C> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("NotificationManager")
			.field("len", &self.entries.len())
			.field("next_id", &self.next_id)
			.field("revision", &self.revision)
			.field("config", &self.config)
			.finish_non_exhaustive()
	}
}
