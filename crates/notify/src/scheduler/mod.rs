//! Timer capability used for notification expiry.
//!
//! The manager never talks to a timer API directly. It asks a [`Scheduler`]
//! to fire after a duration for a given id; whoever drives the manager routes
//! each firing back into [`NotificationManager::expire`].
//!
//! [`NotificationManager::expire`]: crate::NotificationManager::expire

use std::time::Duration;

use crate::notification::NotificationId;

mod manual;
mod tokio_timer;

pub use manual::{ManualScheduler, ManualTimer};
pub use tokio_timer::{ExpiryReceiver, TokioScheduler, TokioTimer};

/// Schedules a one-shot expiry for a notification id.
pub trait Scheduler {
	/// Handle for a pending expiry.
	type Timer: Timer;

	/// Arranges for `id` to be reported as expired once `after` has elapsed.
	fn schedule(&mut self, id: NotificationId, after: Duration) -> Self::Timer;
}

/// Handle to a pending expiry.
///
/// Cancelling is an optimization only. A timer that still fires after its
/// record is gone finds nothing to remove.
pub trait Timer {
	fn cancel(self);
}

/// Timer that cannot be cancelled.
impl Timer for () {
	fn cancel(self) {}
}
