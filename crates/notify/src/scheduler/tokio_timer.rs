use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::{Scheduler, Timer};
use crate::error::NotifyError;
use crate::notification::NotificationId;

/// Receiving end of a [`TokioScheduler`]: yields ids whose timers fired.
pub type ExpiryReceiver = mpsc::UnboundedReceiver<NotificationId>;

/// Scheduler backed by tokio timers.
///
/// Each timer is a spawned task that sleeps and then posts the id to the
/// [`ExpiryReceiver`]. The timer tasks never touch the manager; the task that
/// owns the manager drains the receiver and calls `expire`.
#[derive(Debug, Clone)]
pub struct TokioScheduler {
	handle: Handle,
	expired: mpsc::UnboundedSender<NotificationId>,
}

/// Pending expiry on a [`TokioScheduler`].
#[derive(Debug)]
pub struct TokioTimer {
	cancel: CancellationToken,
}

impl TokioScheduler {
	/// Creates a scheduler bound to the current tokio runtime.
	pub fn new() -> Result<(Self, ExpiryReceiver), NotifyError> {
		let handle = Handle::try_current().map_err(|_| NotifyError::NoRuntime)?;
		Ok(Self::with_handle(handle))
	}

	/// Creates a scheduler that spawns its timers on `handle`.
	pub fn with_handle(handle: Handle) -> (Self, ExpiryReceiver) {
		let (expired, rx) = mpsc::unbounded_channel();
		(Self { handle, expired }, rx)
	}
}

impl Scheduler for TokioScheduler {
	type Timer = TokioTimer;

	fn schedule(&mut self, id: NotificationId, after: Duration) -> TokioTimer {
		let cancel = CancellationToken::new();
		let token = cancel.clone();
		let expired = self.expired.clone();

		tracing::trace!(%id, after_ms = after.as_millis() as u64, "notify.timer.schedule");
		self.handle.spawn(async move {
			tokio::select! {
				_ = token.cancelled() => {}
				_ = tokio::time::sleep(after) => {
					// Receiver gone means the owner shut down; nothing left to expire.
					let _ = expired.send(id);
				}
			}
		});

		TokioTimer { cancel }
	}
}

impl Timer for TokioTimer {
	fn cancel(self) {
		self.cancel.cancel();
	}
}
