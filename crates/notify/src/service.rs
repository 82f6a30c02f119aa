//! Event-loop host for a [`NotificationManager`] on tokio.
//!
//! One task owns the manager. Producers and renderers talk to it through a
//! cloneable [`NotificationHandle`]; timer firings arrive on the scheduler's
//! [`ExpiryReceiver`]. Everything is applied to the manager from that single
//! task, one message at a time, so `add`, `remove`, `clear_all` and expiry
//! never interleave.

use tokio::sync::{mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::NotifyConfig;
use crate::error::{NotifyError, ServiceError};
use crate::manager::NotificationManager;
use crate::notification::{NotificationId, NotificationSpec, Snapshot};
use crate::scheduler::{ExpiryReceiver, TokioScheduler};

/// Capacity of the command mailbox.
const COMMAND_CAPACITY: usize = 64;

enum Command {
	Add {
		spec: NotificationSpec,
		reply: oneshot::Sender<Result<NotificationId, NotifyError>>,
	},
	Remove {
		id: NotificationId,
		reply: oneshot::Sender<bool>,
	},
	ClearAll {
		reply: oneshot::Sender<()>,
	},
}

/// Owns the manager and runs its event loop.
pub struct NotificationService {
	manager: NotificationManager<TokioScheduler>,
	commands: mpsc::Receiver<Command>,
	expired: ExpiryReceiver,
	published: watch::Sender<Snapshot>,
	last_revision: u64,
}

/// Cloneable access to a running [`NotificationService`].
///
/// This is the object passed to producers (e.g. the API client's error paths)
/// and to the rendering layer.
#[derive(Clone)]
pub struct NotificationHandle {
	commands: mpsc::Sender<Command>,
	published: watch::Receiver<Snapshot>,
}

impl NotificationService {
	/// Builds a service on the current tokio runtime.
	pub fn new(config: NotifyConfig) -> Result<(Self, NotificationHandle), NotifyError> {
		let (scheduler, expired) = TokioScheduler::new()?;
		let manager = NotificationManager::new(config, scheduler);
		let (command_tx, commands) = mpsc::channel(COMMAND_CAPACITY);
		let (published, snapshots) = watch::channel(manager.snapshot());

		let service = Self {
			last_revision: manager.revision(),
			manager,
			commands,
			expired,
			published,
		};
		let handle = NotificationHandle {
			commands: command_tx,
			published: snapshots,
		};
		Ok((service, handle))
	}

	/// Processes commands and expiries until `shutdown` fires or every handle
	/// is dropped. Returns the manager so callers can inspect the final state.
	pub async fn run(mut self, shutdown: CancellationToken) -> NotificationManager<TokioScheduler> {
		info!(capacity = self.manager.capacity(), "notify.service.start");
		loop {
			tokio::select! {
				biased;
				_ = shutdown.cancelled() => break,
				Some(id) = self.expired.recv() => {
					self.manager.expire(id);
				}
				command = self.commands.recv() => match command {
					Some(command) => self.apply(command),
					None => break,
				},
			}
			self.publish();
		}
		info!(live = self.manager.len(), "notify.service.stop");
		self.manager
	}

	fn apply(&mut self, command: Command) {
		match command {
			Command::Add { spec, reply } => {
				let _ = reply.send(self.manager.add(spec));
			}
			Command::Remove { id, reply } => {
				let _ = reply.send(self.manager.remove(id));
			}
			Command::ClearAll { reply } => {
				self.manager.clear_all();
				let _ = reply.send(());
			}
		}
	}

	fn publish(&mut self) {
		let revision = self.manager.revision();
		if revision == self.last_revision {
			return;
		}
		self.last_revision = revision;
		debug!(revision, live = self.manager.len(), "notify.service.publish");
		self.published.send_replace(self.manager.snapshot());
	}
}

impl NotificationHandle {
	/// Adds a notification and waits for its id.
	pub async fn add(&self, spec: NotificationSpec) -> Result<NotificationId, ServiceError> {
		let (reply, rx) = oneshot::channel();
		self.send(Command::Add { spec, reply }).await?;
		Ok(rx.await.map_err(|_| ServiceError::Closed)??)
	}

	/// Removes a notification. Returns false when `id` was not live.
	pub async fn remove(&self, id: NotificationId) -> Result<bool, ServiceError> {
		let (reply, rx) = oneshot::channel();
		self.send(Command::Remove { id, reply }).await?;
		rx.await.map_err(|_| ServiceError::Closed)
	}

	/// Empties the live set.
	pub async fn clear_all(&self) -> Result<(), ServiceError> {
		let (reply, rx) = oneshot::channel();
		self.send(Command::ClearAll { reply }).await?;
		rx.await.map_err(|_| ServiceError::Closed)
	}

	/// Latest published live set.
	pub fn current(&self) -> Snapshot {
		self.published.borrow().clone()
	}

	/// Receiver that is notified every time the live set changes.
	pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
		self.published.clone()
	}

	async fn send(&self, command: Command) -> Result<(), ServiceError> {
		self.commands.send(command).await.map_err(|_| ServiceError::Closed)
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use pretty_assertions::assert_eq;

	use super::*;
	use crate::notification::Notification;

	fn titles(snapshot: &Snapshot) -> Vec<String> {
		snapshot.iter().map(|n| n.title().to_string()).collect()
	}

	fn spawn(config: NotifyConfig) -> (NotificationHandle, CancellationToken, tokio::task::JoinHandle<NotificationManager<TokioScheduler>>) {
		let (service, handle) = NotificationService::new(config).unwrap();
		let shutdown = CancellationToken::new();
		let task = tokio::spawn(service.run(shutdown.clone()));
		(handle, shutdown, task)
	}

	#[tokio::test(start_paused = true)]
	async fn auto_close_expires_after_duration() {
		let (handle, _shutdown, _task) = spawn(NotifyConfig::default());
		let id = handle
			.add(NotificationSpec::error("Save failed", "try again").close_after(Duration::from_millis(100)))
			.await
			.unwrap();
		assert!(handle.current().iter().any(|n| n.id() == id));

		tokio::time::sleep(Duration::from_millis(150)).await;
		assert!(handle.current().is_empty());
	}

	#[tokio::test(start_paused = true)]
	async fn default_duration_expiry_window() {
		let (handle, _shutdown, _task) = spawn(NotifyConfig::default());
		handle.add(NotificationSpec::info("Synced", "").auto_close(true)).await.unwrap();

		tokio::time::sleep(Duration::from_millis(4999)).await;
		assert_eq!(handle.current().len(), 1);

		tokio::time::sleep(Duration::from_millis(50)).await;
		assert!(handle.current().is_empty());
	}

	#[tokio::test(start_paused = true)]
	async fn capacity_evicts_oldest() {
		let (handle, _shutdown, _task) = spawn(NotifyConfig::default().with_max_notifications(2));
		for title in ["A", "B", "C"] {
			handle.add(NotificationSpec::info(title, "")).await.unwrap();
		}
		assert_eq!(titles(&handle.current()), vec!["B", "C"]);
	}

	#[tokio::test(start_paused = true)]
	async fn subscriber_sees_each_change() {
		let (handle, _shutdown, _task) = spawn(NotifyConfig::default());
		let mut rx = handle.subscribe();

		let id = handle.add(NotificationSpec::success("Saved", "")).await.unwrap();
		rx.changed().await.unwrap();
		assert_eq!(titles(&rx.borrow_and_update()), vec!["Saved"]);

		assert!(handle.remove(id).await.unwrap());
		rx.changed().await.unwrap();
		assert!(rx.borrow_and_update().is_empty());

		assert!(!handle.remove(id).await.unwrap());
		assert!(!rx.has_changed().unwrap());
	}

	#[tokio::test(start_paused = true)]
	async fn clear_all_discards_pending_expiries() {
		let (handle, shutdown, task) = spawn(NotifyConfig::default());
		handle
			.add(NotificationSpec::info("A", "").close_after(Duration::from_millis(100)))
			.await
			.unwrap();
		handle.add(NotificationSpec::info("B", "")).await.unwrap();
		handle.clear_all().await.unwrap();

		tokio::time::sleep(Duration::from_millis(200)).await;
		let after = handle.add(NotificationSpec::info("C", "")).await.unwrap();
		assert_eq!(titles(&handle.current()), vec!["C"]);

		shutdown.cancel();
		let manager = task.await.unwrap();
		let live: Vec<_> = manager.iter().map(Notification::id).collect();
		assert_eq!(live, vec![after]);
	}

	#[tokio::test(start_paused = true)]
	async fn rejected_descriptor_is_reported() {
		let (handle, _shutdown, _task) = spawn(NotifyConfig::default());
		let err = handle.add(NotificationSpec::info(" ", "")).await.unwrap_err();
		assert_eq!(err, ServiceError::Rejected(NotifyError::BlankTitle));
	}

	#[tokio::test(start_paused = true)]
	async fn handle_reports_closed_after_shutdown() {
		let (handle, shutdown, task) = spawn(NotifyConfig::default());
		shutdown.cancel();
		task.await.unwrap();

		let err = handle.add(NotificationSpec::info("late", "")).await.unwrap_err();
		assert_eq!(err, ServiceError::Closed);
	}
}
