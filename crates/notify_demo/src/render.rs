//! Text renderer standing in for the browser toast stack.

use chrono::Utc;
use crm_notify::{Kind, Notification, Snapshot};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Redraws the toast stack every time the live set changes.
pub async fn run(mut snapshots: watch::Receiver<Snapshot>, shutdown: CancellationToken) {
	loop {
		tokio::select! {
			_ = shutdown.cancelled() => return,
			changed = snapshots.changed() => {
				if changed.is_err() {
					return;
				}
				let snapshot = snapshots.borrow_and_update().clone();
				draw(&snapshot);
			}
		}
	}
}

fn draw(snapshot: &Snapshot) {
	let now = Utc::now();
	println!("── {} notification(s) ──", snapshot.len());
	for notification in snapshot.iter() {
		println!("{}", line(notification, now));
	}
}

fn line(n: &Notification, now: chrono::DateTime<Utc>) -> String {
	let badge = match n.kind() {
		Kind::Info => "i",
		Kind::Success => "✓",
		Kind::Warning => "!",
		Kind::Error => "✗",
	};
	let expiry = if n.auto_close() {
		format!(" [closes after {} ms]", n.duration().as_millis())
	} else {
		String::new()
	};
	format!("{badge} {} {}: {} ({}){expiry}", n.id(), n.title(), n.message(), n.time_ago(now))
}
