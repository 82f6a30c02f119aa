//! Notification host demo.
//!
//! Builds the single notification service at startup, hands its handle to a
//! simulated API client and to a text renderer, and runs until every toast
//! has been dismissed or has expired.

mod render;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crm_notify::{NotificationHandle, NotificationService, NotificationSpec, NotifyConfig};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "crm-notify-demo")]
#[command(about = "Drive the CRM notification queue through a scripted session")]
struct Args {
	/// TOML file with `max-notifications` and `default-duration-ms`
	#[arg(short, long, value_name = "PATH")]
	config: Option<PathBuf>,

	/// Override the live-set capacity
	#[arg(short, long, value_name = "N")]
	max_notifications: Option<usize>,

	/// Number of failed saves the simulated API client reports
	#[arg(long, default_value_t = 3)]
	failures: usize,

	/// Verbose logging
	#[arg(short, long)]
	verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();
	setup_tracing(args.verbose);

	let mut config = match &args.config {
		Some(path) => NotifyConfig::load(path).with_context(|| format!("loading {}", path.display()))?,
		None => NotifyConfig::default(),
	};
	if let Some(max) = args.max_notifications {
		config = config.with_max_notifications(max);
	}
	config.validate()?;
	info!(max = config.max_notifications, default_ms = config.default_duration.as_millis() as u64, "config loaded");

	let (service, handle) = NotificationService::new(config)?;
	let shutdown = CancellationToken::new();
	let service_task = tokio::spawn(service.run(shutdown.clone()));
	let render_task = tokio::spawn(render::run(handle.subscribe(), shutdown.clone()));

	simulate_api_client(&handle, args.failures).await?;
	wait_until_empty(&handle).await;

	shutdown.cancel();
	render_task.await?;
	let manager = service_task.await?;
	info!(live = manager.len(), revision = manager.revision(), "session finished");
	Ok(())
}

/// Plays the part of the HTTP client: a login, a few failed contact saves,
/// and a report export.
async fn simulate_api_client(handle: &NotificationHandle, failures: usize) -> anyhow::Result<()> {
	handle
		.add(NotificationSpec::success("Signed in", "Welcome back").close_after(Duration::from_millis(1500)))
		.await?;

	for attempt in 1..=failures {
		tokio::time::sleep(Duration::from_millis(200)).await;
		let spec = NotificationSpec::error("Save failed", format!("Contact could not be saved (attempt {attempt})"))
			.close_after(Duration::from_millis(800 + 200 * attempt as u64));
		handle.add(spec).await?;
	}

	let pinned = handle
		.add(NotificationSpec::warning("Session expiring", "Your session ends in 5 minutes"))
		.await?;

	handle
		.add(NotificationSpec::info("Report ready", "Q3 pipeline export finished").auto_close(true))
		.await?;

	tokio::time::sleep(Duration::from_millis(1000)).await;
	if !handle.remove(pinned).await? {
		warn!(id = %pinned, "pinned notification already gone");
	}
	Ok(())
}

async fn wait_until_empty(handle: &NotificationHandle) {
	let mut rx = handle.subscribe();
	while !rx.borrow_and_update().is_empty() {
		if rx.changed().await.is_err() {
			break;
		}
	}
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("crm_notify=debug,info")
		} else {
			EnvFilter::new("info")
		}
	});

	tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();
}
