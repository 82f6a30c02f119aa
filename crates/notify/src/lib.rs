//! Notification lifecycle core for the CRM frontend.
//!
//! Owns the live set of toasts shown to the user: identity assignment,
//! FIFO eviction at a fixed capacity, and timed self-expiry.
//!
//! The [`NotificationManager`] is a plain single-owner object. Timers reach it
//! through the [`Scheduler`] capability, so the same manager runs on a tokio
//! event loop ([`TokioScheduler`]) or on a virtual clock in tests
//! ([`ManualScheduler`]). Applications that live on tokio normally construct
//! a [`NotificationService`] once at startup and hand clones of its
//! [`NotificationHandle`] to producers and renderers.

pub mod clock;
pub mod config;
pub mod error;
pub mod manager;
pub mod notification;
pub mod scheduler;
pub mod service;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::NotifyConfig;
pub use error::{ConfigError, NotifyError, ServiceError};
pub use manager::NotificationManager;
pub use notification::{Kind, Notification, NotificationId, NotificationSpec, Snapshot};
pub use scheduler::{ExpiryReceiver, ManualScheduler, ManualTimer, Scheduler, Timer, TokioScheduler, TokioTimer};
pub use service::{NotificationHandle, NotificationService};
