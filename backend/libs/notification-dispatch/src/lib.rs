//! # Notification Dispatch
//!
//! Turns board mutations into notification events and delivers them to the
//! internal notification service, best-effort and off the request path.
//!
//! ## Modules
//! - `event`: the notification event catalogue and wire format
//! - `diff`: before/after snapshot diffing (pure, synchronous)
//! - `client`: `NotificationSink` trait and its HTTP / no-op implementations
//! - `dispatcher`: detached delivery with its own deadline
//! - `config`: immutable startup configuration
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use notification_dispatch::{
//!     AppliedChanges, BoardContext, BoardMutation, BoardSnapshot, HttpNotificationClient,
//!     NotificationConfig, NotificationDispatcher,
//! };
//! use uuid::Uuid;
//!
//! # fn run() -> anyhow::Result<()> {
//! let config = NotificationConfig::from_env()?;
//! let sink = Arc::new(HttpNotificationClient::new(reqwest::Client::new(), &config));
//! let dispatcher = NotificationDispatcher::new(sink, config.timeout);
//!
//! let mutation = BoardMutation {
//!     actor_id: Uuid::new_v4(),
//!     before: BoardSnapshot::default(),
//!     after: BoardSnapshot::new(Some(Uuid::new_v4()), vec![]),
//!     changes: AppliedChanges { assignee: true, participants: false },
//!     context: BoardContext::new(Uuid::new_v4(), Uuid::new_v4(), "Sprint board", "Apollo"),
//! };
//! let _handle = dispatcher.spawn_board_mutation(mutation);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod diff;
pub mod dispatcher;
pub mod event;

pub use client::{
    HttpNotificationClient, NoopNotificationSink, NotificationError, NotificationSink,
    MAX_BULK_NOTIFICATIONS,
};
pub use config::NotificationConfig;
pub use diff::{diff_board_mutation, AppliedChanges, BoardSnapshot};
pub use dispatcher::{BoardMutation, NotificationDispatcher};
pub use event::{BoardContext, NotificationEvent, NotificationType, ResourceType};
