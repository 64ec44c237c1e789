//! Birthday scheduling engine.
//!
//! This crate decides, for every user with a known birthday, whether and
//! when to fire a birthday notification:
//! - One in-flight delayed task per user, cancel-and-replace semantics
//! - Notifications at local midnight in the user's own timezone
//! - A daily rescan that re-derives state from persisted data
//! - A change hook for immediate rescheduling when user data changes
//!
//! The persistence layer and the chat platform are consumed through the
//! [`UserDirectory`] and [`MessagingGateway`] traits; the engine is a
//! library with no wire surface of its own.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use plover_engine::{BirthdayScheduler, EngineConfig, RescanLoop};
//!
//! let config = EngineConfig::default();
//! let interval = config.rescan_interval;
//! let scheduler = Arc::new(BirthdayScheduler::new(directory, gateway, config));
//! let rescan = RescanLoop::new(Arc::clone(&scheduler), interval);
//! let handle = rescan.handle();
//! tokio::spawn(rescan.run());
//! ```

mod config;
mod directory;
mod error;
mod gateway;
mod registry;
mod rescan;
mod scheduler;
mod sender;

#[cfg(test)]
mod testutil;

pub use config::EngineConfig;
pub use directory::{BoxFuture, UserDirectory};
pub use error::{DeliveryError, DirectoryError, DirectoryResult, EngineError, EngineResult};
pub use gateway::{Channel, Guild, Member, MessagingGateway};
pub use registry::TaskRegistry;
pub use rescan::{RescanCommand, RescanHandle, RescanLoop, RescanState, SharedRescanState};
pub use scheduler::BirthdayScheduler;
pub use sender::NotificationSender;
