//! Daily rescan loop.
//!
//! The periodic driver that re-derives which users need a birthday task
//! scheduled. It runs one pass immediately at startup and then on a fixed
//! interval; a failing pass is logged and the loop simply waits for its
//! next tick. There is no durable queue: after a restart this loop plus the
//! persisted "last notified" timestamps are what re-derives the state.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, error, info};

use crate::scheduler::BirthdayScheduler;

/// Commands that can be sent to the rescan loop.
#[derive(Debug, Clone)]
pub enum RescanCommand {
    /// Trigger an immediate rescan pass.
    RescanNow,
    /// Stop the loop.
    Stop,
}

/// Rescan loop state.
#[derive(Debug, Clone, Default)]
pub struct RescanState {
    /// When the last pass ran.
    pub last_pass: Option<DateTime<Utc>>,
    /// How many birthdays the last successful pass scheduled.
    pub last_scheduled: usize,
    /// Error message from the last pass, if it failed.
    pub last_error: Option<String>,
}

/// Shared rescan loop state.
pub type SharedRescanState = Arc<RwLock<RescanState>>;

/// The rescan loop drives periodic birthday scheduling passes.
pub struct RescanLoop {
    scheduler: Arc<BirthdayScheduler>,
    interval: Duration,
    state: SharedRescanState,
    command_tx: mpsc::Sender<RescanCommand>,
    command_rx: mpsc::Receiver<RescanCommand>,
}

impl RescanLoop {
    /// Creates a rescan loop over the given scheduler.
    pub fn new(scheduler: Arc<BirthdayScheduler>, interval: Duration) -> Self {
        let (command_tx, command_rx) = mpsc::channel(16);
        Self {
            scheduler,
            interval,
            state: Arc::default(),
            command_tx,
            command_rx,
        }
    }

    /// Returns a handle for sending commands to the loop.
    pub fn handle(&self) -> RescanHandle {
        RescanHandle {
            command_tx: self.command_tx.clone(),
            state: self.state.clone(),
        }
    }

    /// Returns the shared state.
    pub fn state(&self) -> SharedRescanState {
        self.state.clone()
    }

    /// Runs the loop until stopped, performing an initial pass immediately.
    pub async fn run(mut self) {
        info!(
            interval_secs = self.interval.as_secs(),
            "Birthday rescan loop started"
        );

        self.do_pass().await;

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {
                    self.do_pass().await;
                }
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(RescanCommand::RescanNow) => {
                            debug!("Received RescanNow command");
                            self.do_pass().await;
                        }
                        Some(RescanCommand::Stop) | None => {
                            info!("Rescan loop stopping");
                            break;
                        }
                    }
                }
            }
        }
    }

    async fn do_pass(&self) {
        let now = Utc::now();
        match self.scheduler.schedule_todays_birthdays(now).await {
            Ok(scheduled) => {
                let mut state = self.state.write().await;
                state.last_pass = Some(now);
                state.last_scheduled = scheduled;
                state.last_error = None;
            }
            Err(e) => {
                // The driver itself never dies over one failed pass
                error!(error = %e, "Birthday rescan pass failed");
                let mut state = self.state.write().await;
                state.last_pass = Some(now);
                state.last_error = Some(e.to_string());
            }
        }
    }
}

/// Handle for sending commands to a running rescan loop.
#[derive(Clone, Debug)]
pub struct RescanHandle {
    command_tx: mpsc::Sender<RescanCommand>,
    state: SharedRescanState,
}

impl RescanHandle {
    /// Triggers an immediate rescan pass.
    pub async fn rescan_now(&self) -> Result<(), mpsc::error::SendError<RescanCommand>> {
        self.command_tx.send(RescanCommand::RescanNow).await
    }

    /// Stops the loop.
    pub async fn stop(&self) -> Result<(), mpsc::error::SendError<RescanCommand>> {
        self.command_tx.send(RescanCommand::Stop).await
    }

    /// Returns the current loop state.
    pub async fn state(&self) -> RescanState {
        self.state.read().await.clone()
    }
}
