//! Birthday scheduling decisions.
//!
//! The scheduler decides, for one user at a time, whether and when a
//! birthday notification should fire, and installs the delayed send through
//! the task registry. It also exposes the batch pass the rescan loop drives,
//! the change hook the profile-editing layer calls, and the read-only
//! past/upcoming query for display commands.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use plover_core::{Birthday, NotificationWindow, UserId, resolve_timezone};

use crate::config::EngineConfig;
use crate::directory::UserDirectory;
use crate::error::EngineResult;
use crate::gateway::MessagingGateway;
use crate::registry::TaskRegistry;
use crate::sender::NotificationSender;

/// The birthday scheduling engine.
pub struct BirthdayScheduler {
    directory: Arc<dyn UserDirectory>,
    registry: Arc<TaskRegistry>,
    sender: NotificationSender,
    config: EngineConfig,
}

impl BirthdayScheduler {
    /// Creates a scheduler over the given collaborators.
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        gateway: Arc<dyn MessagingGateway>,
        config: EngineConfig,
    ) -> Self {
        let sender = NotificationSender::new(Arc::clone(&directory), gateway, &config);
        Self {
            directory,
            registry: Arc::new(TaskRegistry::new()),
            sender,
            config,
        }
    }

    /// The registry of in-flight notification tasks.
    pub fn registry(&self) -> &Arc<TaskRegistry> {
        &self.registry
    }

    /// The engine configuration, for hosts that need the default day
    /// ranges or the rescan interval.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Schedules a task that wishes `user` a happy birthday at midnight in
    /// their effective timezone, if that midnight is within the next 24
    /// hours or has already passed today. Returns whether a task was
    /// scheduled.
    ///
    /// `now` is threaded explicitly so that a batch of users scanned
    /// together is evaluated against one consistent timestamp; two users
    /// near a day boundary must not see different "current times" within
    /// the same pass.
    pub async fn schedule_birthday(
        &self,
        user: UserId,
        birthday: Birthday,
        now: DateTime<Utc>,
    ) -> EngineResult<bool> {
        // A task may already exist if the user edited their timezone or
        // privacy while scheduled; the newest intent wins.
        self.registry.cancel(user);

        // The stored timezone is only consulted when publicly disclosed.
        // UTC is the safe default even though it may skew the fire instant.
        let stored_tz = if self
            .directory
            .get_privacy_timezone(user)
            .await?
            .is_public()
        {
            self.directory.get_timezone(user).await?
        } else {
            None
        };
        let tz = resolve_timezone(stored_tz.as_deref());

        let window = NotificationWindow::compute(&birthday, tz, now);
        if window.is_within_next_day() || window.missed_but_still_today(tz, now) {
            debug!(
                user = %user,
                fire_at = %window.fire_at,
                delta_secs = window.delta.num_seconds(),
                "Scheduling birthday notification"
            );
            let sender = self.sender.clone();
            self.registry.schedule(user, async move {
                sender.send_birthday_message(user, window.delta).await
            });
            return Ok(true);
        }

        Ok(false)
    }

    /// One rescan pass: finds users whose birthday falls on yesterday,
    /// today or tomorrow (UTC) and who have not been notified within the
    /// last 24 hours, then tries to schedule each of them against a single
    /// shared `now`. Returns how many were newly scheduled.
    ///
    /// The three-day window exists because "today" in UTC stretches across
    /// up to three local dates once every timezone is taken into account.
    /// A failure for one user is logged and never aborts the rest of the
    /// batch.
    pub async fn schedule_todays_birthdays(&self, now: DateTime<Utc>) -> EngineResult<usize> {
        let today = now.date_naive();
        let yesterday = today.pred_opt().expect("valid predecessor date");
        let tomorrow = today.succ_opt().expect("valid successor date");

        let candidates = self
            .directory
            .get_birthdays_in_range(yesterday, tomorrow, Some(now - Duration::hours(24)))
            .await?;

        let mut scheduled = 0;
        for (user, birthday) in candidates {
            match self.schedule_birthday(user, birthday, now).await {
                Ok(true) => scheduled += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!(
                        user = %user,
                        error = %e,
                        "Failed to schedule birthday, skipping user this pass"
                    );
                }
            }
        }
        info!(scheduled, "Birthday rescan pass complete");
        Ok(scheduled)
    }

    /// Past and upcoming birthdays around `now`, each sorted by proximity
    /// to today. Used by display commands, which pass the day ranges per
    /// call; [`EngineConfig`] carries the usual defaults. Unlike scheduling,
    /// a data-unavailable error propagates to the caller.
    pub async fn get_past_upcoming_birthdays(
        &self,
        past_days: u32,
        upcoming_days: u32,
        now: DateTime<Utc>,
    ) -> EngineResult<(Vec<(UserId, Birthday)>, Vec<(UserId, Birthday)>)> {
        let today = now.date_naive();
        let past_start = today - Duration::days(past_days as i64);
        let upcoming_start = today.succ_opt().expect("valid successor date");
        let upcoming_end = today + Duration::days(upcoming_days as i64);

        let mut past = self
            .directory
            .get_birthdays_in_range(past_start, today, None)
            .await?;
        let mut upcoming = self
            .directory
            .get_birthdays_in_range(upcoming_start, upcoming_end, None)
            .await?;

        past.sort_by_key(|(_, birthday)| birthday.days_since(today));
        upcoming.sort_by_key(|(_, birthday)| birthday.days_until(today));
        Ok((past, upcoming))
    }

    /// Re-evaluates scheduling for one user. To be called whenever their
    /// birthday, timezone, or the privacy of either changes.
    ///
    /// A missing or private birthday must never be acted upon: any pending
    /// task is cancelled and nothing is rescheduled.
    pub async fn notify_change(&self, user: UserId) -> EngineResult<()> {
        let birthday = self.directory.get_birthday(user).await?;
        let privacy = self.directory.get_privacy_birthday(user).await?;

        let Some(birthday) = birthday else {
            self.registry.cancel(user);
            return Ok(());
        };
        if !privacy.is_public() {
            self.registry.cancel(user);
            return Ok(());
        }

        self.schedule_birthday(user, birthday, Utc::now()).await?;
        Ok(())
    }
}
