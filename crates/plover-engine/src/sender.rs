//! The scheduled unit of work: wait, compose, deliver, record.
//!
//! A sender task sleeps until the user's local midnight, then delivers the
//! birthday message to every eligible shared guild and records the "last
//! notified" timestamp. Eligibility was decided at schedule time; this stage
//! only re-reads privacy to decide which fields get disclosed in the message.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use tracing::{debug, info, warn};

use plover_core::{UserId, choose_template, format_birthday_message};

use crate::config::EngineConfig;
use crate::directory::UserDirectory;
use crate::error::EngineResult;
use crate::gateway::MessagingGateway;

/// Composes and delivers one user's birthday notifications.
#[derive(Clone)]
pub struct NotificationSender {
    directory: Arc<dyn UserDirectory>,
    gateway: Arc<dyn MessagingGateway>,
    templates_no_age: Arc<Vec<String>>,
    templates_with_age: Arc<Vec<String>>,
}

impl NotificationSender {
    /// Creates a sender over the given collaborators, taking its template
    /// pools from the engine config.
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        gateway: Arc<dyn MessagingGateway>,
        config: &EngineConfig,
    ) -> Self {
        Self {
            directory,
            gateway,
            templates_no_age: Arc::new(config.templates_no_age.clone()),
            templates_with_age: Arc::new(config.templates_with_age.clone()),
        }
    }

    /// Waits `delta` and then sends the user's birthday message in all
    /// guilds they share with the bot.
    ///
    /// A negative `delta` (midnight already passed but it is still the
    /// user's birthday) sends immediately. After attempting every guild the
    /// notification time is recorded even if zero guilds were eligible, so
    /// the next rescan does not re-schedule the same occurrence. Aborting
    /// the task mid-sleep performs none of this.
    pub async fn send_birthday_message(&self, user: UserId, delta: Duration) -> EngineResult<()> {
        let wait = delta.to_std().unwrap_or(StdDuration::ZERO);
        info!(user = %user, wait_secs = wait.as_secs(), "Waiting to send birthday message");
        tokio::time::sleep(wait).await;

        info!(user = %user, "Sending birthday notifications");

        // Privacy may have changed during the wait; re-read before disclosing
        let preferred_name = if self.directory.get_privacy_name(user).await?.is_public() {
            self.directory.get_preferred_name(user).await?
        } else {
            None
        };
        let age = if self.directory.get_privacy_age(user).await?.is_public() {
            self.directory.get_age(user).await?
        } else {
            None
        };

        for guild in self.gateway.mutual_guilds(user).await {
            let Some(member) = self.gateway.resolve_member(guild.id, user).await else {
                debug!(
                    user = %user,
                    guild = %guild.id,
                    "User is not a resolvable member of guild, skipping"
                );
                continue;
            };
            let Some(channel_id) = self.directory.get_guild_birthday_channel(guild.id).await?
            else {
                continue;
            };
            let Some(channel) = self.gateway.resolve_channel(channel_id).await else {
                debug!(
                    guild = %guild.id,
                    channel = %channel_id,
                    "Configured birthday channel does not resolve, skipping"
                );
                continue;
            };

            let name = preferred_name.as_deref().unwrap_or(&member.display_name);
            let Some(template) = choose_template(
                &self.templates_no_age,
                &self.templates_with_age,
                age.is_some(),
            ) else {
                warn!("No birthday message templates configured");
                break;
            };
            let text = format_birthday_message(template, user, name, age);
            if let Err(e) = self.gateway.send(channel.id, &text).await {
                // Other guilds still get their message
                warn!(
                    user = %user,
                    guild = %guild.id,
                    error = %e,
                    "Failed to deliver birthday message"
                );
            }
        }

        self.directory
            .set_last_birthday_notification(user, Utc::now())
            .await?;
        Ok(())
    }
}
