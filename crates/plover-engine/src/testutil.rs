//! In-memory collaborators for engine tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use plover_core::{Birthday, ChannelId, GuildId, Privacy, UserId};

use crate::directory::{BoxFuture, UserDirectory};
use crate::error::{DeliveryError, DirectoryError, DirectoryResult};
use crate::gateway::{Channel, Guild, Member, MessagingGateway};

/// One stored user row.
#[derive(Debug, Clone, Default)]
pub struct UserRecord {
    pub birthday: Option<Birthday>,
    pub timezone: Option<String>,
    pub privacy_timezone: Privacy,
    pub privacy_birthday: Privacy,
    pub privacy_name: Privacy,
    pub privacy_age: Privacy,
    pub preferred_name: Option<String>,
    pub age: Option<i32>,
    pub last_notification: Option<DateTime<Utc>>,
}

/// In-memory [`UserDirectory`].
#[derive(Default)]
pub struct FakeDirectory {
    users: Mutex<HashMap<UserId, UserRecord>>,
    channels: Mutex<HashMap<GuildId, ChannelId>>,
    failing_users: Mutex<HashSet<UserId>>,
    fail_all: Mutex<bool>,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, user: UserId, record: UserRecord) {
        self.users.lock().unwrap().insert(user, record);
    }

    pub fn set_guild_channel(&self, guild: GuildId, channel: ChannelId) {
        self.channels.lock().unwrap().insert(guild, channel);
    }

    /// Makes every directory call for `user` fail.
    pub fn fail_user(&self, user: UserId) {
        self.failing_users.lock().unwrap().insert(user);
    }

    /// Makes every directory call fail.
    pub fn set_fail_all(&self, fail: bool) {
        *self.fail_all.lock().unwrap() = fail;
    }

    pub fn last_notification(&self, user: UserId) -> Option<DateTime<Utc>> {
        self.users
            .lock()
            .unwrap()
            .get(&user)
            .and_then(|record| record.last_notification)
    }

    fn check(&self, user: UserId) -> DirectoryResult<()> {
        if *self.fail_all.lock().unwrap() || self.failing_users.lock().unwrap().contains(&user) {
            return Err(DirectoryError::new("simulated directory failure"));
        }
        Ok(())
    }

    fn with_user<T>(
        &self,
        user: UserId,
        f: impl FnOnce(&UserRecord) -> T,
    ) -> DirectoryResult<T>
    where
        T: Default,
    {
        self.check(user)?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .get(&user)
            .map(f)
            .unwrap_or_default())
    }
}

fn occurs_in_range(birthday: &Birthday, from: NaiveDate, to: NaiveDate) -> bool {
    let mut year = from.year();
    while year <= to.year() {
        let date = birthday.date_in_year(year);
        if date >= from && date <= to {
            return true;
        }
        year += 1;
    }
    false
}

impl UserDirectory for FakeDirectory {
    fn get_birthday(&self, user: UserId) -> BoxFuture<'_, DirectoryResult<Option<Birthday>>> {
        Box::pin(async move { self.with_user(user, |record| record.birthday) })
    }

    fn get_birthdays_in_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        max_last_notification: Option<DateTime<Utc>>,
    ) -> BoxFuture<'_, DirectoryResult<Vec<(UserId, Birthday)>>> {
        Box::pin(async move {
            if *self.fail_all.lock().unwrap() {
                return Err(DirectoryError::new("simulated directory failure"));
            }
            let users = self.users.lock().unwrap();
            let mut out: Vec<(UserId, Birthday)> = users
                .iter()
                .filter_map(|(&user, record)| {
                    let birthday = record.birthday?;
                    if !occurs_in_range(&birthday, from, to) {
                        return None;
                    }
                    if let Some(max) = max_last_notification
                        && record.last_notification.is_some_and(|at| at > max)
                    {
                        return None;
                    }
                    Some((user, birthday))
                })
                .collect();
            out.sort_by_key(|(user, _)| *user);
            Ok(out)
        })
    }

    fn get_timezone(&self, user: UserId) -> BoxFuture<'_, DirectoryResult<Option<String>>> {
        Box::pin(async move { self.with_user(user, |record| record.timezone.clone()) })
    }

    fn get_privacy_timezone(&self, user: UserId) -> BoxFuture<'_, DirectoryResult<Privacy>> {
        Box::pin(async move { self.with_user(user, |record| record.privacy_timezone) })
    }

    fn get_privacy_birthday(&self, user: UserId) -> BoxFuture<'_, DirectoryResult<Privacy>> {
        Box::pin(async move { self.with_user(user, |record| record.privacy_birthday) })
    }

    fn get_privacy_name(&self, user: UserId) -> BoxFuture<'_, DirectoryResult<Privacy>> {
        Box::pin(async move { self.with_user(user, |record| record.privacy_name) })
    }

    fn get_privacy_age(&self, user: UserId) -> BoxFuture<'_, DirectoryResult<Privacy>> {
        Box::pin(async move { self.with_user(user, |record| record.privacy_age) })
    }

    fn get_preferred_name(&self, user: UserId) -> BoxFuture<'_, DirectoryResult<Option<String>>> {
        Box::pin(async move { self.with_user(user, |record| record.preferred_name.clone()) })
    }

    fn get_age(&self, user: UserId) -> BoxFuture<'_, DirectoryResult<Option<i32>>> {
        Box::pin(async move { self.with_user(user, |record| record.age) })
    }

    fn get_guild_birthday_channel(
        &self,
        guild: GuildId,
    ) -> BoxFuture<'_, DirectoryResult<Option<ChannelId>>> {
        Box::pin(async move { Ok(self.channels.lock().unwrap().get(&guild).copied()) })
    }

    fn set_last_birthday_notification(
        &self,
        user: UserId,
        at: DateTime<Utc>,
    ) -> BoxFuture<'_, DirectoryResult<()>> {
        Box::pin(async move {
            self.check(user)?;
            self.users
                .lock()
                .unwrap()
                .entry(user)
                .or_default()
                .last_notification = Some(at);
            Ok(())
        })
    }
}

/// In-memory [`MessagingGateway`] recording every sent message.
#[derive(Default)]
pub struct FakeGateway {
    mutuals: Mutex<HashMap<UserId, Vec<Guild>>>,
    members: Mutex<HashMap<(GuildId, UserId), Member>>,
    channels: Mutex<HashSet<ChannelId>>,
    failing_channels: Mutex<HashSet<ChannelId>>,
    sent: Mutex<Vec<(ChannelId, String)>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `user` as a member of `guild` and marks the guild mutual.
    pub fn add_member(&self, guild: &Guild, user: UserId, display_name: &str) {
        self.add_mutual_guild(guild, user);
        self.members
            .lock()
            .unwrap()
            .insert((guild.id, user), Member::new(user, display_name));
    }

    /// Marks `guild` as shared with `user` without membership; resolution
    /// will fail, mimicking a departure during the wait.
    pub fn add_mutual_guild(&self, guild: &Guild, user: UserId) {
        let mut mutuals = self.mutuals.lock().unwrap();
        let guilds = mutuals.entry(user).or_default();
        if !guilds.iter().any(|g| g.id == guild.id) {
            guilds.push(guild.clone());
        }
    }

    pub fn add_channel(&self, channel: ChannelId) {
        self.channels.lock().unwrap().insert(channel);
    }

    /// Makes sends to `channel` fail with a delivery error.
    pub fn fail_channel(&self, channel: ChannelId) {
        self.failing_channels.lock().unwrap().insert(channel);
    }

    pub fn sent_messages(&self) -> Vec<(ChannelId, String)> {
        self.sent.lock().unwrap().clone()
    }
}

impl MessagingGateway for FakeGateway {
    fn mutual_guilds(&self, user: UserId) -> BoxFuture<'_, Vec<Guild>> {
        Box::pin(async move {
            self.mutuals
                .lock()
                .unwrap()
                .get(&user)
                .cloned()
                .unwrap_or_default()
        })
    }

    fn resolve_member(&self, guild: GuildId, user: UserId) -> BoxFuture<'_, Option<Member>> {
        Box::pin(async move { self.members.lock().unwrap().get(&(guild, user)).cloned() })
    }

    fn resolve_channel(&self, channel: ChannelId) -> BoxFuture<'_, Option<Channel>> {
        Box::pin(async move {
            self.channels
                .lock()
                .unwrap()
                .contains(&channel)
                .then_some(Channel { id: channel })
        })
    }

    fn send<'a>(
        &'a self,
        channel: ChannelId,
        text: &'a str,
    ) -> BoxFuture<'a, Result<(), DeliveryError>> {
        Box::pin(async move {
            if self.failing_channels.lock().unwrap().contains(&channel) {
                return Err(DeliveryError::new(channel, "simulated delivery failure"));
            }
            self.sent.lock().unwrap().push((channel, text.to_string()));
            Ok(())
        })
    }
}
