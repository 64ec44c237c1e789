//! UserDirectory trait definition.
//!
//! The engine reads user birthdays, privacy flags and per-guild notification
//! configuration through this trait, and writes back the "last notified"
//! timestamp. Implementations are the persistence layer (a database, an ORM,
//! a remote service); the engine never caches results across calls.

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, NaiveDate, Utc};
use plover_core::{Birthday, ChannelId, GuildId, Privacy, UserId};

use crate::error::DirectoryResult;

/// A boxed future for async trait methods.
///
/// Boxing keeps the trait object-safe so the engine can hold collaborators
/// as `Arc<dyn UserDirectory>`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// The persistence boundary for per-user birthday state.
///
/// Every method may suspend the caller; a returned error is the engine's
/// data-unavailable condition and results in the affected user being skipped
/// until the next rescan.
pub trait UserDirectory: Send + Sync {
    /// The user's stored birthday, if any.
    fn get_birthday(&self, user: UserId) -> BoxFuture<'_, DirectoryResult<Option<Birthday>>>;

    /// Users whose birthday (month/day) falls between `from` and `to`
    /// inclusive, wrapping across the new year when `from > to`.
    ///
    /// When `max_last_notification` is given, users already notified after
    /// that instant are filtered out; this is what keeps overlapping rescans
    /// from double-firing.
    fn get_birthdays_in_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        max_last_notification: Option<DateTime<Utc>>,
    ) -> BoxFuture<'_, DirectoryResult<Vec<(UserId, Birthday)>>>;

    /// The user's stored IANA timezone identifier, unvalidated.
    fn get_timezone(&self, user: UserId) -> BoxFuture<'_, DirectoryResult<Option<String>>>;

    /// Privacy of the user's timezone field.
    fn get_privacy_timezone(&self, user: UserId) -> BoxFuture<'_, DirectoryResult<Privacy>>;

    /// Privacy of the user's birthday field.
    fn get_privacy_birthday(&self, user: UserId) -> BoxFuture<'_, DirectoryResult<Privacy>>;

    /// Privacy of the user's preferred name.
    fn get_privacy_name(&self, user: UserId) -> BoxFuture<'_, DirectoryResult<Privacy>>;

    /// Privacy of the user's age.
    fn get_privacy_age(&self, user: UserId) -> BoxFuture<'_, DirectoryResult<Privacy>>;

    /// The user's preferred name, if set.
    fn get_preferred_name(&self, user: UserId) -> BoxFuture<'_, DirectoryResult<Option<String>>>;

    /// The user's current age, if their birth year is known.
    fn get_age(&self, user: UserId) -> BoxFuture<'_, DirectoryResult<Option<i32>>>;

    /// The channel configured for birthday announcements in a guild, if any.
    fn get_guild_birthday_channel(
        &self,
        guild: GuildId,
    ) -> BoxFuture<'_, DirectoryResult<Option<ChannelId>>>;

    /// Records when the user was last notified, stopping the next rescan
    /// from re-scheduling the same occurrence.
    fn set_last_birthday_notification(
        &self,
        user: UserId,
        at: DateTime<Utc>,
    ) -> BoxFuture<'_, DirectoryResult<()>>;
}
