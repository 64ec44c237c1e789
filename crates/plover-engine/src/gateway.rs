//! MessagingGateway trait definition.
//!
//! The chat-platform boundary: guild membership lookups and message
//! delivery. Resolution methods mirror a platform client's cache semantics
//! and report absence rather than failing; only [`MessagingGateway::send`]
//! can error.

use plover_core::{ChannelId, GuildId, UserId};

use crate::directory::BoxFuture;
use crate::error::DeliveryError;

/// A guild shared between a user and the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guild {
    /// The guild identifier.
    pub id: GuildId,
    /// Human-readable guild name.
    pub name: String,
}

impl Guild {
    /// Creates a guild handle.
    pub fn new(id: GuildId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// A user's membership in one guild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// The member's user identifier.
    pub user: UserId,
    /// The name the platform displays for this member in this guild.
    pub display_name: String,
}

impl Member {
    /// Creates a member handle.
    pub fn new(user: UserId, display_name: impl Into<String>) -> Self {
        Self {
            user,
            display_name: display_name.into(),
        }
    }
}

/// A resolvable text channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Channel {
    /// The channel identifier.
    pub id: ChannelId,
}

/// The chat-platform boundary consumed by the notification sender.
pub trait MessagingGateway: Send + Sync {
    /// Guilds the user shares with the bot.
    fn mutual_guilds(&self, user: UserId) -> BoxFuture<'_, Vec<Guild>>;

    /// Resolves the user's membership in a guild. Absence means the user
    /// left (or was never there), not an error.
    fn resolve_member(&self, guild: GuildId, user: UserId) -> BoxFuture<'_, Option<Member>>;

    /// Resolves a channel by id. Absence means the configured channel no
    /// longer exists or is not visible to the bot.
    fn resolve_channel(&self, channel: ChannelId) -> BoxFuture<'_, Option<Channel>>;

    /// Delivers a text message to a channel.
    fn send<'a>(
        &'a self,
        channel: ChannelId,
        text: &'a str,
    ) -> BoxFuture<'a, Result<(), DeliveryError>>;
}
