//! Read access to the entity cache.
//!
//! The dispatcher consults the cache to fill in the previous version of an
//! entity for update and delete events. Lookups are best effort: a miss
//! simply leaves the old value empty.

use crate::model::{
    Channel, ChannelId, Emoji, Guild, GuildId, Member, Message, MessageId, Presence, Role, RoleId,
    UserId,
};

/// A read-only view of the entity cache.
///
/// Every method defaults to a miss, so implementations only need to provide
/// the lookups they can answer.
pub trait Store: Send + Sync + 'static {
    /// Look up a channel.
    fn channel(&self, _id: ChannelId) -> Option<Channel> {
        None
    }

    /// Look up a guild.
    fn guild(&self, _id: GuildId) -> Option<Guild> {
        None
    }

    /// Look up a guild member.
    fn member(&self, _guild_id: GuildId, _user_id: UserId) -> Option<Member> {
        None
    }

    /// Look up a message.
    fn message(&self, _channel_id: ChannelId, _id: MessageId) -> Option<Message> {
        None
    }

    /// Look up a role.
    fn role(&self, _guild_id: GuildId, _id: RoleId) -> Option<Role> {
        None
    }

    /// Look up the presence of a user in a guild.
    fn presence(&self, _guild_id: GuildId, _user_id: UserId) -> Option<Presence> {
        None
    }

    /// Look up the emojis of a guild.
    fn emojis(&self, _guild_id: GuildId) -> Option<Vec<Emoji>> {
        None
    }
}

/// A store that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopStore;

impl Store for NoopStore {}

impl<T: Store + ?Sized> Store for std::sync::Arc<T> {
    fn channel(&self, id: ChannelId) -> Option<Channel> {
        (**self).channel(id)
    }

    fn guild(&self, id: GuildId) -> Option<Guild> {
        (**self).guild(id)
    }

    fn member(&self, guild_id: GuildId, user_id: UserId) -> Option<Member> {
        (**self).member(guild_id, user_id)
    }

    fn message(&self, channel_id: ChannelId, id: MessageId) -> Option<Message> {
        (**self).message(channel_id, id)
    }

    fn role(&self, guild_id: GuildId, id: RoleId) -> Option<Role> {
        (**self).role(guild_id, id)
    }

    fn presence(&self, guild_id: GuildId, user_id: UserId) -> Option<Presence> {
        (**self).presence(guild_id, user_id)
    }

    fn emojis(&self, guild_id: GuildId) -> Option<Vec<Emoji>> {
        (**self).emojis(guild_id)
    }
}
