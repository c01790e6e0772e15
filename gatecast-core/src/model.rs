//! Entities carried by gateway events and kept by the entity cache.
//!
//! Only the fields the dispatcher and typical handlers rely on are modeled.

use std::fmt;

macro_rules! ids {
    ($($(#[$meta:meta])* $name:ident),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
            pub struct $name(pub u64);

            impl $name {
                /// Wrap a raw snowflake.
                pub const fn new(id: u64) -> Self {
                    Self(id)
                }

                /// The raw snowflake.
                pub const fn get(self) -> u64 {
                    self.0
                }
            }

            impl From<u64> for $name {
                fn from(id: u64) -> Self {
                    Self(id)
                }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    fmt::Display::fmt(&self.0, f)
                }
            }
        )+
    };
}

ids! {
    /// Identifies a guild.
    GuildId,
    /// Identifies a channel.
    ChannelId,
    /// Identifies a user.
    UserId,
    /// Identifies a message.
    MessageId,
    /// Identifies a role.
    RoleId,
    /// Identifies a custom emoji.
    EmojiId,
    /// Identifies an interaction or application command.
    InteractionId,
}

/// A user account.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub bot: bool,
}

/// A guild as announced by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Guild {
    pub id: GuildId,
    pub name: String,
    pub owner_id: UserId,
    pub member_count: u64,
}

/// A guild stub sent in Ready before the full guild is streamed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UnavailableGuild {
    pub id: GuildId,
    /// Set when the guild is unavailable because of an outage.
    pub unavailable: bool,
}

/// The type of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelKind {
    #[default]
    GuildText,
    DirectMessage,
    GuildVoice,
    GroupDirectMessage,
    GuildCategory,
    GuildNews,
}

/// A guild or private channel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Channel {
    pub id: ChannelId,
    pub guild_id: Option<GuildId>,
    pub kind: ChannelKind,
    pub name: String,
    pub topic: Option<String>,
}

/// A guild member.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Member {
    pub user: User,
    pub nick: Option<String>,
    pub roles: Vec<RoleId>,
}

/// A chat message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Message {
    pub id: MessageId,
    pub channel_id: ChannelId,
    pub guild_id: Option<GuildId>,
    pub author: User,
    pub content: String,
}

/// A guild role.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub color: u32,
    pub position: i64,
}

/// An emoji, custom (with id) or unicode (without).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Emoji {
    pub id: Option<EmojiId>,
    pub name: String,
    pub animated: bool,
}

/// Online status of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    Online,
    Idle,
    DoNotDisturb,
    Invisible,
    #[default]
    Offline,
}

/// The presence of a user in a guild.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Presence {
    pub user: User,
    pub guild_id: GuildId,
    pub status: Status,
}

/// A voice connection state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VoiceState {
    pub guild_id: Option<GuildId>,
    pub channel_id: Option<ChannelId>,
    pub user_id: UserId,
    pub session_id: String,
}

/// The type of a relationship between two users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RelationshipKind {
    #[default]
    Friend,
    Blocked,
    IncomingRequest,
    OutgoingRequest,
}

/// A relationship of the current user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Relationship {
    pub user: User,
    pub kind: RelationshipKind,
}

/// A gateway session of the current user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    pub session_id: String,
    pub status: Status,
}
