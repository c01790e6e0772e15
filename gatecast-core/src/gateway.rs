//! Raw events as emitted by the gateway transport.
//!
//! The transport decodes frames into [`GatewayEvent`] values and feeds them
//! to the dispatcher through a channel. Decoding itself is not part of
//! gatecast.
//!
//! Events that are nothing but an entity are newtypes that dereference to
//! the entity, e.g. [`ChannelCreate`] derefs to [`Channel`].

use crate::{
    kind::EventKind,
    model::{
        Channel, ChannelId, Emoji, Guild, GuildId, InteractionId, Member, Message, MessageId,
        Presence, Relationship, Role, RoleId, Session, Status, UnavailableGuild, User, UserId,
        VoiceState,
    },
};
use std::{ops::Deref, time::Duration};

macro_rules! newtype_events {
    ($($(#[$meta:meta])* $name:ident($inner:ty);)+) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, PartialEq, Eq, Default)]
            pub struct $name(pub $inner);

            impl Deref for $name {
                type Target = $inner;

                fn deref(&self) -> &Self::Target {
                    &self.0
                }
            }
        )+
    };
}

newtype_events! {
    /// A channel was created.
    ChannelCreate(Channel);
    /// A channel was updated.
    ChannelUpdate(Channel);
    /// A channel was deleted.
    ChannelDelete(Channel);
    /// The current user joined a guild, or a guild became available.
    GuildCreate(Guild);
    /// A guild was updated.
    GuildUpdate(Guild);
    /// A message was sent.
    MessageCreate(Message);
    /// A message was edited.
    MessageUpdate(Message);
    /// A user's presence changed.
    PresenceUpdate(Presence);
    /// Presences were replaced in bulk.
    PresencesReplace(Vec<Presence>);
    /// The sessions of the current user changed.
    SessionsReplace(Vec<Session>);
    /// The current user was updated.
    UserUpdate(User);
    /// A relationship was added.
    RelationshipAdd(Relationship);
    /// A relationship was removed.
    RelationshipRemove(Relationship);
    /// A user's voice state changed.
    VoiceStateUpdate(VoiceState);
}

/// The first frame of a connection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Hello {
    pub heartbeat_interval: Duration,
}

/// A session was established.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ready {
    pub version: u8,
    pub user: User,
    pub session_id: String,
    /// The guilds of the current user. Each is followed by a
    /// [`GuildCreate`] once it has been streamed in.
    pub guilds: Vec<UnavailableGuild>,
}

/// Extra session data streamed after Ready.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReadySupplemental {
    pub merged_presences: Vec<Presence>,
}

/// A session was resumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resumed;

/// The session was invalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InvalidSession {
    pub resumable: bool,
}

/// The pins of a channel changed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChannelPinsUpdate {
    pub guild_id: Option<GuildId>,
    pub channel_id: ChannelId,
    /// Unix time of the latest pin in milliseconds.
    pub last_pin: Option<u64>,
}

/// The read state of a channel changed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChannelUnreadUpdate {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
    pub last_message_id: MessageId,
}

/// The current user left or lost a guild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GuildDelete {
    pub id: GuildId,
    /// Set when the guild went unavailable instead of being left.
    pub unavailable: bool,
}

/// A user was banned.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GuildBanAdd {
    pub guild_id: GuildId,
    pub user: User,
}

/// A user was unbanned.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GuildBanRemove {
    pub guild_id: GuildId,
    pub user: User,
}

/// The emojis of a guild changed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GuildEmojisUpdate {
    pub guild_id: GuildId,
    pub emojis: Vec<Emoji>,
}

/// The integrations of a guild changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GuildIntegrationsUpdate {
    pub guild_id: GuildId,
}

/// A user joined a guild.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GuildMemberAdd {
    pub guild_id: GuildId,
    pub member: Member,
}

/// A user left a guild.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GuildMemberRemove {
    pub guild_id: GuildId,
    pub user: User,
}

/// A guild member was updated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GuildMemberUpdate {
    pub guild_id: GuildId,
    pub user: User,
    pub nick: Option<String>,
    pub roles: Vec<RoleId>,
}

/// A chunk of members requested from the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GuildMembersChunk {
    pub guild_id: GuildId,
    pub members: Vec<Member>,
    pub chunk_index: u32,
    pub chunk_count: u32,
}

/// An update to a lazily loaded member list.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GuildMemberListUpdate {
    pub guild_id: GuildId,
    pub list_id: String,
    pub member_count: u64,
    pub online_count: u64,
}

/// A role was created.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GuildRoleCreate {
    pub guild_id: GuildId,
    pub role: Role,
}

/// A role was updated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GuildRoleUpdate {
    pub guild_id: GuildId,
    pub role: Role,
}

/// A role was deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GuildRoleDelete {
    pub guild_id: GuildId,
    pub role_id: RoleId,
}

/// An invite was created.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InviteCreate {
    pub code: String,
    pub channel_id: ChannelId,
    pub guild_id: Option<GuildId>,
    pub inviter: Option<User>,
}

/// An invite was deleted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InviteDelete {
    pub code: String,
    pub channel_id: ChannelId,
    pub guild_id: Option<GuildId>,
}

/// A message was deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageDelete {
    pub id: MessageId,
    pub channel_id: ChannelId,
    pub guild_id: Option<GuildId>,
}

/// Several messages were deleted at once.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageDeleteBulk {
    pub ids: Vec<MessageId>,
    pub channel_id: ChannelId,
    pub guild_id: Option<GuildId>,
}

/// A reaction was added to a message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageReactionAdd {
    pub user_id: UserId,
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub guild_id: Option<GuildId>,
    pub emoji: Emoji,
}

/// A reaction was removed from a message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageReactionRemove {
    pub user_id: UserId,
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub guild_id: Option<GuildId>,
    pub emoji: Emoji,
}

/// All reactions were removed from a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageReactionRemoveAll {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub guild_id: Option<GuildId>,
}

/// All reactions of one emoji were removed from a message.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MessageReactionRemoveEmoji {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub guild_id: Option<GuildId>,
    pub emoji: Emoji,
}

/// A message was marked as read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MessageAck {
    pub channel_id: ChannelId,
    pub message_id: MessageId,
}

/// A user started typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TypingStart {
    pub channel_id: ChannelId,
    pub guild_id: Option<GuildId>,
    pub user_id: UserId,
    /// Unix time in seconds.
    pub timestamp: u64,
}

/// Per-guild settings of the current user changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UserGuildSettingsUpdate {
    pub guild_id: Option<GuildId>,
    pub muted: bool,
}

/// Settings of the current user changed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserSettingsUpdate {
    pub locale: Option<String>,
    pub status: Option<Status>,
}

/// A note on a user changed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserNoteUpdate {
    pub id: UserId,
    pub note: String,
}

/// The voice server of a guild changed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VoiceServerUpdate {
    pub guild_id: GuildId,
    pub token: String,
    pub endpoint: Option<String>,
}

/// The webhooks of a channel changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WebhooksUpdate {
    pub guild_id: GuildId,
    pub channel_id: ChannelId,
}

/// A user invoked an interaction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InteractionCreate {
    pub id: InteractionId,
    pub token: String,
    pub guild_id: Option<GuildId>,
    pub channel_id: Option<ChannelId>,
    pub user: Option<User>,
}

/// An application command was changed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ApplicationCommandUpdate {
    pub id: InteractionId,
    pub guild_id: Option<GuildId>,
    pub name: String,
}

/// The gateway connection was closed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Close {
    /// The close code, if the remote sent one.
    pub code: Option<u16>,
    pub reason: String,
}

macro_rules! gateway_events {
    ($($name:ident),+ $(,)?) => {
        /// A raw event received from the transport.
        #[derive(Debug, Clone, PartialEq)]
        pub enum GatewayEvent {
            $(
                #[allow(missing_docs)]
                $name($name),
            )+
            /// An event the dispatcher does not model.
            Unknown {
                /// The gateway name of the event, e.g. `"GIFT_CODE_UPDATE"`.
                name: String,
            },
        }

        impl GatewayEvent {
            /// The dispatch kind of this event, or `None` for
            /// [`GatewayEvent::Unknown`].
            pub fn kind(&self) -> Option<EventKind> {
                match self {
                    $(GatewayEvent::$name(_) => Some(EventKind::$name),)+
                    GatewayEvent::Unknown { .. } => None,
                }
            }
        }

        $(
            impl From<$name> for GatewayEvent {
                fn from(event: $name) -> Self {
                    GatewayEvent::$name(event)
                }
            }
        )+
    };
}

gateway_events! {
    Hello,
    Ready,
    ReadySupplemental,
    Resumed,
    InvalidSession,
    ChannelCreate,
    ChannelUpdate,
    ChannelDelete,
    ChannelPinsUpdate,
    ChannelUnreadUpdate,
    GuildCreate,
    GuildUpdate,
    GuildDelete,
    GuildBanAdd,
    GuildBanRemove,
    GuildEmojisUpdate,
    GuildIntegrationsUpdate,
    GuildMemberAdd,
    GuildMemberRemove,
    GuildMemberUpdate,
    GuildMembersChunk,
    GuildMemberListUpdate,
    GuildRoleCreate,
    GuildRoleUpdate,
    GuildRoleDelete,
    InviteCreate,
    InviteDelete,
    MessageCreate,
    MessageUpdate,
    MessageDelete,
    MessageDeleteBulk,
    MessageReactionAdd,
    MessageReactionRemove,
    MessageReactionRemoveAll,
    MessageReactionRemoveEmoji,
    MessageAck,
    PresenceUpdate,
    PresencesReplace,
    SessionsReplace,
    TypingStart,
    UserUpdate,
    RelationshipAdd,
    RelationshipRemove,
    UserGuildSettingsUpdate,
    UserSettingsUpdate,
    UserNoteUpdate,
    VoiceStateUpdate,
    VoiceServerUpdate,
    WebhooksUpdate,
    InteractionCreate,
    ApplicationCommandUpdate,
    Close,
}
