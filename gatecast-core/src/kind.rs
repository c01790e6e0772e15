//! Dispatch categories and gateway intents.
//!
//! Every event that flows through the dispatcher belongs to exactly one
//! [`EventKind`]. Handlers and middlewares are registered per kind, and the
//! set of kinds with live registrations determines the [`Intents`] the
//! transport has to subscribe to.

use bitflags::bitflags;
use std::fmt;

bitflags! {
    /// Gateway intents, i.e. the groups of events a connection subscribes to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Intents: u64 {
        /// Guild, channel and role lifecycle events.
        const GUILDS = 1 << 0;
        /// Guild member add/update/remove events.
        const GUILD_MEMBERS = 1 << 1;
        /// Ban add/remove events.
        const GUILD_BANS = 1 << 2;
        /// Emoji update events.
        const GUILD_EMOJIS = 1 << 3;
        /// Integration update events.
        const GUILD_INTEGRATIONS = 1 << 4;
        /// Webhook update events.
        const GUILD_WEBHOOKS = 1 << 5;
        /// Invite create/delete events.
        const GUILD_INVITES = 1 << 6;
        /// Voice state update events.
        const GUILD_VOICE_STATES = 1 << 7;
        /// Presence update events.
        const GUILD_PRESENCES = 1 << 8;
        /// Guild message events.
        const GUILD_MESSAGES = 1 << 9;
        /// Guild message reaction events.
        const GUILD_MESSAGE_REACTIONS = 1 << 10;
        /// Guild typing events.
        const GUILD_MESSAGE_TYPING = 1 << 11;
        /// Direct message events.
        const DIRECT_MESSAGES = 1 << 12;
        /// Direct message reaction events.
        const DIRECT_MESSAGE_REACTIONS = 1 << 13;
        /// Direct message typing events.
        const DIRECT_MESSAGE_TYPING = 1 << 14;
    }
}

macro_rules! event_kinds {
    ($($(#[$meta:meta])* $name:ident => $intents:expr),+ $(,)?) => {
        /// The closed set of dispatch categories.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[non_exhaustive]
        pub enum EventKind {
            $($(#[$meta])* $name,)+
        }

        impl EventKind {
            /// Every kind, in declaration order.
            pub const ALL: &'static [EventKind] = &[$(EventKind::$name,)+];

            /// The name of the kind.
            pub const fn name(self) -> &'static str {
                match self {
                    $(EventKind::$name => stringify!($name),)+
                }
            }

            /// The intents that must be enabled to receive events of this kind.
            ///
            /// [`EventKind::Any`] and [`EventKind::Context`] require no intents,
            /// as they don't express interest in any particular event.
            pub fn intents(self) -> Intents {
                match self {
                    $(EventKind::$name => $intents,)+
                }
            }
        }
    };
}

const NONE: Intents = Intents::empty();

event_kinds! {
    /// Matches every event.
    Any => NONE,
    /// Receives only the per-event context of every event.
    Context => NONE,

    Hello => NONE,
    Ready => NONE,
    ReadySupplemental => NONE,
    Resumed => NONE,
    InvalidSession => NONE,

    ChannelCreate => Intents::GUILDS,
    ChannelUpdate => Intents::GUILDS,
    ChannelDelete => Intents::GUILDS,
    ChannelPinsUpdate => Intents::GUILDS.union(Intents::DIRECT_MESSAGES),
    ChannelUnreadUpdate => NONE,

    GuildCreate => Intents::GUILDS,
    /// A guild announced during Ready became available.
    GuildReady => Intents::GUILDS,
    /// A guild that went unavailable while connected is back.
    GuildAvailable => Intents::GUILDS,
    /// The current user joined a guild.
    GuildJoin => Intents::GUILDS,
    GuildUpdate => Intents::GUILDS,
    GuildDelete => Intents::GUILDS,
    /// The current user left, was removed from, or lost a deleted guild.
    GuildLeave => Intents::GUILDS,
    /// A guild became unavailable, e.g. during an outage.
    GuildUnavailable => Intents::GUILDS,
    GuildBanAdd => Intents::GUILD_BANS,
    GuildBanRemove => Intents::GUILD_BANS,
    GuildEmojisUpdate => Intents::GUILD_EMOJIS,
    GuildIntegrationsUpdate => Intents::GUILD_INTEGRATIONS,
    GuildMemberAdd => Intents::GUILD_MEMBERS,
    GuildMemberRemove => Intents::GUILD_MEMBERS,
    GuildMemberUpdate => Intents::GUILD_MEMBERS,
    GuildMembersChunk => NONE,
    GuildMemberListUpdate => NONE,
    GuildRoleCreate => Intents::GUILDS,
    GuildRoleUpdate => Intents::GUILDS,
    GuildRoleDelete => Intents::GUILDS,

    InviteCreate => Intents::GUILD_INVITES,
    InviteDelete => Intents::GUILD_INVITES,

    MessageCreate => Intents::GUILD_MESSAGES.union(Intents::DIRECT_MESSAGES),
    MessageUpdate => Intents::GUILD_MESSAGES.union(Intents::DIRECT_MESSAGES),
    MessageDelete => Intents::GUILD_MESSAGES.union(Intents::DIRECT_MESSAGES),
    MessageDeleteBulk => Intents::GUILD_MESSAGES,
    MessageReactionAdd => Intents::GUILD_MESSAGE_REACTIONS.union(Intents::DIRECT_MESSAGE_REACTIONS),
    MessageReactionRemove => Intents::GUILD_MESSAGE_REACTIONS.union(Intents::DIRECT_MESSAGE_REACTIONS),
    MessageReactionRemoveAll => Intents::GUILD_MESSAGE_REACTIONS.union(Intents::DIRECT_MESSAGE_REACTIONS),
    MessageReactionRemoveEmoji => Intents::GUILD_MESSAGE_REACTIONS.union(Intents::DIRECT_MESSAGE_REACTIONS),
    MessageAck => NONE,

    PresenceUpdate => Intents::GUILD_PRESENCES,
    PresencesReplace => NONE,
    SessionsReplace => NONE,
    TypingStart => Intents::GUILD_MESSAGE_TYPING.union(Intents::DIRECT_MESSAGE_TYPING),
    UserUpdate => NONE,

    RelationshipAdd => NONE,
    RelationshipRemove => NONE,

    UserGuildSettingsUpdate => NONE,
    UserSettingsUpdate => NONE,
    UserNoteUpdate => NONE,

    VoiceStateUpdate => Intents::GUILD_VOICE_STATES,
    VoiceServerUpdate => NONE,

    WebhooksUpdate => Intents::GUILD_WEBHOOKS,
    InteractionCreate => NONE,
    ApplicationCommandUpdate => NONE,

    /// The gateway connection was closed.
    Close => NONE,
}

impl EventKind {
    /// Reports whether handlers of this kind receive events of every kind.
    pub const fn is_catch_all(self) -> bool {
        matches!(self, EventKind::Any | EventKind::Context)
    }

    /// Reports whether this kind is synthesized by the guild lifecycle tracker
    /// rather than emitted by the transport.
    pub const fn is_situational(self) -> bool {
        matches!(
            self,
            EventKind::GuildReady
                | EventKind::GuildAvailable
                | EventKind::GuildJoin
                | EventKind::GuildLeave
                | EventKind::GuildUnavailable
        )
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
