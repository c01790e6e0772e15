//! Enriched events.
//!
//! The classifier wraps every raw [`GatewayEvent`](gatecast_core::GatewayEvent)
//! into an enriched event: the raw payload (shared through an [`Arc`]), the
//! per-event [`Context`] and, for update and delete events, the previous
//! version of the entity as found in the cache.
//!
//! Enriched events dereference to their raw payload, so `event.content`
//! works on a [`MessageCreateEvent`] just like it does on a [`Message`].
//!
//! # Payloads
//!
//! Handlers pick what they receive through their second parameter. Anything
//! implementing [`Payload`] can be used:
//!
//! - a typed event such as [`MessageCreateEvent`], receiving one kind,
//! - [`Event`], receiving every event,
//! - [`Context`], receiving only the context of every event.

use gatecast_core::{
    Context, EventKind, gateway,
    model::{Channel, Emoji, Guild, Member, Message, Presence, Role},
};
use std::{ops::Deref, sync::Arc};

/// A type a handler or middleware can receive.
pub trait Payload: Clone + Send + Sync + 'static {
    /// The kind of events this payload is extracted from.
    ///
    /// [`EventKind::Any`] and [`EventKind::Context`] extract from every event.
    const KIND: EventKind;

    /// Extract the payload from an event, if it is of the right kind.
    fn extract(event: &Event) -> Option<Self>;
}

impl Payload for Event {
    const KIND: EventKind = EventKind::Any;

    fn extract(event: &Event) -> Option<Self> {
        Some(event.clone())
    }
}

impl Payload for Context {
    const KIND: EventKind = EventKind::Context;

    fn extract(event: &Event) -> Option<Self> {
        Some(event.context().clone())
    }
}

macro_rules! enriched_events {
    ($(
        $(#[$meta:meta])*
        $kind:ident => $name:ident $({ $old:ident: $old_ty:ty })?;
    )+) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone)]
            pub struct $name {
                /// The per-event context.
                pub ctx: Context,
                /// The raw event.
                pub event: Arc<gateway::$kind>,
                $(
                    /// The cached entity from before the event, if any.
                    pub $old: $old_ty,
                )?
            }

            impl $name {
                /// Wrap a raw event with a fresh context.
                pub fn new(event: gateway::$kind $(, $old: $old_ty)?) -> Self {
                    Self {
                        ctx: Context::new(),
                        event: Arc::new(event),
                        $($old,)?
                    }
                }

                /// The per-event context.
                pub fn context(&self) -> &Context {
                    &self.ctx
                }

                fn fork(&self) -> Self {
                    Self {
                        ctx: self.ctx.fork(),
                        ..self.clone()
                    }
                }
            }

            impl Deref for $name {
                type Target = gateway::$kind;

                fn deref(&self) -> &Self::Target {
                    &self.event
                }
            }

            impl Payload for $name {
                const KIND: EventKind = EventKind::$kind;

                fn extract(event: &Event) -> Option<Self> {
                    match event {
                        Event::$kind(e) => Some(e.clone()),
                        _ => None,
                    }
                }
            }

            impl From<$name> for Event {
                fn from(event: $name) -> Self {
                    Event::$kind(event)
                }
            }
        )+
    };
}

enriched_events! {
    /// The first frame of a connection.
    Hello => HelloEvent;
    /// A session was established.
    Ready => ReadyEvent;
    /// Extra session data streamed after Ready.
    ReadySupplemental => ReadySupplementalEvent;
    /// A session was resumed.
    Resumed => ResumedEvent;
    /// The session was invalidated.
    InvalidSession => InvalidSessionEvent;

    /// A channel was created.
    ChannelCreate => ChannelCreateEvent;
    /// A channel was updated.
    ChannelUpdate => ChannelUpdateEvent { old: Option<Channel> };
    /// A channel was deleted.
    ChannelDelete => ChannelDeleteEvent { old: Option<Channel> };
    /// The pins of a channel changed.
    ChannelPinsUpdate => ChannelPinsUpdateEvent;
    /// The read state of a channel changed.
    ChannelUnreadUpdate => ChannelUnreadUpdateEvent;

    /// A guild was streamed in.
    ///
    /// Besides this event, one of [`GuildReadyEvent`], [`GuildAvailableEvent`]
    /// or [`GuildJoinEvent`] is dispatched to tell why.
    GuildCreate => GuildCreateEvent;
    /// A guild was updated.
    GuildUpdate => GuildUpdateEvent { old: Option<Guild> };
    /// A guild was deleted, left or became unavailable.
    ///
    /// Besides this event, either [`GuildLeaveEvent`] or
    /// [`GuildUnavailableEvent`] is dispatched.
    GuildDelete => GuildDeleteEvent { old: Option<Guild> };
    /// A user was banned.
    GuildBanAdd => GuildBanAddEvent;
    /// A user was unbanned.
    GuildBanRemove => GuildBanRemoveEvent;
    /// The emojis of a guild changed.
    GuildEmojisUpdate => GuildEmojisUpdateEvent { old: Option<Vec<Emoji>> };
    /// The integrations of a guild changed.
    GuildIntegrationsUpdate => GuildIntegrationsUpdateEvent;
    /// A user joined a guild.
    GuildMemberAdd => GuildMemberAddEvent;
    /// A user left a guild.
    GuildMemberRemove => GuildMemberRemoveEvent { old: Option<Member> };
    /// A guild member was updated.
    GuildMemberUpdate => GuildMemberUpdateEvent { old: Option<Member> };
    /// A chunk of requested members.
    GuildMembersChunk => GuildMembersChunkEvent;
    /// An update to a lazily loaded member list.
    GuildMemberListUpdate => GuildMemberListUpdateEvent;
    /// A role was created.
    GuildRoleCreate => GuildRoleCreateEvent;
    /// A role was updated.
    GuildRoleUpdate => GuildRoleUpdateEvent { old: Option<Role> };
    /// A role was deleted.
    GuildRoleDelete => GuildRoleDeleteEvent { old: Option<Role> };

    /// An invite was created.
    InviteCreate => InviteCreateEvent;
    /// An invite was deleted.
    InviteDelete => InviteDeleteEvent;

    /// A message was sent.
    MessageCreate => MessageCreateEvent;
    /// A message was edited.
    MessageUpdate => MessageUpdateEvent { old: Option<Message> };
    /// A message was deleted.
    MessageDelete => MessageDeleteEvent { old: Option<Message> };
    /// Several messages were deleted at once.
    ///
    /// `old` holds the deleted messages that were cached, in the order of
    /// the deleted ids.
    MessageDeleteBulk => MessageDeleteBulkEvent { old: Vec<Message> };
    /// A reaction was added.
    MessageReactionAdd => MessageReactionAddEvent;
    /// A reaction was removed.
    MessageReactionRemove => MessageReactionRemoveEvent;
    /// All reactions were removed from a message.
    MessageReactionRemoveAll => MessageReactionRemoveAllEvent;
    /// All reactions of one emoji were removed from a message.
    MessageReactionRemoveEmoji => MessageReactionRemoveEmojiEvent;
    /// A message was marked as read.
    MessageAck => MessageAckEvent;

    /// A user's presence changed.
    PresenceUpdate => PresenceUpdateEvent { old: Option<Presence> };
    /// Presences were replaced in bulk.
    PresencesReplace => PresencesReplaceEvent;
    /// The sessions of the current user changed.
    SessionsReplace => SessionsReplaceEvent;
    /// A user started typing.
    TypingStart => TypingStartEvent;
    /// The current user was updated.
    UserUpdate => UserUpdateEvent;

    /// A relationship was added.
    RelationshipAdd => RelationshipAddEvent;
    /// A relationship was removed.
    RelationshipRemove => RelationshipRemoveEvent;

    /// Per-guild settings of the current user changed.
    UserGuildSettingsUpdate => UserGuildSettingsUpdateEvent;
    /// Settings of the current user changed.
    UserSettingsUpdate => UserSettingsUpdateEvent;
    /// A note on a user changed.
    UserNoteUpdate => UserNoteUpdateEvent;

    /// A voice state changed.
    VoiceStateUpdate => VoiceStateUpdateEvent;
    /// The voice server of a guild changed.
    VoiceServerUpdate => VoiceServerUpdateEvent;

    /// The webhooks of a channel changed.
    WebhooksUpdate => WebhooksUpdateEvent;
    /// A user invoked an interaction.
    InteractionCreate => InteractionCreateEvent;
    /// An application command was changed.
    ApplicationCommandUpdate => ApplicationCommandUpdateEvent;

    /// The gateway connection was closed.
    Close => CloseEvent;
}

macro_rules! situational_events {
    ($(
        $(#[$meta:meta])*
        $kind:ident => $name:ident($inner:ident);
    )+) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone)]
            pub struct $name(pub $inner);

            impl $name {
                /// The per-event context, shared with the underlying event.
                pub fn context(&self) -> &Context {
                    &self.0.ctx
                }

                fn fork(&self) -> Self {
                    Self(self.0.fork())
                }
            }

            impl Deref for $name {
                type Target = $inner;

                fn deref(&self) -> &Self::Target {
                    &self.0
                }
            }

            impl Payload for $name {
                const KIND: EventKind = EventKind::$kind;

                fn extract(event: &Event) -> Option<Self> {
                    match event {
                        Event::$kind(e) => Some(e.clone()),
                        _ => None,
                    }
                }
            }

            impl From<$name> for Event {
                fn from(event: $name) -> Self {
                    Event::$kind(event)
                }
            }
        )+
    };
}

situational_events! {
    /// A guild announced in Ready has been streamed in.
    GuildReady => GuildReadyEvent(GuildCreateEvent);
    /// A guild that went unavailable is available again.
    GuildAvailable => GuildAvailableEvent(GuildCreateEvent);
    /// The current user joined a guild.
    GuildJoin => GuildJoinEvent(GuildCreateEvent);
    /// The current user left a guild, was removed, or the guild was deleted.
    GuildLeave => GuildLeaveEvent(GuildDeleteEvent);
    /// A guild became unavailable.
    GuildUnavailable => GuildUnavailableEvent(GuildDeleteEvent);
}

macro_rules! event_enum {
    ($($kind:ident($name:ident)),+ $(,)?) => {
        /// Any enriched event.
        ///
        /// There is one variant per [`EventKind`], except for the catch-all
        /// kinds [`EventKind::Any`] and [`EventKind::Context`].
        #[derive(Debug, Clone)]
        #[non_exhaustive]
        pub enum Event {
            $(
                #[allow(missing_docs)]
                $kind($name),
            )+
        }

        impl Event {
            /// The kind of this event.
            pub fn kind(&self) -> EventKind {
                match self {
                    $(Event::$kind(_) => EventKind::$kind,)+
                }
            }

            /// The per-event context.
            pub fn context(&self) -> &Context {
                match self {
                    $(Event::$kind(e) => e.context(),)+
                }
            }

            /// Clone the event with a copy of its context.
            ///
            /// Writes to the context of the fork are not visible through
            /// `self` and vice versa.
            pub fn fork(&self) -> Event {
                match self {
                    $(Event::$kind(e) => Event::$kind(e.fork()),)+
                }
            }
        }
    };
}

event_enum! {
    Hello(HelloEvent),
    Ready(ReadyEvent),
    ReadySupplemental(ReadySupplementalEvent),
    Resumed(ResumedEvent),
    InvalidSession(InvalidSessionEvent),
    ChannelCreate(ChannelCreateEvent),
    ChannelUpdate(ChannelUpdateEvent),
    ChannelDelete(ChannelDeleteEvent),
    ChannelPinsUpdate(ChannelPinsUpdateEvent),
    ChannelUnreadUpdate(ChannelUnreadUpdateEvent),
    GuildCreate(GuildCreateEvent),
    GuildReady(GuildReadyEvent),
    GuildAvailable(GuildAvailableEvent),
    GuildJoin(GuildJoinEvent),
    GuildUpdate(GuildUpdateEvent),
    GuildDelete(GuildDeleteEvent),
    GuildLeave(GuildLeaveEvent),
    GuildUnavailable(GuildUnavailableEvent),
    GuildBanAdd(GuildBanAddEvent),
    GuildBanRemove(GuildBanRemoveEvent),
    GuildEmojisUpdate(GuildEmojisUpdateEvent),
    GuildIntegrationsUpdate(GuildIntegrationsUpdateEvent),
    GuildMemberAdd(GuildMemberAddEvent),
    GuildMemberRemove(GuildMemberRemoveEvent),
    GuildMemberUpdate(GuildMemberUpdateEvent),
    GuildMembersChunk(GuildMembersChunkEvent),
    GuildMemberListUpdate(GuildMemberListUpdateEvent),
    GuildRoleCreate(GuildRoleCreateEvent),
    GuildRoleUpdate(GuildRoleUpdateEvent),
    GuildRoleDelete(GuildRoleDeleteEvent),
    InviteCreate(InviteCreateEvent),
    InviteDelete(InviteDeleteEvent),
    MessageCreate(MessageCreateEvent),
    MessageUpdate(MessageUpdateEvent),
    MessageDelete(MessageDeleteEvent),
    MessageDeleteBulk(MessageDeleteBulkEvent),
    MessageReactionAdd(MessageReactionAddEvent),
    MessageReactionRemove(MessageReactionRemoveEvent),
    MessageReactionRemoveAll(MessageReactionRemoveAllEvent),
    MessageReactionRemoveEmoji(MessageReactionRemoveEmojiEvent),
    MessageAck(MessageAckEvent),
    PresenceUpdate(PresenceUpdateEvent),
    PresencesReplace(PresencesReplaceEvent),
    SessionsReplace(SessionsReplaceEvent),
    TypingStart(TypingStartEvent),
    UserUpdate(UserUpdateEvent),
    RelationshipAdd(RelationshipAddEvent),
    RelationshipRemove(RelationshipRemoveEvent),
    UserGuildSettingsUpdate(UserGuildSettingsUpdateEvent),
    UserSettingsUpdate(UserSettingsUpdateEvent),
    UserNoteUpdate(UserNoteUpdateEvent),
    VoiceStateUpdate(VoiceStateUpdateEvent),
    VoiceServerUpdate(VoiceServerUpdateEvent),
    WebhooksUpdate(WebhooksUpdateEvent),
    InteractionCreate(InteractionCreateEvent),
    ApplicationCommandUpdate(ApplicationCommandUpdateEvent),
    Close(CloseEvent),
}
