//! Classification of raw gateway events.

use crate::event::{
    ApplicationCommandUpdateEvent, ChannelCreateEvent, ChannelDeleteEvent, ChannelPinsUpdateEvent,
    ChannelUnreadUpdateEvent, ChannelUpdateEvent, CloseEvent, Event, GuildBanAddEvent,
    GuildBanRemoveEvent, GuildCreateEvent, GuildDeleteEvent, GuildEmojisUpdateEvent,
    GuildIntegrationsUpdateEvent, GuildMemberAddEvent, GuildMemberListUpdateEvent,
    GuildMemberRemoveEvent, GuildMemberUpdateEvent, GuildMembersChunkEvent, GuildRoleCreateEvent,
    GuildRoleDeleteEvent, GuildRoleUpdateEvent, GuildUpdateEvent, HelloEvent,
    InteractionCreateEvent, InvalidSessionEvent, InviteCreateEvent, InviteDeleteEvent,
    MessageAckEvent, MessageCreateEvent, MessageDeleteBulkEvent, MessageDeleteEvent,
    MessageReactionAddEvent, MessageReactionRemoveAllEvent, MessageReactionRemoveEmojiEvent,
    MessageReactionRemoveEvent, MessageUpdateEvent, PresenceUpdateEvent, PresencesReplaceEvent,
    ReadyEvent, ReadySupplementalEvent, RelationshipAddEvent, RelationshipRemoveEvent,
    ResumedEvent, SessionsReplaceEvent, TypingStartEvent, UserGuildSettingsUpdateEvent,
    UserNoteUpdateEvent, UserSettingsUpdateEvent, UserUpdateEvent, VoiceServerUpdateEvent,
    VoiceStateUpdateEvent, WebhooksUpdateEvent,
};
use gatecast_core::{GatewayEvent, Store};

/// Turn a raw event into an enriched [`Event`] with a fresh context.
///
/// Update and delete events are enriched with the cached entity from before
/// the event. A cache miss leaves the old value empty.
///
/// Returns `None` for events the dispatcher doesn't model.
pub fn classify(raw: GatewayEvent, store: &dyn Store) -> Option<Event> {
    use GatewayEvent as G;

    let event: Event = match raw {
        G::Hello(e) => HelloEvent::new(e).into(),
        G::Ready(e) => ReadyEvent::new(e).into(),
        G::ReadySupplemental(e) => ReadySupplementalEvent::new(e).into(),
        G::Resumed(e) => ResumedEvent::new(e).into(),
        G::InvalidSession(e) => InvalidSessionEvent::new(e).into(),

        G::ChannelCreate(e) => ChannelCreateEvent::new(e).into(),
        G::ChannelUpdate(e) => {
            let old = store.channel(e.id);
            ChannelUpdateEvent::new(e, old).into()
        }
        G::ChannelDelete(e) => {
            let old = store.channel(e.id);
            ChannelDeleteEvent::new(e, old).into()
        }
        G::ChannelPinsUpdate(e) => ChannelPinsUpdateEvent::new(e).into(),
        G::ChannelUnreadUpdate(e) => ChannelUnreadUpdateEvent::new(e).into(),

        G::GuildCreate(e) => GuildCreateEvent::new(e).into(),
        G::GuildUpdate(e) => {
            let old = store.guild(e.id);
            GuildUpdateEvent::new(e, old).into()
        }
        G::GuildDelete(e) => {
            let old = store.guild(e.id);
            GuildDeleteEvent::new(e, old).into()
        }
        G::GuildBanAdd(e) => GuildBanAddEvent::new(e).into(),
        G::GuildBanRemove(e) => GuildBanRemoveEvent::new(e).into(),
        G::GuildEmojisUpdate(e) => {
            let old = store.emojis(e.guild_id);
            GuildEmojisUpdateEvent::new(e, old).into()
        }
        G::GuildIntegrationsUpdate(e) => GuildIntegrationsUpdateEvent::new(e).into(),
        G::GuildMemberAdd(e) => GuildMemberAddEvent::new(e).into(),
        G::GuildMemberRemove(e) => {
            let old = store.member(e.guild_id, e.user.id);
            GuildMemberRemoveEvent::new(e, old).into()
        }
        G::GuildMemberUpdate(e) => {
            let old = store.member(e.guild_id, e.user.id);
            GuildMemberUpdateEvent::new(e, old).into()
        }
        G::GuildMembersChunk(e) => GuildMembersChunkEvent::new(e).into(),
        G::GuildMemberListUpdate(e) => GuildMemberListUpdateEvent::new(e).into(),
        G::GuildRoleCreate(e) => GuildRoleCreateEvent::new(e).into(),
        G::GuildRoleUpdate(e) => {
            let old = store.role(e.guild_id, e.role.id);
            GuildRoleUpdateEvent::new(e, old).into()
        }
        G::GuildRoleDelete(e) => {
            let old = store.role(e.guild_id, e.role_id);
            GuildRoleDeleteEvent::new(e, old).into()
        }

        G::InviteCreate(e) => InviteCreateEvent::new(e).into(),
        G::InviteDelete(e) => InviteDeleteEvent::new(e).into(),

        G::MessageCreate(e) => MessageCreateEvent::new(e).into(),
        G::MessageUpdate(e) => {
            let old = store.message(e.channel_id, e.id);
            MessageUpdateEvent::new(e, old).into()
        }
        G::MessageDelete(e) => {
            let old = store.message(e.channel_id, e.id);
            MessageDeleteEvent::new(e, old).into()
        }
        G::MessageDeleteBulk(e) => {
            let old = e
                .ids
                .iter()
                .filter_map(|id| store.message(e.channel_id, *id))
                .collect();
            MessageDeleteBulkEvent::new(e, old).into()
        }
        G::MessageReactionAdd(e) => MessageReactionAddEvent::new(e).into(),
        G::MessageReactionRemove(e) => MessageReactionRemoveEvent::new(e).into(),
        G::MessageReactionRemoveAll(e) => MessageReactionRemoveAllEvent::new(e).into(),
        G::MessageReactionRemoveEmoji(e) => MessageReactionRemoveEmojiEvent::new(e).into(),
        G::MessageAck(e) => MessageAckEvent::new(e).into(),

        G::PresenceUpdate(e) => {
            let old = store.presence(e.guild_id, e.user.id);
            PresenceUpdateEvent::new(e, old).into()
        }
        G::PresencesReplace(e) => PresencesReplaceEvent::new(e).into(),
        G::SessionsReplace(e) => SessionsReplaceEvent::new(e).into(),
        G::TypingStart(e) => TypingStartEvent::new(e).into(),
        G::UserUpdate(e) => UserUpdateEvent::new(e).into(),

        G::RelationshipAdd(e) => RelationshipAddEvent::new(e).into(),
        G::RelationshipRemove(e) => RelationshipRemoveEvent::new(e).into(),

        G::UserGuildSettingsUpdate(e) => UserGuildSettingsUpdateEvent::new(e).into(),
        G::UserSettingsUpdate(e) => UserSettingsUpdateEvent::new(e).into(),
        G::UserNoteUpdate(e) => UserNoteUpdateEvent::new(e).into(),

        G::VoiceStateUpdate(e) => VoiceStateUpdateEvent::new(e).into(),
        G::VoiceServerUpdate(e) => VoiceServerUpdateEvent::new(e).into(),

        G::WebhooksUpdate(e) => WebhooksUpdateEvent::new(e).into(),
        G::InteractionCreate(e) => InteractionCreateEvent::new(e).into(),
        G::ApplicationCommandUpdate(e) => ApplicationCommandUpdateEvent::new(e).into(),

        G::Close(e) => CloseEvent::new(e).into(),

        G::Unknown { name } => {
            tracing::trace!(event = %name, "dropping unknown gateway event");
            return None;
        }
    };

    Some(event)
}
