//! Testing utilities for gatecast.
//!
//! # Features
//!
//! - [`MemoryStore`]: an in-memory entity cache
//! - [`Recorder`]: records what handlers saw, and in which order
//! - event constructors such as [`message_create`] and [`guild_create`]

use crate::event::{GuildCreateEvent, GuildDeleteEvent, MessageCreateEvent, Payload, ReadyEvent};
use gatecast_core::{
    Handler, Store,
    gateway::{GuildCreate, GuildDelete, MessageCreate, Ready},
    model::{
        Channel, ChannelId, Emoji, Guild, GuildId, Member, Message, MessageId, Presence, Role,
        RoleId, UnavailableGuild, UserId,
    },
};
use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
    },
};

// ============================================================================
// Memory Store
// ============================================================================

#[derive(Debug, Default)]
struct Entities {
    channels: HashMap<ChannelId, Channel>,
    guilds: HashMap<GuildId, Guild>,
    members: HashMap<(GuildId, UserId), Member>,
    messages: HashMap<(ChannelId, MessageId), Message>,
    roles: HashMap<(GuildId, RoleId), Role>,
    presences: HashMap<(GuildId, UserId), Presence>,
    emojis: HashMap<GuildId, Vec<Emoji>>,
}

/// An entity cache backed by hash maps.
///
/// Clones share the same maps, so a store can be handed to the dispatcher
/// and still be filled from the test.
///
/// # Example
///
/// ```rust,ignore
/// let store = MemoryStore::new();
/// store.insert_channel(channel.clone());
///
/// let dispatcher = Dispatcher::builder(()).store(store.clone()).build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entities: Arc<RwLock<Entities>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache a channel.
    pub fn insert_channel(&self, channel: Channel) {
        self.write().channels.insert(channel.id, channel);
    }

    /// Cache a guild.
    pub fn insert_guild(&self, guild: Guild) {
        self.write().guilds.insert(guild.id, guild);
    }

    /// Cache a member of `guild_id`.
    pub fn insert_member(&self, guild_id: GuildId, member: Member) {
        self.write().members.insert((guild_id, member.user.id), member);
    }

    /// Cache a message.
    pub fn insert_message(&self, message: Message) {
        self.write().messages.insert((message.channel_id, message.id), message);
    }

    /// Cache a role of `guild_id`.
    pub fn insert_role(&self, guild_id: GuildId, role: Role) {
        self.write().roles.insert((guild_id, role.id), role);
    }

    /// Cache a presence.
    pub fn insert_presence(&self, presence: Presence) {
        self.write().presences.insert((presence.guild_id, presence.user.id), presence);
    }

    /// Cache the emojis of a guild.
    pub fn insert_emojis(&self, guild_id: GuildId, emojis: Vec<Emoji>) {
        self.write().emojis.insert(guild_id, emojis);
    }

    fn read(&self) -> RwLockReadGuard<'_, Entities> {
        self.entities.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Entities> {
        self.entities.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Store for MemoryStore {
    fn channel(&self, id: ChannelId) -> Option<Channel> {
        self.read().channels.get(&id).cloned()
    }

    fn guild(&self, id: GuildId) -> Option<Guild> {
        self.read().guilds.get(&id).cloned()
    }

    fn member(&self, guild_id: GuildId, user_id: UserId) -> Option<Member> {
        self.read().members.get(&(guild_id, user_id)).cloned()
    }

    fn message(&self, channel_id: ChannelId, id: MessageId) -> Option<Message> {
        self.read().messages.get(&(channel_id, id)).cloned()
    }

    fn role(&self, guild_id: GuildId, id: RoleId) -> Option<Role> {
        self.read().roles.get(&(guild_id, id)).cloned()
    }

    fn presence(&self, guild_id: GuildId, user_id: UserId) -> Option<Presence> {
        self.read().presences.get(&(guild_id, user_id)).cloned()
    }

    fn emojis(&self, guild_id: GuildId) -> Option<Vec<Emoji>> {
        self.read().emojis.get(&guild_id).cloned()
    }
}

// ============================================================================
// Recorder
// ============================================================================

/// Records labels in the order they arrive.
///
/// # Example
///
/// ```rust,ignore
/// let recorder = Recorder::new();
/// dispatcher.add_handler(recorder.handler::<(), MessageCreateEvent>("message"));
///
/// dispatcher.call(message_create("hi")).await;
/// dispatcher.close().await;
///
/// assert_eq!(recorder.entries(), vec!["message"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a label.
    pub fn record(&self, label: impl Into<String>) {
        self.lock().push(label.into());
    }

    /// A handler recording `label` for every payload it receives.
    pub fn handler<S, P>(&self, label: &'static str) -> impl Handler<S, P>
    where
        S: Send + 'static,
        P: Payload,
    {
        let recorder = self.clone();
        move |_: S, _: P| {
            recorder.record(label);
            async {}
        }
    }

    /// Get a copy of the recorded labels.
    pub fn entries(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Get the number of recorded labels.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Reports whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Clear all recorded labels.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ============================================================================
// Event constructors
// ============================================================================

/// A Ready listing `unavailable` as guilds still to be streamed in.
pub fn ready(unavailable: &[u64]) -> ReadyEvent {
    ReadyEvent::new(raw_ready(unavailable))
}

/// The raw form of [`ready`].
pub fn raw_ready(unavailable: &[u64]) -> Ready {
    Ready {
        guilds: unavailable
            .iter()
            .map(|&id| UnavailableGuild {
                id: GuildId(id),
                unavailable: true,
            })
            .collect(),
        ..Default::default()
    }
}

/// A GuildCreate for guild `id`.
pub fn guild_create(id: u64) -> GuildCreateEvent {
    GuildCreateEvent::new(raw_guild_create(id))
}

/// The raw form of [`guild_create`].
pub fn raw_guild_create(id: u64) -> GuildCreate {
    GuildCreate(Guild {
        id: GuildId(id),
        name: format!("guild-{id}"),
        ..Default::default()
    })
}

/// A GuildDelete for guild `id`, without a cached guild.
pub fn guild_delete(id: u64, unavailable: bool) -> GuildDeleteEvent {
    GuildDeleteEvent::new(raw_guild_delete(id, unavailable), None)
}

/// The raw form of [`guild_delete`].
pub fn raw_guild_delete(id: u64, unavailable: bool) -> GuildDelete {
    GuildDelete {
        id: GuildId(id),
        unavailable,
    }
}

/// A MessageCreate with the given content.
pub fn message_create(content: &str) -> MessageCreateEvent {
    MessageCreateEvent::new(raw_message_create(content))
}

/// The raw form of [`message_create`].
pub fn raw_message_create(content: &str) -> MessageCreate {
    MessageCreate(Message {
        id: MessageId(1),
        channel_id: ChannelId(1),
        content: content.to_owned(),
        ..Default::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;

    #[test]
    fn memory_store_answers_lookups() {
        let store = MemoryStore::new();
        store.insert_role(
            GuildId(1),
            Role {
                id: RoleId(2),
                name: "mod".into(),
                ..Default::default()
            },
        );

        assert_eq!(store.role(GuildId(1), RoleId(2)).unwrap().name, "mod");
        assert!(store.role(GuildId(2), RoleId(2)).is_none());
        assert!(store.clone().role(GuildId(1), RoleId(2)).is_some());
    }

    #[tokio::test]
    async fn recorder_handlers_record_their_label() {
        let recorder = Recorder::new();
        let handler = recorder.handler::<(), Event>("any");

        handler.call((), message_create("hi").into()).await.unwrap();
        assert_eq!(recorder.entries(), vec!["any"]);

        recorder.clear();
        assert!(recorder.is_empty());
    }
}
