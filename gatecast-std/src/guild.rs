//! Guild lifecycle tracking.
//!
//! The gateway only ever says "guild created" and "guild deleted". Which of
//! those means "joined", "streamed in after Ready", "back from an outage",
//! "left" or "went down" depends on what was seen before. The tracker
//! remembers exactly that, as two sets of guild ids:
//!
//! | state         | entered on                        |
//! |---------------|-----------------------------------|
//! | `pending_sync`| Ready listing the guild as unavailable |
//! | `unavailable` | GuildDelete with the unavailable flag |
//!
//! Every other guild is unknown. An id is never in both sets.

use gatecast_core::{
    EventKind,
    gateway::{GuildCreate, GuildDelete, Ready},
    model::GuildId,
};
use std::{
    collections::HashSet,
    sync::{Mutex, PoisonError},
};

/// Why a guild was created, as far as the current user is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuildArrival {
    /// The guild was announced in Ready and is now streamed in.
    Ready,
    /// The guild is back from an outage.
    Available,
    /// The current user joined the guild.
    Join,
}

impl GuildArrival {
    /// The situational kind dispatched for this arrival.
    pub fn kind(self) -> EventKind {
        match self {
            GuildArrival::Ready => EventKind::GuildReady,
            GuildArrival::Available => EventKind::GuildAvailable,
            GuildArrival::Join => EventKind::GuildJoin,
        }
    }
}

/// Why a guild was deleted, as far as the current user is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuildDeparture {
    /// The current user left, was removed, or the guild was deleted.
    Leave,
    /// The guild went down.
    Unavailable,
}

impl GuildDeparture {
    /// The situational kind dispatched for this departure.
    pub fn kind(self) -> EventKind {
        match self {
            GuildDeparture::Leave => EventKind::GuildLeave,
            GuildDeparture::Unavailable => EventKind::GuildUnavailable,
        }
    }
}

#[derive(Debug, Default)]
struct Sets {
    pending_sync: HashSet<GuildId>,
    unavailable: HashSet<GuildId>,
}

/// Reclassifies guild create and delete events into situational kinds.
#[derive(Debug, Default)]
pub struct GuildTracker {
    sets: Mutex<Sets>,
}

impl GuildTracker {
    /// Create a tracker that knows no guilds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new session.
    ///
    /// Everything learned during the previous session is forgotten. Guilds
    /// the Ready event lists as unavailable will be reported as
    /// [`EventKind::GuildReady`] once they are streamed in.
    pub fn ready(&self, event: &Ready) {
        let mut sets = self.lock();
        sets.pending_sync.clear();
        sets.unavailable.clear();
        sets.pending_sync.extend(
            event
                .guilds
                .iter()
                .filter(|guild| guild.unavailable)
                .map(|guild| guild.id),
        );
    }

    /// Classify a guild create event. The guild is unknown afterwards.
    pub fn guild_create(&self, event: &GuildCreate) -> GuildArrival {
        let mut sets = self.lock();
        if sets.unavailable.remove(&event.id) {
            GuildArrival::Available
        } else if sets.pending_sync.remove(&event.id) {
            GuildArrival::Ready
        } else {
            GuildArrival::Join
        }
    }

    /// Classify a guild delete event.
    pub fn guild_delete(&self, event: &GuildDelete) -> GuildDeparture {
        let mut sets = self.lock();
        sets.pending_sync.remove(&event.id);
        if event.unavailable {
            sets.unavailable.insert(event.id);
            GuildDeparture::Unavailable
        } else {
            sets.unavailable.remove(&event.id);
            GuildDeparture::Leave
        }
    }

    /// Reports whether `id` waits for its first GuildCreate of the session.
    pub fn is_pending_sync(&self, id: GuildId) -> bool {
        self.lock().pending_sync.contains(&id)
    }

    /// Reports whether `id` is known to be unavailable.
    pub fn is_unavailable(&self, id: GuildId) -> bool {
        self.lock().unavailable.contains(&id)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Sets> {
        self.sets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
