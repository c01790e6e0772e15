//! # gatecast - Middleware-Driven Gateway Event Dispatch
//!
//! `gatecast` sits between a gateway transport and a bot. The transport
//! pushes raw [`GatewayEvent`]s into a channel; the [`Dispatcher`] classifies
//! them, enriches them with a per-event [`Context`] and the cached version of
//! updated entities, runs the global middlewares and fans the event out to
//! every interested handler on its own task.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use gatecast::prelude::*;
//!
//! #[derive(Clone)]
//! struct Bot { /* http client, config, ... */ }
//!
//! let dispatcher = Dispatcher::new(Bot::new());
//!
//! // Drop messages from other bots before any handler sees them.
//! dispatcher.add_middleware(|_: Bot, e: MessageCreateEvent| async move {
//!     if e.author.bot { Err(Filtered) } else { Ok(()) }
//! });
//!
//! dispatcher.add_handler(|bot: Bot, e: MessageCreateEvent| async move {
//!     bot.reply(&e, "pong").await
//! });
//!
//! dispatcher.add_handler(|_: Bot, e: GuildJoinEvent| async move {
//!     tracing::info!(guild = %e.id, "joined a guild");
//! });
//!
//! let intents = dispatcher.derive_intents();
//! let events = transport.connect(intents).await?;
//! dispatcher.open(events)?;
//! ```
//!
//! ## Guild lifecycle
//!
//! Besides the raw GuildCreate and GuildDelete events, the dispatcher emits
//! one situational event per guild transition, derived from what it has
//! seen earlier in the session:
//!
//! | raw event                      | situational event       |
//! |--------------------------------|-------------------------|
//! | GuildCreate after Ready        | [`GuildReadyEvent`]       |
//! | GuildCreate after an outage    | [`GuildAvailableEvent`]   |
//! | any other GuildCreate          | [`GuildJoinEvent`]        |
//! | GuildDelete with `unavailable` | [`GuildUnavailableEvent`] |
//! | any other GuildDelete          | [`GuildLeaveEvent`]       |
//!
//! [`GuildReadyEvent`]: event::GuildReadyEvent
//! [`GuildAvailableEvent`]: event::GuildAvailableEvent
//! [`GuildJoinEvent`]: event::GuildJoinEvent
//! [`GuildUnavailableEvent`]: event::GuildUnavailableEvent
//! [`GuildLeaveEvent`]: event::GuildLeaveEvent

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use gatecast_core::{
    // Errors
    BoxError,
    // Context
    Context,
    ContextKey,
    Filtered,
    GatecastError,
    // Raw events
    GatewayEvent,
    // Handler
    Handler,
    HandlerError,
    // Kinds
    EventKind,
    Intents,
    IntoOutcome,
    LifecycleError,
    Middleware,
    // Entity cache
    NoopStore,
    PanicPayload,
    RegistrationError,
    Store,
    gateway,
    is_filtered,
    model,
};

pub use gatecast_std::{
    // Dispatch
    Dispatcher,
    DispatcherBuilder,
    // Events
    Event,
    // Guild lifecycle
    GuildArrival,
    GuildDeparture,
    GuildTracker,
    // Registration
    HandlerGroup,
    HandlerToken,
    IntoRegistration,
    LoggingMiddleware,
    MiddlewareChain,
    Payload,
    Registration,
    classify,
    event,
};

/// Testing utilities.
pub mod testing {
    pub use gatecast_std::testing::{
        MemoryStore, Recorder, guild_create, guild_delete, message_create, raw_guild_create,
        raw_guild_delete, raw_message_create, raw_ready, ready,
    };
}

/// Prelude module - common imports for gatecast.
///
/// # Usage
///
/// ```rust,ignore
/// use gatecast::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BoxError, Context, Dispatcher, Event, EventKind, Filtered, GatewayEvent, Handler,
        HandlerGroup, Intents, MiddlewareChain, Payload, Registration,
        event::{
            GuildAvailableEvent, GuildCreateEvent, GuildDeleteEvent, GuildJoinEvent,
            GuildLeaveEvent, GuildReadyEvent, GuildUnavailableEvent, MessageCreateEvent,
            ReadyEvent,
        },
    };
}
