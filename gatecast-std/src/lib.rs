//! # gatecast-std
//!
//! The dispatch engine of gatecast.
//!
//! This crate provides:
//! - **Classification**: [`classify`] turns raw gateway events into enriched
//!   [`Event`]s
//! - **Registration**: [`Registration`], [`MiddlewareChain`] and
//!   [`HandlerGroup`]
//! - **Dispatch**: [`Dispatcher`], with global middlewares, per-handler
//!   middlewares and concurrent handler fan-out
//! - **Guild lifecycle**: [`GuildTracker`] and the situational guild events
//! - **Standard middlewares**: [`LoggingMiddleware`]
//! - **Testing**: [`testing`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core
pub use gatecast_core;

mod classify;
mod dispatcher;
mod guild;
mod logging;
mod middleware;
mod registry;

pub mod event;
pub mod testing;

pub use classify::classify;
pub use dispatcher::{Dispatcher, DispatcherBuilder};
pub use event::{Event, Payload};
pub use guild::{GuildArrival, GuildDeparture, GuildTracker};
pub use logging::LoggingMiddleware;
pub use registry::{HandlerGroup, HandlerToken, IntoRegistration, MiddlewareChain, Registration};
