//! # gatecast-core
//!
//! Core types and traits for the gatecast gateway event dispatcher.
//!
//! This crate has minimal dependencies and is meant to be imported by
//! transports, caches and plugins that don't need the dispatch engine from
//! `gatecast-std`.
//!
//! # Contents
//!
//! - [`GatewayEvent`]: the raw events a transport feeds into the dispatcher
//! - [`EventKind`] and [`Intents`]: dispatch categories and the gateway
//!   intents they require
//! - [`Context`]: the per-event key-value store
//! - [`Store`]: read access to the entity cache
//! - [`Handler`]: the shape of every handler and middleware
//!
//! # Error Types
//!
//! - [`GatecastError`] - Top-level error type
//! - [`RegistrationError`] - Handler registration errors
//! - [`LifecycleError`] - Read loop errors
//! - [`Filtered`] - The filter sentinel

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod context;
mod error;
mod handler;
mod kind;
mod store;

#[allow(missing_docs)]
pub mod gateway;
#[allow(missing_docs)]
pub mod model;

// Re-exports
pub use context::{Context, ContextKey};
pub use error::{
    BoxError, Filtered, GatecastError, HandlerError, LifecycleError, PanicPayload,
    RegistrationError, is_filtered,
};
pub use gateway::GatewayEvent;
pub use handler::{BoxFuture, DynHandler, Handler, IntoOutcome, Middleware};
pub use kind::{EventKind, Intents};
pub use store::{NoopStore, Store};
