//! Error types for gatecast.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`GatecastError`] - Top-level error type for all gatecast operations
//! - [`RegistrationError`] - Errors raised while registering handlers
//! - [`LifecycleError`] - Errors raised while opening the read loop
//! - [`HandlerError`] - Errors synthesized at a handler boundary
//! - [`Filtered`] - The filter sentinel

use crate::kind::EventKind;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The value a panicking handler unwound with.
pub type PanicPayload = Box<dyn std::any::Any + Send + 'static>;

/// Top-level error type for all gatecast operations.
#[derive(Error, Debug)]
pub enum GatecastError {
    /// A handler or middleware could not be registered.
    #[error("registration error: {0}")]
    Registration(#[from] RegistrationError),

    /// The dispatcher could not change its lifecycle state.
    #[error("lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),
}

/// Errors that can occur while registering handlers and middlewares.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// A per-handler middleware receives a payload the handler never sees.
    ///
    /// Middlewares of a handler must take either the handler's own event,
    /// [`EventKind::Any`] or [`EventKind::Context`].
    #[error("middleware for {middleware} cannot be attached to a handler for {handler}")]
    InvalidMiddleware {
        /// The kind the handler was registered for.
        handler: EventKind,
        /// The kind the middleware accepts.
        middleware: EventKind,
    },

    /// Global middlewares can't be registered for kinds that only reach
    /// handlers, such as the situational guild kinds.
    #[error("global middlewares cannot be registered for {0}")]
    UnsupportedMiddlewareKind(EventKind),
}

/// Errors that can occur while opening or closing the dispatcher.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    /// The read loop is already running.
    #[error("the dispatcher is already listening for events")]
    AlreadyOpen,
}

/// Errors produced by the dispatcher on behalf of user code.
#[derive(Error, Debug)]
pub enum HandlerError {
    /// A handler or middleware panicked.
    #[error("handler panicked: {0}")]
    Panic(String),
}

impl HandlerError {
    /// Describe a recovered panic.
    ///
    /// Panics raised through `panic!` carry a `&str` or `String`; anything
    /// else is reported as an opaque payload.
    pub fn from_panic(payload: &PanicPayload) -> Self {
        let msg = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_owned()
        };
        HandlerError::Panic(msg)
    }
}

/// The filter sentinel.
///
/// Returning this from a middleware stops the dispatch of the current event
/// (or, for a per-handler middleware, the current handler) without reporting
/// a failure to the error handler.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[error("filtered")]
pub struct Filtered;

impl Filtered {
    /// Returns the sentinel as a boxed error, ready to be returned from a
    /// middleware.
    pub fn boxed() -> BoxError {
        Box::new(Filtered)
    }
}

/// Reports whether `err` is the [`Filtered`] sentinel.
pub fn is_filtered(err: &BoxError) -> bool {
    err.downcast_ref::<Filtered>().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filtered_is_recognised_after_boxing() {
        let err = Filtered::boxed();
        assert!(is_filtered(&err));
        assert_eq!(err.to_string(), "filtered");
    }

    #[test]
    fn other_errors_are_not_filtered() {
        let err: BoxError = "boom".into();
        assert!(!is_filtered(&err));
    }

    #[test]
    fn invalid_middleware_message_names_both_kinds() {
        let err = RegistrationError::InvalidMiddleware {
            handler: EventKind::MessageCreate,
            middleware: EventKind::Ready,
        };
        let msg = err.to_string();
        assert!(msg.contains("MessageCreate"));
        assert!(msg.contains("Ready"));
    }

    #[test]
    fn panic_payloads_keep_their_message() {
        let payload: PanicPayload = Box::new("boom");
        assert_eq!(HandlerError::from_panic(&payload).to_string(), "handler panicked: boom");

        let payload: PanicPayload = Box::new(String::from("bang"));
        assert!(matches!(HandlerError::from_panic(&payload), HandlerError::Panic(m) if m == "bang"));

        let payload: PanicPayload = Box::new(42u8);
        assert!(HandlerError::from_panic(&payload).to_string().contains("non-string"));
    }

    #[test]
    fn registration_errors_lift_into_the_top_level_error() {
        let err: GatecastError = RegistrationError::UnsupportedMiddlewareKind(EventKind::GuildJoin).into();
        assert!(matches!(err, GatecastError::Registration(_)));
        assert!(err.to_string().contains("GuildJoin"));
    }
}
