//! Logging middleware for event observation.

use crate::event::Event;
use gatecast_core::{BoxError, Handler};

/// A middleware that logs every event it sees.
///
/// Register it as a global middleware for [`Event`] to trace everything the
/// dispatcher receives:
///
/// ```rust,ignore
/// dispatcher.add_middleware::<Event, _>(LoggingMiddleware);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMiddleware;

impl<S: Send + 'static> Handler<S, Event> for LoggingMiddleware {
    async fn call(&self, _state: S, event: Event) -> Result<(), BoxError> {
        tracing::debug!(kind = %event.kind(), context = event.context().len(), "processing event");
        Ok(())
    }
}
