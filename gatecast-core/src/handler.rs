//! # Handlers and middlewares
//!
//! A handler is any async function taking the state handle and a payload:
//!
//! ```rust,ignore
//! async fn on_message(state: Bot, event: MessageCreate) -> Result<(), BoxError> {
//!     state.reply(&event, "pong").await?;
//!     Ok(())
//! }
//! ```
//!
//! Middlewares share the exact same shape. What sets them apart is where
//! they are registered and what their result means: a middleware returning
//! [`Filtered`] stops the chain it belongs to, while a handler's result is
//! only ever reported.
//!
//! The return type may be `()` or `Result<(), E>` for any `E` convertible
//! into a [`BoxError`], see [`IntoOutcome`].
//!
//! [`Filtered`]: crate::Filtered

use crate::error::BoxError;
use std::{future::Future, pin::Pin};

/// Conversion of a handler's return value into its outcome.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid handler return type",
    label = "handlers must return `()` or `Result<(), E>`",
    note = "The error type `E` must be convertible into `BoxError`."
)]
pub trait IntoOutcome {
    /// Convert the return value into success or a boxed error.
    fn into_outcome(self) -> Result<(), BoxError>;
}

impl IntoOutcome for () {
    fn into_outcome(self) -> Result<(), BoxError> {
        Ok(())
    }
}

impl<E> IntoOutcome for Result<(), E>
where
    E: Into<BoxError>,
{
    fn into_outcome(self) -> Result<(), BoxError> {
        self.map_err(Into::into)
    }
}

/// An async event handler (or middleware) for payloads of type `P`.
///
/// # Static vs Dynamic Dispatch
///
/// This trait uses native `async fn` for zero-cost static dispatch. The
/// dispatcher stores handlers behind [`DynHandler`], which every `Handler`
/// implements automatically.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot handle payloads of type `{P}`",
    label = "missing `Handler<{S}, {P}>` implementation",
    note = "Handlers are async functions of the form `Fn({S}, {P}) -> impl Future<Output = ()>` or `Result<(), E>`."
)]
pub trait Handler<S, P>: Send + Sync + 'static {
    /// Handle one payload.
    fn call(&self, state: S, payload: P) -> impl Future<Output = Result<(), BoxError>> + Send;
}

/// Middlewares are handlers whose error result carries meaning.
pub use Handler as Middleware;

// Blanket impl for closures
impl<F, S, P, Fut> Handler<S, P> for F
where
    F: Fn(S, P) -> Fut + Send + Sync + 'static,
    Fut: Future + Send,
    Fut::Output: IntoOutcome,
{
    fn call(&self, state: S, payload: P) -> impl Future<Output = Result<(), BoxError>> + Send {
        let fut = (self)(state, payload);
        async move { fut.await.into_outcome() }
    }
}

/// A boxed handler future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Dynamic object-safe version of [`Handler`].
pub trait DynHandler<S, P>: Send + Sync + 'static {
    /// Handle one payload (dynamic dispatch version).
    fn call_dyn(&self, state: S, payload: P) -> BoxFuture<'_, Result<(), BoxError>>;
}

impl<S, P, T> DynHandler<S, P> for T
where
    S: 'static,
    P: 'static,
    T: Handler<S, P>,
{
    fn call_dyn(&self, state: S, payload: P) -> BoxFuture<'_, Result<(), BoxError>> {
        Box::pin(self.call(state, payload))
    }
}
