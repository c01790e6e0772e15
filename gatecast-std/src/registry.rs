//! Handler registration.
//!
//! Handlers are registered per [`EventKind`] and type-erased into
//! `DynHandler<S, Event>`, which extracts the typed payload right before the
//! call. The table keeps one list per kind, in registration order.

use crate::event::{Event, Payload};
use gatecast_core::{BoxError, DynHandler, EventKind, Handler, Intents, Middleware, RegistrationError};
use std::{
    collections::HashMap,
    fmt,
    sync::{
        Arc, PoisonError, RwLock,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};
use tokio::sync::mpsc;

/// A handler or middleware with its payload type erased.
pub(crate) type ErasedHandler<S> = Arc<dyn DynHandler<S, Event>>;

/// Erase the payload type of a handler.
///
/// The erased handler silently ignores events `P` can't be extracted from.
pub(crate) fn erase<S, P, H>(handler: H) -> ErasedHandler<S>
where
    S: Send + 'static,
    P: Payload,
    H: Handler<S, P>,
{
    let handler = Arc::new(handler);
    Arc::new(move |state: S, event: Event| {
        let handler = Arc::clone(&handler);
        async move {
            match P::extract(&event) {
                Some(payload) => handler.call(state, payload).await,
                None => Ok::<(), BoxError>(()),
            }
        }
    })
}

/// Identifies a registered handler, see [`Dispatcher::remove`].
///
/// [`Dispatcher::remove`]: crate::Dispatcher::remove
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerToken {
    id: u64,
    kind: EventKind,
}

impl HandlerToken {
    /// The kind the handler was registered for.
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

/// An ordered list of middlewares in front of a handler.
pub struct MiddlewareChain<S> {
    entries: Vec<(EventKind, ErasedHandler<S>)>,
}

impl<S> Default for MiddlewareChain<S> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<S> Clone for MiddlewareChain<S> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<S: Send + 'static> MiddlewareChain<S> {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a middleware.
    pub fn with<P, M>(mut self, middleware: M) -> Self
    where
        P: Payload,
        M: Middleware<S, P>,
    {
        self.entries.push((P::KIND, erase(middleware)));
        self
    }

    /// The number of middlewares in the chain.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Reports whether the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn validate(&self, handler: EventKind) -> Result<(), RegistrationError> {
        for (middleware, _) in &self.entries {
            if !middleware.is_catch_all() && *middleware != handler {
                return Err(RegistrationError::InvalidMiddleware {
                    handler,
                    middleware: *middleware,
                });
            }
        }
        Ok(())
    }
}

impl<S> fmt::Debug for MiddlewareChain<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(kind, _)| kind))
            .finish()
    }
}

/// A handler ready to be registered, together with its middlewares.
///
/// # Example
///
/// ```rust,ignore
/// let registration = Registration::new(on_message)
///     .with(only_humans)
///     .with(|_: Bot, ctx: Context| async move { ctx.set("seen", true) });
///
/// dispatcher.try_add_handler(registration)?;
/// ```
pub struct Registration<S> {
    kind: EventKind,
    handler: ErasedHandler<S>,
    middlewares: MiddlewareChain<S>,
}

impl<S: Send + 'static> Registration<S> {
    /// Wrap a handler. Its kind is taken from its payload type.
    pub fn new<P, H>(handler: H) -> Self
    where
        P: Payload,
        H: Handler<S, P>,
    {
        Self {
            kind: P::KIND,
            handler: erase(handler),
            middlewares: MiddlewareChain::new(),
        }
    }

    /// Register a channel as handler.
    ///
    /// Payloads are delivered with [`mpsc::Sender::try_send`], so a slow
    /// receiver never blocks dispatch. Payloads that don't fit into the
    /// channel, or arrive after the receiver was dropped, are discarded.
    pub fn channel<P: Payload>(sender: mpsc::Sender<P>) -> Self {
        Self::new(move |_: S, payload: P| {
            if let Err(err) = sender.try_send(payload) {
                tracing::trace!(kind = %P::KIND, error = %err, "dropping payload for channel handler");
            }
            async {}
        })
    }

    /// Append a middleware that runs before the handler.
    ///
    /// The middleware must take the handler's payload, [`Event`] or
    /// [`Context`](gatecast_core::Context). This is checked when the
    /// registration is added.
    pub fn with<P, M>(mut self, middleware: M) -> Self
    where
        P: Payload,
        M: Middleware<S, P>,
    {
        self.middlewares = self.middlewares.with(middleware);
        self
    }

    /// Run `chain` before the middlewares added so far.
    pub fn with_chain(mut self, chain: MiddlewareChain<S>) -> Self {
        let mut entries = chain.entries;
        entries.append(&mut self.middlewares.entries);
        self.middlewares.entries = entries;
        self
    }
}

impl<S> Registration<S> {
    /// The kind the handler will be registered for.
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

impl<S> fmt::Debug for Registration<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("kind", &self.kind)
            .field("middlewares", &self.middlewares.entries.len())
            .finish_non_exhaustive()
    }
}

/// Conversion into a [`Registration`].
///
/// Implemented for registrations themselves and for every [`Handler`], so
/// plain handlers can be registered without wrapping them first. `M` only
/// disambiguates the two.
pub trait IntoRegistration<S, M> {
    /// Convert into a registration.
    fn into_registration(self) -> Registration<S>;
}

impl<S> IntoRegistration<S, ()> for Registration<S> {
    fn into_registration(self) -> Registration<S> {
        self
    }
}

impl<S, P, H> IntoRegistration<S, (P,)> for H
where
    S: Send + 'static,
    P: Payload,
    H: Handler<S, P>,
{
    fn into_registration(self) -> Registration<S> {
        Registration::new(self)
    }
}

/// A set of handlers registered together.
///
/// # Example
///
/// ```rust,ignore
/// struct Moderation;
///
/// impl HandlerGroup<Bot> for Moderation {
///     fn registrations(self) -> Vec<Registration<Bot>> {
///         vec![Registration::new(on_ban), Registration::new(on_message)]
///     }
/// }
///
/// dispatcher.add_group(Moderation, MiddlewareChain::new().with(log_everything));
/// ```
pub trait HandlerGroup<S> {
    /// The handlers of the group.
    fn registrations(self) -> Vec<Registration<S>>;
}

impl<S> HandlerGroup<S> for Vec<Registration<S>> {
    fn registrations(self) -> Vec<Registration<S>> {
        self
    }
}

/// A handler as stored in the table.
pub(crate) struct Registered<S> {
    pub(crate) token: HandlerToken,
    pub(crate) handler: ErasedHandler<S>,
    pub(crate) middlewares: Vec<ErasedHandler<S>>,
    /// Set for one-shot handlers; flipped by the first invocation attempt.
    pub(crate) once: Option<AtomicBool>,
}

impl<S> std::fmt::Debug for Registered<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registered")
            .field("token", &self.token)
            .field("middlewares", &self.middlewares.len())
            .field("once", &self.once)
            .finish_non_exhaustive()
    }
}

impl<S> Registered<S> {
    /// Claim the right to run. Always succeeds for regular handlers, and
    /// exactly once for one-shot handlers.
    pub(crate) fn claim(&self) -> bool {
        match &self.once {
            Some(fired) => !fired.swap(true, Ordering::AcqRel),
            None => true,
        }
    }

    pub(crate) fn is_once(&self) -> bool {
        self.once.is_some()
    }
}

/// The registration table: kind → handlers in registration order.
pub(crate) struct HandlerTable<S> {
    handlers: RwLock<HashMap<EventKind, Vec<Arc<Registered<S>>>>>,
    next_id: AtomicU64,
}

impl<S> Default for HandlerTable<S> {
    fn default() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }
}

impl<S: Send + 'static> HandlerTable<S> {
    /// Validate and prepare a registration without inserting it.
    pub(crate) fn prepare(
        &self,
        registration: Registration<S>,
        once: bool,
    ) -> Result<Registered<S>, RegistrationError> {
        registration.middlewares.validate(registration.kind)?;

        let token = HandlerToken {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            kind: registration.kind,
        };
        Ok(Registered {
            token,
            handler: registration.handler,
            middlewares: registration
                .middlewares
                .entries
                .into_iter()
                .map(|(_, m)| m)
                .collect(),
            once: once.then(|| AtomicBool::new(false)),
        })
    }

    /// Insert prepared handlers, keeping their order.
    pub(crate) fn insert(&self, registered: impl IntoIterator<Item = Registered<S>>) -> Vec<HandlerToken> {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        registered
            .into_iter()
            .map(|r| {
                let token = r.token;
                handlers.entry(token.kind).or_default().push(Arc::new(r));
                token
            })
            .collect()
    }
}

impl<S> HandlerTable<S> {
    /// Remove a handler. Returns `false` if it was already gone.
    pub(crate) fn remove(&self, token: HandlerToken) -> bool {
        let mut handlers = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        let Some(list) = handlers.get_mut(&token.kind) else {
            return false;
        };
        let Some(pos) = list.iter().position(|r| r.token == token) else {
            return false;
        };
        list.remove(pos);
        if list.is_empty() {
            handlers.remove(&token.kind);
        }
        true
    }

    /// Snapshot the handlers of `kinds`, in the given kind order.
    pub(crate) fn snapshot(&self, kinds: &[EventKind]) -> Vec<Arc<Registered<S>>> {
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        kinds
            .iter()
            .filter_map(|kind| handlers.get(kind))
            .flat_map(|list| list.iter().cloned())
            .collect()
    }

    /// The number of handlers registered for `kind`.
    pub(crate) fn count(&self, kind: EventKind) -> usize {
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        handlers.get(&kind).map_or(0, Vec::len)
    }

    /// The union of the intents of all kinds with at least one handler.
    pub(crate) fn intents(&self) -> Intents {
        let handlers = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
        handlers
            .iter()
            .filter(|(kind, list)| !kind.is_catch_all() && !list.is_empty())
            .fold(Intents::empty(), |acc, (kind, _)| acc | kind.intents())
    }
}
