//! The dispatch engine.
//!
//! # Pipeline
//!
//! For every event:
//!
//! 1. the global middlewares for its kind run one after another, in
//!    registration order;
//! 2. unless one of them stopped the event, every handler for its kind, and
//!    every [`EventKind::Any`] and [`EventKind::Context`] handler, is spawned
//!    on its own task;
//! 3. a GuildCreate or GuildDelete additionally spawns the handlers of the
//!    situational kind the [`GuildTracker`] picked (but not the catch-all
//!    handlers a second time), again only if step 1 didn't stop.
//!
//! Ready, GuildCreate and GuildDelete update the tracker before step 1, in
//! the order they arrived, whatever the middlewares decide.
//!
//! Each handler task forks the event context, runs the handler's own
//! middlewares and finally the handler.
//!
//! # Errors and panics
//!
//! A middleware or handler returning [`Filtered`] stops its chain silently.
//! Any other error is passed to the error handler, and a panic is caught and
//! passed to the panic handler; both stop the chain as well. Nothing ever
//! escapes into the dispatcher itself.
//!
//! [`Filtered`]: gatecast_core::Filtered

use crate::{
    classify::classify,
    event::{
        Event, GuildAvailableEvent, GuildJoinEvent, GuildLeaveEvent, GuildReadyEvent,
        GuildUnavailableEvent, Payload,
    },
    guild::{GuildArrival, GuildDeparture, GuildTracker},
    middleware::MiddlewareTable,
    registry::{
        HandlerGroup, HandlerTable, HandlerToken, IntoRegistration, MiddlewareChain, Registered,
        Registration, erase,
    },
};
use futures::FutureExt;
use gatecast_core::{
    BoxError, BoxFuture, EventKind, GatecastError, GatewayEvent, HandlerError, Intents,
    LifecycleError, Middleware, NoopStore, PanicPayload, RegistrationError, Store, is_filtered,
};
use std::{
    fmt,
    panic::AssertUnwindSafe,
    sync::{Arc, Mutex, PoisonError},
};
use tokio::sync::mpsc;
use tokio_util::{sync::CancellationToken, task::TaskTracker};

type ErrorHandlerFn = Arc<dyn Fn(BoxError) + Send + Sync>;
type PanicHandlerFn = Arc<dyn Fn(PanicPayload) + Send + Sync>;
type PendingMiddleware<S> = Box<dyn FnOnce(&Dispatcher<S>) -> Result<(), RegistrationError>>;

/// Whether a chain may go on after one of its links ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Next,
    Stop,
}

struct Inner<S> {
    state: S,
    store: Arc<dyn Store>,
    handlers: HandlerTable<S>,
    middlewares: MiddlewareTable<S>,
    guilds: GuildTracker,
    on_error: ErrorHandlerFn,
    on_panic: PanicHandlerFn,
    tasks: TaskTracker,
    shutdown: Mutex<Option<CancellationToken>>,
}

/// Dispatches gateway events to handlers.
///
/// `S` is the state handle every handler and middleware receives, typically
/// an `Arc` around the bot's shared state. Cloning a dispatcher is cheap and
/// yields a handle to the same tables.
///
/// # Example
///
/// ```rust,ignore
/// let dispatcher = Dispatcher::new(bot);
///
/// dispatcher.add_middleware(|_: Bot, e: MessageCreateEvent| async move {
///     if e.author.bot { Err(Filtered) } else { Ok(()) }
/// });
/// dispatcher.add_handler(|bot: Bot, e: MessageCreateEvent| async move {
///     bot.reply(&e, "pong").await
/// });
///
/// dispatcher.open(events)?;
/// // ...
/// dispatcher.close().await;
/// ```
pub struct Dispatcher<S> {
    inner: Arc<Inner<S>>,
}

impl<S> Clone for Dispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> fmt::Debug for Dispatcher<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("tasks", &self.inner.tasks.len())
            .field("guilds", &self.inner.guilds)
            .finish_non_exhaustive()
    }
}

impl<S> Dispatcher<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Create a dispatcher with default settings.
    pub fn new(state: S) -> Self {
        DispatcherBuilder::new(state).build()
    }

    /// Start configuring a dispatcher.
    pub fn builder(state: S) -> DispatcherBuilder<S> {
        DispatcherBuilder::new(state)
    }

    /// The state handle passed to handlers.
    pub fn state(&self) -> &S {
        &self.inner.state
    }

    /// The guild lifecycle tracker.
    pub fn guilds(&self) -> &GuildTracker {
        &self.inner.guilds
    }

    // ------------------------------------------------------------------
    // Registration
    // ------------------------------------------------------------------

    /// Register a handler.
    ///
    /// Accepts a plain handler or a [`Registration`](crate::Registration)
    /// carrying middlewares. Fails if one of those middlewares doesn't fit
    /// the handler.
    pub fn try_add_handler<M>(
        &self,
        handler: impl IntoRegistration<S, M>,
    ) -> Result<HandlerToken, RegistrationError> {
        self.register(handler, false)
    }

    /// Register a handler.
    ///
    /// # Panics
    ///
    /// Panics if [`try_add_handler`](Self::try_add_handler) would fail.
    pub fn add_handler<M>(&self, handler: impl IntoRegistration<S, M>) -> HandlerToken {
        self.try_add_handler(handler)
            .unwrap_or_else(|err| panic!("failed to add handler: {err}"))
    }

    /// Register a handler that runs at most once.
    ///
    /// The handler removes itself after its first invocation attempt, even
    /// if one of its middlewares filtered the event.
    pub fn try_add_handler_once<M>(
        &self,
        handler: impl IntoRegistration<S, M>,
    ) -> Result<HandlerToken, RegistrationError> {
        self.register(handler, true)
    }

    /// Register a handler that runs at most once.
    ///
    /// # Panics
    ///
    /// Panics if [`try_add_handler_once`](Self::try_add_handler_once) would
    /// fail.
    pub fn add_handler_once<M>(&self, handler: impl IntoRegistration<S, M>) -> HandlerToken {
        self.try_add_handler_once(handler)
            .unwrap_or_else(|err| panic!("failed to add handler: {err}"))
    }

    /// Register every handler of a group, each behind `middlewares`.
    ///
    /// Either all handlers are added or, if one of them is invalid, none.
    pub fn try_add_group<G: HandlerGroup<S>>(
        &self,
        group: G,
        middlewares: MiddlewareChain<S>,
    ) -> Result<Vec<HandlerToken>, RegistrationError> {
        let prepared = group
            .registrations()
            .into_iter()
            .map(|r| {
                self.inner
                    .handlers
                    .prepare(r.with_chain(middlewares.clone()), false)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let tokens = self.inner.handlers.insert(prepared);
        tracing::debug!(count = tokens.len(), "added handler group");
        Ok(tokens)
    }

    /// Register every handler of a group, each behind `middlewares`.
    ///
    /// # Panics
    ///
    /// Panics if [`try_add_group`](Self::try_add_group) would fail.
    pub fn add_group<G: HandlerGroup<S>>(
        &self,
        group: G,
        middlewares: MiddlewareChain<S>,
    ) -> Vec<HandlerToken> {
        self.try_add_group(group, middlewares)
            .unwrap_or_else(|err| panic!("failed to add handler group: {err}"))
    }

    /// Register a global middleware.
    ///
    /// Global middlewares run before any handler of an event is started, in
    /// the order they were added. Middlewares for situational kinds are
    /// rejected, since situational events bypass the global chain.
    pub fn try_add_middleware<P, M>(&self, middleware: M) -> Result<(), RegistrationError>
    where
        P: Payload,
        M: Middleware<S, P>,
    {
        if P::KIND.is_situational() {
            return Err(RegistrationError::UnsupportedMiddlewareKind(P::KIND));
        }

        self.inner.middlewares.add(P::KIND, erase(middleware));
        tracing::debug!(kind = %P::KIND, "added global middleware");
        Ok(())
    }

    /// Register a global middleware.
    ///
    /// # Panics
    ///
    /// Panics if [`try_add_middleware`](Self::try_add_middleware) would fail.
    pub fn add_middleware<P, M>(&self, middleware: M)
    where
        P: Payload,
        M: Middleware<S, P>,
    {
        self.try_add_middleware(middleware)
            .unwrap_or_else(|err| panic!("failed to add middleware: {err}"));
    }

    /// Remove a handler. Returns `false` if it was already removed.
    ///
    /// Handler tasks that were already started run to completion.
    pub fn remove(&self, token: HandlerToken) -> bool {
        let removed = self.inner.handlers.remove(token);
        if removed {
            tracing::debug!(kind = %token.kind(), "removed handler");
        }
        removed
    }

    /// The number of handlers currently registered for `kind`.
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.inner.handlers.count(kind)
    }

    /// The intents needed to receive every event that has a handler or a
    /// global middleware.
    ///
    /// Catch-all handlers and middlewares don't contribute.
    pub fn derive_intents(&self) -> Intents {
        self.inner.handlers.intents() | self.inner.middlewares.intents()
    }

    fn register<M>(
        &self,
        handler: impl IntoRegistration<S, M>,
        once: bool,
    ) -> Result<HandlerToken, RegistrationError> {
        let prepared = self
            .inner
            .handlers
            .prepare(handler.into_registration(), once)?;
        let token = prepared.token;
        self.inner.handlers.insert([prepared]);
        tracing::debug!(kind = %token.kind(), once, "added handler");
        Ok(token)
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Dispatch an event manually.
    ///
    /// Returns once the global middlewares have run and the handler tasks
    /// are spawned. Use [`close`](Self::close) to wait for the handlers.
    pub async fn call(&self, event: impl Into<Event>) {
        let event = event.into();
        let situational = self.track_guilds(&event);
        self.dispatch(event, situational).await;
    }

    /// Run the global chain of `event`, then fan out to the raw and
    /// situational handlers. The tracker must already have seen `event`.
    async fn dispatch(&self, event: Event, situational: Option<Event>) {
        tracing::trace!(kind = %event.kind(), "dispatching event");

        if self.run_global_middlewares(&event).await == Flow::Stop {
            return;
        }
        self.fan_out(&event, false);
        if let Some(situational) = situational {
            self.fan_out(&situational, true);
        }
    }

    async fn run_global_middlewares(&self, event: &Event) -> Flow {
        for entry in self.inner.middlewares.chain_for(event.kind()) {
            let fut = entry
                .middleware
                .call_dyn(self.inner.state.clone(), event.clone());
            if self.inner.guard(fut).await == Flow::Stop {
                return Flow::Stop;
            }
        }
        Flow::Next
    }

    /// Spawn one task per handler. A direct dispatch skips the catch-all
    /// handlers.
    fn fan_out(&self, event: &Event, direct: bool) {
        let all = [EventKind::Any, EventKind::Context, event.kind()];
        let kinds = if direct { &all[2..] } else { &all[..] };

        for registered in self.inner.handlers.snapshot(kinds) {
            let inner = Arc::clone(&self.inner);
            let event = event.clone();
            self.inner.tasks.spawn(async move {
                inner.run_handler(&registered, event).await;
            });
        }
    }

    /// Feed the tracker and build the situational event, if any.
    fn track_guilds(&self, event: &Event) -> Option<Event> {
        let guilds = &self.inner.guilds;
        match event {
            Event::Ready(e) => {
                guilds.ready(&e.event);
                None
            }
            Event::GuildCreate(e) => {
                let arrival = guilds.guild_create(&e.event);
                tracing::trace!(guild = %e.id, kind = %arrival.kind(), "guild arrived");
                Some(match arrival {
                    GuildArrival::Ready => GuildReadyEvent(e.clone()).into(),
                    GuildArrival::Available => GuildAvailableEvent(e.clone()).into(),
                    GuildArrival::Join => GuildJoinEvent(e.clone()).into(),
                })
            }
            Event::GuildDelete(e) => {
                let departure = guilds.guild_delete(&e.event);
                tracing::trace!(guild = %e.id, kind = %departure.kind(), "guild departed");
                Some(match departure {
                    GuildDeparture::Leave => GuildLeaveEvent(e.clone()).into(),
                    GuildDeparture::Unavailable => GuildUnavailableEvent(e.clone()).into(),
                })
            }
            _ => None,
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Start reading raw events from `events`.
    ///
    /// Every event is classified and fed to the guild tracker in the order
    /// it was read, then dispatched on its own task. Reading
    /// stops when [`close`](Self::close) is called or the channel is closed.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn open(&self, mut events: mpsc::Receiver<GatewayEvent>) -> Result<(), LifecycleError> {
        let token = {
            let mut shutdown = self.inner.shutdown.lock().unwrap_or_else(PoisonError::into_inner);
            if shutdown.is_some() {
                return Err(LifecycleError::AlreadyOpen);
            }
            let token = CancellationToken::new();
            *shutdown = Some(token.clone());
            token
        };

        let dispatcher = self.clone();
        self.inner.tasks.spawn(async move {
            tracing::debug!("listening for gateway events");
            loop {
                let raw = tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    raw = events.recv() => match raw {
                        Some(raw) => raw,
                        None => break,
                    },
                };

                let Some(event) = classify(raw, dispatcher.inner.store.as_ref()) else {
                    continue;
                };
                // Guild bookkeeping follows arrival order, not task order.
                let situational = dispatcher.track_guilds(&event);
                let worker = dispatcher.clone();
                dispatcher.inner.tasks.spawn(async move {
                    worker.dispatch(event, situational).await;
                });
            }
            tracing::debug!("stopped listening for gateway events");
        });

        Ok(())
    }

    /// Stop reading events and wait for every in-flight dispatch and handler
    /// task to finish.
    ///
    /// Handlers keep running while the dispatcher waits, and tasks they
    /// spawn through the dispatcher are waited for as well. Afterwards the
    /// dispatcher can be opened again.
    pub async fn close(&self) {
        let token = self
            .inner
            .shutdown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(token) = token {
            token.cancel();
        }

        self.inner.tasks.close();
        self.inner.tasks.wait().await;
        self.inner.tasks.reopen();
        tracing::debug!("dispatcher closed");
    }

    /// Reports whether the read loop was opened and not closed since.
    pub fn is_open(&self) -> bool {
        self.inner
            .shutdown
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl<S> Inner<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Run one link of a chain, containing its errors and panics.
    async fn guard(&self, fut: BoxFuture<'_, Result<(), BoxError>>) -> Flow {
        match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(Ok(())) => Flow::Next,
            Ok(Err(err)) if is_filtered(&err) => Flow::Stop,
            Ok(Err(err)) => {
                (self.on_error)(err);
                Flow::Stop
            }
            Err(panic) => {
                (self.on_panic)(panic);
                Flow::Stop
            }
        }
    }

    async fn run_handler(&self, registered: &Registered<S>, event: Event) {
        if !registered.claim() {
            return;
        }

        let event = event.fork();
        let mut flow = Flow::Next;
        for middleware in &registered.middlewares {
            flow = self
                .guard(middleware.call_dyn(self.state.clone(), event.clone()))
                .await;
            if flow == Flow::Stop {
                break;
            }
        }

        if flow == Flow::Next {
            self.guard(registered.handler.call_dyn(self.state.clone(), event))
                .await;
        }

        if registered.is_once() {
            self.handlers.remove(registered.token);
        }
    }
}

/// Configures a [`Dispatcher`].
///
/// # Example
///
/// ```rust,ignore
/// let dispatcher = Dispatcher::builder(bot)
///     .store(cache.clone())
///     .error_handler(|err| metrics::increment_counter!("handler_errors"))
///     .build();
/// ```
pub struct DispatcherBuilder<S> {
    state: S,
    store: Arc<dyn Store>,
    on_error: Option<ErrorHandlerFn>,
    on_panic: Option<PanicHandlerFn>,
    handlers: Vec<Registration<S>>,
    middlewares: Vec<PendingMiddleware<S>>,
}

impl<S> DispatcherBuilder<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Start with the given state, no entity cache and logging error and
    /// panic handlers.
    pub fn new(state: S) -> Self {
        Self {
            state,
            store: Arc::new(NoopStore),
            on_error: None,
            on_panic: None,
            handlers: Vec::new(),
            middlewares: Vec::new(),
        }
    }

    /// Set the entity cache used to fill in old values.
    pub fn store(mut self, store: impl Store) -> Self {
        self.store = Arc::new(store);
        self
    }

    /// Set the function receiving handler and middleware errors.
    pub fn error_handler<F>(mut self, f: F) -> Self
    where
        F: Fn(BoxError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(f));
        self
    }

    /// Set the function receiving recovered panics.
    pub fn panic_handler<F>(mut self, f: F) -> Self
    where
        F: Fn(PanicPayload) + Send + Sync + 'static,
    {
        self.on_panic = Some(Arc::new(f));
        self
    }

    /// Register a handler on the built dispatcher.
    pub fn handler<M>(mut self, handler: impl IntoRegistration<S, M>) -> Self {
        self.handlers.push(handler.into_registration());
        self
    }

    /// Register a global middleware on the built dispatcher, after the
    /// handlers.
    pub fn middleware<P, M>(mut self, middleware: M) -> Self
    where
        P: Payload,
        M: Middleware<S, P>,
    {
        self.middlewares
            .push(Box::new(move |dispatcher: &Dispatcher<S>| {
                dispatcher.try_add_middleware(middleware)
            }));
        self
    }

    /// Build the dispatcher.
    ///
    /// # Panics
    ///
    /// Panics if [`try_build`](Self::try_build) would fail.
    pub fn build(self) -> Dispatcher<S> {
        self.try_build()
            .unwrap_or_else(|err| panic!("failed to build dispatcher: {err}"))
    }

    /// Build the dispatcher and apply the registrations collected so far.
    ///
    /// Fails on the first registration the dispatcher rejects.
    pub fn try_build(self) -> Result<Dispatcher<S>, GatecastError> {
        let on_error = self.on_error.unwrap_or_else(|| {
            Arc::new(|err: BoxError| tracing::error!(error = %err, "event handler error"))
        });
        let on_panic = self.on_panic.unwrap_or_else(|| {
            Arc::new(|payload: PanicPayload| {
                let err = HandlerError::from_panic(&payload);
                tracing::error!(panic = %err, "event handler panicked");
            })
        });

        let dispatcher = Dispatcher {
            inner: Arc::new(Inner {
                state: self.state,
                store: self.store,
                handlers: HandlerTable::default(),
                middlewares: MiddlewareTable::default(),
                guilds: GuildTracker::new(),
                on_error,
                on_panic,
                tasks: TaskTracker::new(),
                shutdown: Mutex::new(None),
            }),
        };

        for registration in self.handlers {
            dispatcher.try_add_handler(registration)?;
        }
        for add in self.middlewares {
            add(&dispatcher)?;
        }
        Ok(dispatcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        event::{MessageCreateEvent, ReadyEvent},
        testing::{Recorder, message_create},
    };
    use gatecast_core::{Context, Filtered};
    use std::sync::atomic::{AtomicUsize, Ordering};

    type State = ();

    async fn handler_blows_up(_: State, _: MessageCreateEvent) {
        panic!("handler blew up");
    }

    async fn middleware_blows_up(_: State, _: Context) {
        panic!("middleware blew up");
    }

    fn counting(errors: &Arc<AtomicUsize>, panics: &Arc<AtomicUsize>) -> Dispatcher<State> {
        let errors = Arc::clone(errors);
        let panics = Arc::clone(panics);
        Dispatcher::builder(())
            .error_handler(move |_| {
                errors.fetch_add(1, Ordering::SeqCst);
            })
            .panic_handler(move |_| {
                panics.fetch_add(1, Ordering::SeqCst);
            })
            .build()
    }

    #[tokio::test]
    async fn handlers_receive_their_kind_only() {
        let dispatcher = Dispatcher::new(());
        let recorder = Recorder::new();

        let rec = recorder.clone();
        dispatcher.add_handler(move |_: State, _: MessageCreateEvent| {
            rec.record("message");
            async {}
        });
        let rec = recorder.clone();
        dispatcher.add_handler(move |_: State, _: ReadyEvent| {
            rec.record("ready");
            async {}
        });

        dispatcher.call(message_create("hi")).await;
        dispatcher.close().await;

        assert_eq!(recorder.entries(), vec!["message"]);
    }

    #[tokio::test]
    async fn catch_all_handlers_see_every_event() {
        let dispatcher = Dispatcher::new(());
        let recorder = Recorder::new();

        let rec = recorder.clone();
        dispatcher.add_handler(move |_: State, e: Event| {
            rec.record(e.kind().name());
            async {}
        });
        let rec = recorder.clone();
        dispatcher.add_handler(move |_: State, _: Context| {
            rec.record("context");
            async {}
        });

        dispatcher.call(message_create("hi")).await;
        dispatcher.close().await;

        let mut seen = recorder.entries();
        seen.sort();
        assert_eq!(seen, vec!["MessageCreate", "context"]);
    }

    #[tokio::test]
    async fn filtered_global_middleware_is_not_reported() {
        let errors = Arc::new(AtomicUsize::new(0));
        let panics = Arc::new(AtomicUsize::new(0));
        let dispatcher = counting(&errors, &panics);
        let recorder = Recorder::new();

        dispatcher.add_middleware(|_: State, _: Event| async { Err::<(), _>(Filtered) });
        let rec = recorder.clone();
        dispatcher.add_handler(move |_: State, _: MessageCreateEvent| {
            rec.record("handler");
            async {}
        });

        dispatcher.call(message_create("hi")).await;
        dispatcher.close().await;

        assert!(recorder.is_empty());
        assert_eq!(errors.load(Ordering::SeqCst), 0);
        assert_eq!(panics.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn errors_and_panics_are_contained() {
        let errors = Arc::new(AtomicUsize::new(0));
        let panics = Arc::new(AtomicUsize::new(0));
        let dispatcher = counting(&errors, &panics);
        let recorder = Recorder::new();

        dispatcher.add_handler(|_: State, _: MessageCreateEvent| async {
            Err::<(), BoxError>("nope".into())
        });
        dispatcher.add_handler(handler_blows_up);
        let rec = recorder.clone();
        dispatcher.add_handler(move |_: State, _: MessageCreateEvent| {
            rec.record("survivor");
            async {}
        });

        dispatcher.call(message_create("hi")).await;
        dispatcher.close().await;

        assert_eq!(errors.load(Ordering::SeqCst), 1);
        assert_eq!(panics.load(Ordering::SeqCst), 1);
        assert_eq!(recorder.entries(), vec!["survivor"]);
    }

    #[tokio::test]
    async fn panicking_global_middleware_stops_the_event() {
        let errors = Arc::new(AtomicUsize::new(0));
        let panics = Arc::new(AtomicUsize::new(0));
        let dispatcher = counting(&errors, &panics);
        let recorder = Recorder::new();

        dispatcher.add_middleware(middleware_blows_up);
        let rec = recorder.clone();
        dispatcher.add_handler(move |_: State, _: Event| {
            rec.record("handler");
            async {}
        });

        dispatcher.call(message_create("hi")).await;
        dispatcher.close().await;

        assert!(recorder.is_empty());
        assert_eq!(panics.load(Ordering::SeqCst), 1);
        assert_eq!(errors.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn situational_middlewares_are_rejected() {
        use crate::event::GuildJoinEvent;

        let dispatcher = Dispatcher::new(());
        let err = dispatcher
            .try_add_middleware(|_: State, _: GuildJoinEvent| async {})
            .unwrap_err();
        assert_eq!(err, RegistrationError::UnsupportedMiddlewareKind(EventKind::GuildJoin));
        assert!(dispatcher.derive_intents().is_empty());
    }

    #[tokio::test]
    async fn open_twice_fails() {
        let dispatcher = Dispatcher::new(());
        let (_tx, rx) = mpsc::channel(1);
        let (_tx2, rx2) = mpsc::channel(1);

        dispatcher.open(rx).unwrap();
        assert!(dispatcher.is_open());
        assert_eq!(dispatcher.open(rx2), Err(LifecycleError::AlreadyOpen));

        dispatcher.close().await;
        assert!(!dispatcher.is_open());
    }
}
