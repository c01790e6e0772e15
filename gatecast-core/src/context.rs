//! # Per-event context
//!
//! Every event dispatched by gatecast carries a [`Context`]: a small
//! key-value store that lets middlewares hand data forward to the
//! middlewares and handlers that run after them for the same event.
//!
//! # Sharing and forking
//!
//! Cloning a `Context` yields a second handle to the *same* store, so a value
//! set through one handle is visible through all others. [`Context::fork`]
//! copies the map instead. The dispatcher forks once per handler, which
//! means:
//!
//! - every handler starts from the state left by the global middlewares,
//! - a handler (and its own middlewares) can't observe writes made by
//!   concurrently running handlers.
//!
//! Forking copies the map only; values are reference counted and shared.
//!
//! # Keys
//!
//! Values are stored either under a name ([`Context::set`]) or under their
//! own type ([`Context::insert`]), similar to `http::Extensions`.
//!
//! ```rust,ignore
//! ctx.set("invoker", user_id);
//! ctx.insert(Locale::De);
//!
//! let user_id: Option<UserId> = ctx.get("invoker");
//! let locale: Option<Locale> = ctx.extract();
//! ```

use std::{
    any::{Any, TypeId},
    borrow::Cow,
    collections::HashMap,
    fmt,
    sync::{Arc, PoisonError, RwLock},
};

type Value = Arc<dyn Any + Send + Sync>;

/// The key under which a context value is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContextKey {
    /// A named key.
    Name(Cow<'static, str>),
    /// A key derived from the type of the stored value.
    Type(TypeId),
}

impl ContextKey {
    /// The key used by [`Context::insert`] for values of type `V`.
    pub fn of<V: Any>() -> Self {
        ContextKey::Type(TypeId::of::<V>())
    }
}

impl From<&'static str> for ContextKey {
    fn from(name: &'static str) -> Self {
        ContextKey::Name(Cow::Borrowed(name))
    }
}

impl From<String> for ContextKey {
    fn from(name: String) -> Self {
        ContextKey::Name(Cow::Owned(name))
    }
}

/// The key-value store attached to every dispatched event.
#[derive(Clone, Default)]
pub struct Context {
    vars: Arc<RwLock<HashMap<ContextKey, Value>>>,
}

impl Context {
    /// Create an empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy this context into a new, independent store.
    ///
    /// Values themselves are shared, only the map is copied.
    pub fn fork(&self) -> Self {
        let vars = self.read(|vars| vars.clone());
        Self {
            vars: Arc::new(RwLock::new(vars)),
        }
    }

    /// Store `value` under `key`, replacing any previous value.
    pub fn set<V>(&self, key: impl Into<ContextKey>, value: V)
    where
        V: Any + Send + Sync,
    {
        let key = key.into();
        self.write(move |vars| {
            vars.insert(key, Arc::new(value));
        });
    }

    /// Store `value` keyed by its own type.
    pub fn insert<V>(&self, value: V)
    where
        V: Any + Send + Sync,
    {
        self.set(ContextKey::of::<V>(), value);
    }

    /// Look up the raw value stored under `key`.
    ///
    /// Returns `None` if nothing was stored under that key.
    pub fn lookup(&self, key: impl Into<ContextKey>) -> Option<Arc<dyn Any + Send + Sync>> {
        let key = key.into();
        self.read(|vars| vars.get(&key).cloned())
    }

    /// Get a shared handle to the value stored under `key`.
    ///
    /// Returns `None` if there is no such value, or if it is not a `V`.
    pub fn get_arc<V>(&self, key: impl Into<ContextKey>) -> Option<Arc<V>>
    where
        V: Any + Send + Sync,
    {
        self.lookup(key)?.downcast::<V>().ok()
    }

    /// Get a clone of the value stored under `key`.
    pub fn get<V>(&self, key: impl Into<ContextKey>) -> Option<V>
    where
        V: Any + Send + Sync + Clone,
    {
        self.get_arc::<V>(key).map(|v| V::clone(&v))
    }

    /// Get a clone of the value stored by [`Context::insert`].
    pub fn extract<V>(&self) -> Option<V>
    where
        V: Any + Send + Sync + Clone,
    {
        self.get(ContextKey::of::<V>())
    }

    /// Reports whether a value is stored under `key`.
    pub fn contains(&self, key: impl Into<ContextKey>) -> bool {
        let key = key.into();
        self.read(|vars| vars.contains_key(&key))
    }

    /// Remove the value stored under `key`, returning it.
    pub fn remove(&self, key: impl Into<ContextKey>) -> Option<Arc<dyn Any + Send + Sync>> {
        let key = key.into();
        self.write(move |vars| vars.remove(&key))
    }

    /// The number of stored values.
    pub fn len(&self) -> usize {
        self.read(|vars| vars.len())
    }

    /// Reports whether the context holds no values.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reports whether both handles point to the same store.
    pub fn ptr_eq(&self, other: &Context) -> bool {
        Arc::ptr_eq(&self.vars, &other.vars)
    }

    fn read<R>(&self, f: impl FnOnce(&HashMap<ContextKey, Value>) -> R) -> R {
        let guard = self.vars.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn write<R>(&self, f: impl FnOnce(&mut HashMap<ContextKey, Value>) -> R) -> R {
        let mut guard = self.vars.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys = self.read(|vars| vars.keys().cloned().collect::<Vec<_>>());
        f.debug_struct("Context").field("keys", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Locale(&'static str);

    #[test]
    fn named_values_round_trip() {
        let ctx = Context::new();
        ctx.set("answer", 42u64);

        assert_eq!(ctx.get::<u64>("answer"), Some(42));
        assert!(ctx.contains("answer"));
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn wrong_type_is_not_found() {
        let ctx = Context::new();
        ctx.set("answer", 42u64);

        assert_eq!(ctx.get::<i32>("answer"), None);
        assert!(ctx.lookup("answer").is_some());
    }

    #[test]
    fn typed_values_use_their_type_as_key() {
        let ctx = Context::new();
        ctx.insert(Locale("de"));

        assert_eq!(ctx.extract::<Locale>(), Some(Locale("de")));
        assert!(ctx.contains(ContextKey::of::<Locale>()));
    }

    #[test]
    fn clones_share_the_store() {
        let ctx = Context::new();
        let other = ctx.clone();
        other.set("k", "v");

        assert_eq!(ctx.get::<&str>("k"), Some("v"));
        assert!(ctx.ptr_eq(&other));
    }

    #[test]
    fn forks_are_independent() {
        let ctx = Context::new();
        ctx.set("shared", 1u8);

        let fork = ctx.fork();
        fork.set("private", 2u8);
        ctx.set("late", 3u8);

        assert_eq!(fork.get::<u8>("shared"), Some(1));
        assert!(!ctx.contains("private"));
        assert!(!fork.contains("late"));
        assert!(!ctx.ptr_eq(&fork));
    }

    #[test]
    fn forks_share_values() {
        let ctx = Context::new();
        ctx.set("list", vec![1, 2, 3]);

        let fork = ctx.fork();
        let a = ctx.get_arc::<Vec<i32>>("list").unwrap();
        let b = fork.get_arc::<Vec<i32>>("list").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn remove_returns_the_value() {
        let ctx = Context::new();
        ctx.set(String::from("gone"), 1u8);

        assert!(ctx.remove("gone").is_some());
        assert!(ctx.is_empty());
        assert!(ctx.remove("gone").is_none());
    }
}
