//! Global middlewares.
//!
//! Global middlewares run once per event, before any handler. They are kept
//! in one list per kind and stamped with a serial on registration; at
//! dispatch time the [`EventKind::Any`], [`EventKind::Context`] and typed
//! lists are merged by serial, so middlewares always run in the order they
//! were added, whatever kind they were added for.

use crate::registry::ErasedHandler;
use gatecast_core::{EventKind, Intents};
use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

/// A global middleware and its position in registration order.
pub(crate) struct GlobalMiddleware<S> {
    serial: u64,
    pub(crate) middleware: ErasedHandler<S>,
}

impl<S> Clone for GlobalMiddleware<S> {
    fn clone(&self) -> Self {
        Self {
            serial: self.serial,
            middleware: self.middleware.clone(),
        }
    }
}

struct Lists<S> {
    next_serial: u64,
    by_kind: HashMap<EventKind, Vec<GlobalMiddleware<S>>>,
}

/// The global middleware table.
pub(crate) struct MiddlewareTable<S> {
    lists: RwLock<Lists<S>>,
}

impl<S> Default for MiddlewareTable<S> {
    fn default() -> Self {
        Self {
            lists: RwLock::new(Lists {
                next_serial: 0,
                by_kind: HashMap::new(),
            }),
        }
    }
}

impl<S> MiddlewareTable<S> {
    /// Append a middleware for `kind`.
    pub(crate) fn add(&self, kind: EventKind, middleware: ErasedHandler<S>) {
        let mut lists = self.lists.write().unwrap_or_else(PoisonError::into_inner);
        let serial = lists.next_serial;
        lists.next_serial += 1;
        lists
            .by_kind
            .entry(kind)
            .or_default()
            .push(GlobalMiddleware { serial, middleware });
    }

    /// The middlewares that apply to an event of `kind`, in registration
    /// order.
    pub(crate) fn chain_for(&self, kind: EventKind) -> Vec<GlobalMiddleware<S>> {
        let (any, context, typed) = {
            let lists = self.lists.read().unwrap_or_else(PoisonError::into_inner);
            let get = |k: EventKind| lists.by_kind.get(&k).cloned().unwrap_or_default();
            (get(EventKind::Any), get(EventKind::Context), get(kind))
        };
        merge_by_serial([any, context, typed])
    }

    /// The union of the intents of all kinds with at least one middleware.
    pub(crate) fn intents(&self) -> Intents {
        let lists = self.lists.read().unwrap_or_else(PoisonError::into_inner);
        lists
            .by_kind
            .iter()
            .filter(|(kind, list)| !kind.is_catch_all() && !list.is_empty())
            .fold(Intents::empty(), |acc, (kind, _)| acc | kind.intents())
    }
}

/// Merge lists that are each sorted by serial into one sorted list.
///
/// Each list keeps a cursor; the entry with the smallest serial among the
/// cursors is taken next.
fn merge_by_serial<S, const N: usize>(lists: [Vec<GlobalMiddleware<S>>; N]) -> Vec<GlobalMiddleware<S>> {
    let total = lists.iter().map(Vec::len).sum();
    let mut merged = Vec::with_capacity(total);
    let mut cursors = [0usize; N];

    while merged.len() < total {
        let next = (0..N)
            .filter(|&i| cursors[i] < lists[i].len())
            .min_by_key(|&i| lists[i][cursors[i]].serial);

        let Some(i) = next else { break };
        merged.push(lists[i][cursors[i]].clone());
        cursors[i] += 1;
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        event::{Event, MessageCreateEvent, ReadyEvent},
        registry::erase,
    };
    use gatecast_core::Context;

    type State = ();

    fn noop() -> ErasedHandler<State> {
        erase(|_: State, _: Event| async {})
    }

    fn serials(chain: &[GlobalMiddleware<State>]) -> Vec<u64> {
        chain.iter().map(|m| m.serial).collect()
    }

    #[test]
    fn chains_interleave_lists_by_registration_order() {
        let table = MiddlewareTable::<State>::default();
        table.add(EventKind::MessageCreate, noop()); // 0
        table.add(EventKind::Any, noop()); // 1
        table.add(EventKind::Ready, noop()); // 2
        table.add(EventKind::Context, noop()); // 3
        table.add(EventKind::MessageCreate, noop()); // 4
        table.add(EventKind::Any, noop()); // 5

        assert_eq!(serials(&table.chain_for(EventKind::MessageCreate)), vec![0, 1, 3, 4, 5]);
        assert_eq!(serials(&table.chain_for(EventKind::Ready)), vec![1, 2, 3, 5]);
        assert_eq!(serials(&table.chain_for(EventKind::GuildCreate)), vec![1, 3, 5]);
    }

    #[test]
    fn empty_table_yields_empty_chain() {
        let table = MiddlewareTable::<State>::default();
        assert!(table.chain_for(EventKind::Ready).is_empty());
        assert!(table.intents().is_empty());
    }

    #[test]
    fn intents_ignore_catch_all_middlewares() {
        let table = MiddlewareTable::<State>::default();
        table.add(EventKind::Any, erase(|_: State, _: Event| async {}));
        table.add(EventKind::Context, erase(|_: State, _: Context| async {}));
        assert!(table.intents().is_empty());

        table.add(EventKind::MessageCreate, erase(|_: State, _: MessageCreateEvent| async {}));
        table.add(EventKind::Ready, erase(|_: State, _: ReadyEvent| async {}));
        assert_eq!(table.intents(), EventKind::MessageCreate.intents());
    }
}
