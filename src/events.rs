//! Typed listener registries
//!
//! Every observable component keeps one registry per event kind. Handles are
//! unique across the whole process, so a component can resolve an
//! `unsubscribe` without knowing which registry the listener lives in.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Handle returned when subscribing; pass it back to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        ListenerId(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener-{}", self.0)
    }
}

type Callback<E> = Box<dyn FnMut(&E) + Send>;

/// Ordered set of callbacks for one event type
///
/// Dispatch follows registration order. Removal leaves a vacant slot that is
/// reclaimed once at least half of the slots are vacant.
pub struct ListenerRegistry<E> {
    slots: Vec<Option<(ListenerId, Callback<E>)>>,
    index: HashMap<ListenerId, usize>,
}

impl<E> ListenerRegistry<E> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a callback
    pub fn add<F>(&mut self, callback: F) -> ListenerId
    where
        F: FnMut(&E) + Send + 'static,
    {
        let id = ListenerId::next();
        self.index.insert(id, self.slots.len());
        self.slots.push(Some((id, Box::new(callback))));
        id
    }

    /// Remove a callback, returning whether it was registered here
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let Some(slot) = self.index.remove(&id) else {
            return false;
        };
        self.slots[slot] = None;

        if self.index.len() * 2 <= self.slots.len() {
            self.compact();
        }
        true
    }

    /// Invoke every callback with `event`
    pub fn dispatch(&mut self, event: &E) {
        for (_, callback) in self.slots.iter_mut().flatten() {
            callback(event);
        }
    }

    /// Check whether `id` is registered here
    pub fn contains(&self, id: ListenerId) -> bool {
        self.index.contains_key(&id)
    }

    /// Number of registered callbacks
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if no callbacks are registered
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    fn compact(&mut self) {
        self.slots.retain(Option::is_some);
        self.index.clear();
        for (position, slot) in self.slots.iter().enumerate() {
            if let Some((id, _)) = slot {
                self.index.insert(*id, position);
            }
        }
    }
}

impl<E> Default for ListenerRegistry<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> fmt::Debug for ListenerRegistry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.index.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_dispatch_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ListenerRegistry::<u32>::new();

        for tag in ["a", "b", "c"] {
            let seen = Arc::clone(&seen);
            registry.add(move |value: &u32| seen.lock().unwrap().push(format!("{tag}{value}")));
        }

        registry.dispatch(&1);
        assert_eq!(*seen.lock().unwrap(), vec!["a1", "b1", "c1"]);
    }

    #[test]
    fn test_remove_listener() {
        let count = Arc::new(Mutex::new(0));
        let mut registry = ListenerRegistry::<()>::new();

        let counter = Arc::clone(&count);
        let id = registry.add(move |_| *counter.lock().unwrap() += 1);
        assert!(registry.contains(id));

        assert!(registry.remove(id));
        assert!(!registry.remove(id));
        assert!(registry.is_empty());

        registry.dispatch(&());
        assert_eq!(*count.lock().unwrap(), 0);
    }

    #[test]
    fn test_order_survives_compaction() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut registry = ListenerRegistry::<()>::new();

        let ids: Vec<_> = (0..6)
            .map(|n| {
                let seen = Arc::clone(&seen);
                registry.add(move |_| seen.lock().unwrap().push(n))
            })
            .collect();

        // Removing half triggers compaction
        registry.remove(ids[0]);
        registry.remove(ids[2]);
        registry.remove(ids[4]);
        assert_eq!(registry.len(), 3);

        registry.dispatch(&());
        assert_eq!(*seen.lock().unwrap(), vec![1, 3, 5]);

        // Remaining handles still resolve after compaction
        assert!(registry.remove(ids[3]));
        assert!(registry.contains(ids[5]));
    }

    #[test]
    fn test_ids_are_unique_across_registries() {
        let mut first = ListenerRegistry::<()>::new();
        let mut second = ListenerRegistry::<u8>::new();

        let a = first.add(|_| {});
        let b = second.add(|_| {});

        assert_ne!(a, b);
        assert!(!second.remove(a));
        assert!(first.remove(a));
    }
}
