#![forbid(unsafe_code)]

//! Shared current-value holders.
//!
//! A [`ValueCell`] is a process-wide value with get/set/subscribe semantics,
//! used for the active namespace, the default content path, and the current
//! content response. Watchers fire on every `set`, including sets of an
//! unchanged value — readers that care must compare against their last-seen
//! value, because writes interleave from multiple sources.

use std::sync::{Arc, Mutex};

type Watcher<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Identity of a registered watcher, for unsubscribing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatcherId(u64);

struct CellInner<T> {
    value: T,
    watchers: Vec<(WatcherId, Watcher<T>)>,
    next_id: u64,
}

/// A shared current-value holder with get/set/subscribe semantics.
pub struct ValueCell<T> {
    inner: Arc<Mutex<CellInner<T>>>,
}

impl<T> Clone for ValueCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone> ValueCell<T> {
    /// Create a cell holding `value`.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CellInner {
                value,
                watchers: Vec::new(),
                next_id: 0,
            })),
        }
    }

    /// The current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.lock().unwrap().value.clone()
    }

    /// Replace the value and notify every watcher.
    ///
    /// Watchers run on the calling thread, outside the cell's lock, so a
    /// watcher may read or even set the cell again.
    pub fn set(&self, value: T) {
        let watchers: Vec<Watcher<T>> = {
            let mut inner = self.inner.lock().unwrap();
            inner.value = value.clone();
            inner.watchers.iter().map(|(_, w)| w.clone()).collect()
        };
        for watcher in watchers {
            watcher(&value);
        }
    }

    /// Register a watcher, invoked on every subsequent `set`.
    pub fn subscribe(&self, watcher: impl Fn(&T) + Send + Sync + 'static) -> WatcherId {
        let mut inner = self.inner.lock().unwrap();
        let id = WatcherId(inner.next_id);
        inner.next_id += 1;
        inner.watchers.push((id, Arc::new(watcher)));
        id
    }

    /// Remove a watcher. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: WatcherId) {
        self.inner
            .lock()
            .unwrap()
            .watchers
            .retain(|(watcher_id, _)| *watcher_id != id);
    }
}

impl<T: Clone + Default> Default for ValueCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn get_returns_current_value() {
        let cell = ValueCell::new("a".to_owned());
        assert_eq!(cell.get(), "a");
        cell.set("b".to_owned());
        assert_eq!(cell.get(), "b");
    }

    #[test]
    fn watchers_fire_on_every_set() {
        let cell = ValueCell::new(0u32);
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        cell.subscribe(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        cell.set(1);
        cell.set(1); // unchanged value still notifies
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unsubscribed_watcher_stops_firing() {
        let cell = ValueCell::new(0u32);
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        let id = cell.subscribe(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        cell.set(1);
        cell.unsubscribe(id);
        cell.set(2);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn watcher_sees_the_new_value() {
        let cell = ValueCell::new(String::new());
        let seen = Arc::new(Mutex::new(String::new()));
        let seen_clone = seen.clone();
        cell.subscribe(move |value: &String| {
            *seen_clone.lock().unwrap() = value.clone();
        });

        cell.set("fred".to_owned());
        assert_eq!(*seen.lock().unwrap(), "fred");
    }

    #[test]
    fn clones_share_state() {
        let cell = ValueCell::new(1u32);
        let other = cell.clone();
        other.set(2);
        assert_eq!(cell.get(), 2);
    }
}
