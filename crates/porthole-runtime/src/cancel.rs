#![forbid(unsafe_code)]

//! Per-navigation cancellation signals.
//!
//! A signal/handle pair created for each navigation: the handle fires at
//! most once, observers registered on the signal run exactly once. An
//! observer registered after the handle already fired runs immediately —
//! stale signals are never reused, so the late registration can only mean
//! the work it guards is already obsolete.

use std::sync::{Arc, Mutex};

type Observer = Box<dyn FnOnce() + Send>;

struct CancelInner {
    fired: bool,
    observers: Vec<Observer>,
}

/// Observer side of a cancellation pair.
#[derive(Clone)]
pub struct CancelSignal {
    inner: Arc<Mutex<CancelInner>>,
}

/// Trigger side of a cancellation pair.
#[derive(Clone)]
pub struct CancelHandle {
    inner: Arc<Mutex<CancelInner>>,
}

impl CancelSignal {
    /// Create a new signal/handle pair.
    #[must_use]
    pub fn new() -> (Self, CancelHandle) {
        let inner = Arc::new(Mutex::new(CancelInner {
            fired: false,
            observers: Vec::new(),
        }));
        (
            Self {
                inner: inner.clone(),
            },
            CancelHandle { inner },
        )
    }

    /// Whether the handle has fired.
    #[must_use]
    pub fn is_fired(&self) -> bool {
        self.inner.lock().unwrap().fired
    }

    /// Register an observer to run when the handle fires.
    ///
    /// Runs immediately (on this thread) if the handle already fired.
    pub fn on_fire(&self, observer: impl FnOnce() + Send + 'static) {
        {
            let mut inner = self.inner.lock().unwrap();
            if !inner.fired {
                inner.observers.push(Box::new(observer));
                return;
            }
        }
        observer();
    }
}

impl CancelHandle {
    /// Fire the signal. Only the first call runs observers.
    pub fn fire(&self) {
        let observers = {
            let mut inner = self.inner.lock().unwrap();
            if inner.fired {
                return;
            }
            inner.fired = true;
            std::mem::take(&mut inner.observers)
        };
        for observer in observers {
            observer();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn starts_unfired() {
        let (signal, _handle) = CancelSignal::new();
        assert!(!signal.is_fired());
    }

    #[test]
    fn fire_runs_observers_once() {
        let (signal, handle) = CancelSignal::new();
        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        signal.on_fire(move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        handle.fire();
        handle.fire();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(signal.is_fired());
    }

    #[test]
    fn late_observer_runs_immediately() {
        let (signal, handle) = CancelSignal::new();
        handle.fire();

        let count = Arc::new(AtomicUsize::new(0));
        let count_clone = count.clone();
        signal.on_fire(move || {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn multiple_observers_all_run() {
        let (signal, handle) = CancelSignal::new();
        let count = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let count_clone = count.clone();
            signal.on_fire(move || {
                count_clone.fetch_add(1, Ordering::SeqCst);
            });
        }

        handle.fire();
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn cloned_handle_shares_the_latch() {
        let (signal, handle) = CancelSignal::new();
        let other = handle.clone();
        other.fire();
        assert!(signal.is_fired());
    }
}
