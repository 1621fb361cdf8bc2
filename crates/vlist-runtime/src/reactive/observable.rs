#![forbid(unsafe_code)]

//! Shared value with change notification and a version counter.
//!
//! [`Observable<T>`] lives in `Rc<RefCell<..>>` storage; clones are handles
//! to the same value. A write that leaves the value equal (by `PartialEq`)
//! is dropped: no version bump and no callbacks.
//!
//! Callbacks are held weakly by the observable and strongly by the
//! [`Subscription`] returned from [`Observable::subscribe`]. Dropping the
//! guard stops delivery; the dead entry is pruned on the next notification.
//!
//! Callbacks run after the internal borrow is released, so a subscriber may
//! write to other observables (or this one) without panicking.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, debug_span};
use web_time::Instant;

type Callback<T> = Rc<dyn Fn(&T)>;

struct Shared<T> {
    value: T,
    version: u64,
    listeners: Vec<Weak<dyn Fn(&T)>>,
}

/// A shared, version-tracked value.
pub struct Observable<T> {
    shared: Rc<RefCell<Shared<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shared = self.shared.borrow();
        f.debug_struct("Observable")
            .field("value", &shared.value)
            .field("version", &shared.version)
            .field("listeners", &shared.listeners.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Wrap `value` at version 0.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            shared: Rc::new(RefCell::new(Shared {
                value,
                version: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Clone of the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.shared.borrow().value.clone()
    }

    /// Borrow the current value for the duration of `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.shared.borrow().value)
    }

    /// Replace the value. Returns `true` and notifies when it changed.
    pub fn set(&self, value: T) -> bool {
        {
            let mut shared = self.shared.borrow_mut();
            if shared.value == value {
                return false;
            }
            shared.value = value;
            shared.version += 1;
        }
        self.notify();
        true
    }

    /// Mutate in place. Returns `true` and notifies when the result differs
    /// from the previous value.
    pub fn update(&self, f: impl FnOnce(&mut T)) -> bool {
        let changed = {
            let mut shared = self.shared.borrow_mut();
            let before = shared.value.clone();
            f(&mut shared.value);
            let changed = shared.value != before;
            if changed {
                shared.version += 1;
            }
            changed
        };
        if changed {
            self.notify();
        }
        changed
    }

    /// Register `callback` for future changes. Delivery stops when the
    /// returned guard is dropped.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: Callback<T> = Rc::new(callback);
        self.shared
            .borrow_mut()
            .listeners
            .push(Rc::downgrade(&strong));
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Number of value-changing writes so far.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.shared.borrow().version
    }

    /// Registered listeners, including dropped ones not yet pruned.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.shared.borrow().listeners.len()
    }

    fn notify(&self) {
        let (live, value, version) = {
            let mut shared = self.shared.borrow_mut();
            shared.listeners.retain(|w| w.strong_count() > 0);
            let live: Vec<Callback<T>> =
                shared.listeners.iter().filter_map(Weak::upgrade).collect();
            (live, shared.value.clone(), shared.version)
        };
        if live.is_empty() {
            return;
        }

        let started = Instant::now();
        let _span = debug_span!("observable.notify", version, listeners = live.len()).entered();
        for callback in &live {
            callback(&value);
        }
        debug!(
            elapsed_us = started.elapsed().as_micros() as u64,
            "observable listeners notified"
        );
    }
}

/// Keeps a callback registered while alive.
pub struct Subscription {
    _guard: Box<dyn std::any::Any>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
