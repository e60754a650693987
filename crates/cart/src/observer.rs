//! Change notification.
//!
//! Observers register a callback and get back a [`Subscription`], which is the
//! disposer: dropping it unregisters the callback. Notifications carry no
//! payload; observers re-read whatever state they need.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, Weak};

type Callback = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    callbacks: Vec<(u64, Callback)>,
}

/// Registry of change observers.
///
/// Clones share the same registry.
#[derive(Clone, Default)]
pub struct Observers {
    registry: Arc<Mutex<Registry>>,
}

impl Observers {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback`. It stays registered until the returned
    /// [`Subscription`] is dropped.
    #[must_use = "dropping the subscription unregisters the observer immediately"]
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut registry = self
            .registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.callbacks.push((id, Arc::new(callback)));

        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Call every registered observer, in registration order.
    ///
    /// The registry lock is released before any callback runs, so callbacks
    /// may subscribe, drop subscriptions, or trigger reads.
    pub fn notify(&self) {
        let callbacks: Vec<Callback> = self
            .registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .callbacks
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();

        for callback in callbacks {
            callback();
        }
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .callbacks
            .len()
    }

    /// Returns true if nobody is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("subscribers", &self.len())
            .finish()
    }
}

/// Handle for one registered observer. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
    registry: Weak<Mutex<Registry>>,
}

impl Subscription {
    /// Unsubscribe now. Same as dropping the handle.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .callbacks
                .retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl Fn() + Send + Sync + 'static) {
        let count = Arc::new(AtomicUsize::new(0));
        let handle = Arc::clone(&count);
        (count, move || {
            handle.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_notify_without_observers() {
        let observers = Observers::new();
        observers.notify();
        assert!(observers.is_empty());
    }

    #[test]
    fn test_every_observer_notified() {
        let observers = Observers::new();
        let (a, on_a) = counter();
        let (b, on_b) = counter();
        let _sub_a = observers.subscribe(on_a);
        let _sub_b = observers.subscribe(on_b);

        observers.notify();
        observers.notify();

        assert_eq!(a.load(Ordering::SeqCst), 2);
        assert_eq!(b.load(Ordering::SeqCst), 2);
        assert_eq!(observers.len(), 2);
    }

    #[test]
    fn test_dropped_subscription_stops_notifications() {
        let observers = Observers::new();
        let (count, on_change) = counter();
        let sub = observers.subscribe(on_change);

        observers.notify();
        sub.unsubscribe();
        observers.notify();

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(observers.is_empty());
    }

    #[test]
    fn test_unsubscribe_only_removes_own_callback() {
        let observers = Observers::new();
        let (kept, on_kept) = counter();
        let (gone, on_gone) = counter();
        let _kept_sub = observers.subscribe(on_kept);
        drop(observers.subscribe(on_gone));

        observers.notify();

        assert_eq!(kept.load(Ordering::SeqCst), 1);
        assert_eq!(gone.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_callback_may_touch_registry() {
        let observers = Observers::new();
        let inner = observers.clone();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_in_callback = Arc::clone(&seen);
        let _sub = observers.subscribe(move || {
            seen_in_callback.store(inner.len(), Ordering::SeqCst);
        });

        observers.notify();
        assert_eq!(seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_subscription_outlives_registry() {
        let observers = Observers::new();
        let (_, on_change) = counter();
        let sub = observers.subscribe(on_change);
        drop(observers);
        drop(sub);
    }
}
