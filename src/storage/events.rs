//! Storage Change Notifications
//!
//! In-process publish/subscribe channel for storage writes. Native storage
//! signals only reach other contexts; this channel covers observers living
//! in the same context as the writer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use tracing::trace;

/// Storage scope an entry lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StorageScope {
    /// Survives restarts.
    Durable,
    /// Dropped when the session ends.
    Session,
}

impl StorageScope {
    /// Name of the change event raised for this scope.
    pub fn event_name(&self) -> &'static str {
        match self {
            Self::Durable => "localStorageUpdated",
            Self::Session => "sessionStorageUpdated",
        }
    }
}

/// A set (`value: Some`) or remove (`value: None`) of a logical key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageChange {
    pub scope: StorageScope,
    pub key: String,
    pub value: Option<String>,
}

/// Observer registration interface.
pub trait StorageObserver: Send + Sync {
    /// Called synchronously on every write, before the write lands.
    fn on_storage_change(&self, change: &StorageChange);
}

impl<F> StorageObserver for F
where
    F: Fn(&StorageChange) + Send + Sync,
{
    fn on_storage_change(&self, change: &StorageChange) {
        self(change)
    }
}

type ObserverList = Mutex<Vec<(u64, Arc<dyn StorageObserver>)>>;

/// Change notification channel.
#[derive(Default)]
pub struct StorageEvents {
    observers: Arc<ObserverList>,
    next_id: AtomicU64,
}

impl StorageEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer. It stays registered until the returned
    /// [`Subscription`] is dropped or unsubscribed.
    pub fn subscribe<O>(&self, observer: O) -> Subscription
    where
        O: StorageObserver + 'static,
    {
        self.subscribe_shared(Arc::new(observer))
    }

    /// Register an observer that is shared with other owners.
    pub fn subscribe_shared(&self, observer: Arc<dyn StorageObserver>) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut observers) = self.observers.lock() {
            observers.push((id, observer));
        }
        trace!(subscription = id, "storage observer registered");

        Subscription {
            id,
            observers: Arc::downgrade(&self.observers),
        }
    }

    /// Deliver a change to every registered observer.
    ///
    /// Observers are called outside the registry lock, so they may
    /// subscribe, unsubscribe or write to storage themselves.
    pub fn emit(&self, change: &StorageChange) {
        let snapshot: Vec<Arc<dyn StorageObserver>> = match self.observers.lock() {
            Ok(observers) => observers.iter().map(|(_, o)| o.clone()).collect(),
            Err(_) => return,
        };

        trace!(
            event = change.scope.event_name(),
            key = %change.key,
            removed = change.value.is_none(),
            observers = snapshot.len(),
            "storage change"
        );

        for observer in snapshot {
            observer.on_storage_change(change);
        }
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.lock().map(|o| o.len()).unwrap_or(0)
    }
}

/// Registration guard; unsubscribes on drop.
#[must_use = "dropping a Subscription unsubscribes the observer"]
pub struct Subscription {
    id: u64,
    observers: Weak<ObserverList>,
}

impl Subscription {
    /// Unsubscribe now.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(observers) = self.observers.upgrade() {
            if let Ok(mut observers) = observers.lock() {
                observers.retain(|(id, _)| *id != self.id);
            }
            trace!(subscription = self.id, "storage observer removed");
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(key: &str, value: Option<&str>) -> StorageChange {
        StorageChange {
            scope: StorageScope::Durable,
            key: key.to_string(),
            value: value.map(String::from),
        }
    }

    #[test]
    fn test_emit_reaches_all_observers() {
        let events = StorageEvents::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first = seen.clone();
        let _a = events.subscribe(move |c: &StorageChange| first.lock().unwrap().push(("a", c.clone())));
        let second = seen.clone();
        let _b = events.subscribe(move |c: &StorageChange| second.lock().unwrap().push(("b", c.clone())));

        events.emit(&change("access_token", Some("A1")));

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].1, change("access_token", Some("A1")));
    }

    #[test]
    fn test_drop_unsubscribes() {
        let events = StorageEvents::new();
        let count = Arc::new(AtomicU64::new(0));

        let counter = count.clone();
        let subscription = events.subscribe(move |_: &StorageChange| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(events.observer_count(), 1);

        events.emit(&change("k", None));
        subscription.unsubscribe();
        events.emit(&change("k", None));

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(events.observer_count(), 0);
    }

    #[test]
    fn test_subscription_outliving_channel() {
        let events = StorageEvents::new();
        let subscription = events.subscribe(|_: &StorageChange| {});
        drop(events);
        drop(subscription);
    }

    #[test]
    fn test_event_names() {
        assert_eq!(StorageScope::Durable.event_name(), "localStorageUpdated");
        assert_eq!(StorageScope::Session.event_name(), "sessionStorageUpdated");
    }
}
