//! Encoded Storage Wrapper
//!
//! Key/value access over the durable and session backends. Keys and values
//! are passed through a reversible codec before they reach a backend, and
//! every write is announced on the change channel before the backend is
//! touched.
//!
//! Backend failures never reach callers. They are logged at `warn` and the
//! operation behaves as a no-op (writes) or a miss (reads).

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use super::backend::{FileBackend, InMemoryBackend, StorageBackend};
use super::events::{StorageChange, StorageEvents, StorageObserver, StorageScope, Subscription};
use crate::core::{Base64Codec, ValueCodec};

/// Encoded two-scope key/value storage.
pub struct EncodedStorage {
    durable: Arc<dyn StorageBackend>,
    session: Arc<dyn StorageBackend>,
    codec: Base64Codec,
    events: StorageEvents,
}

impl EncodedStorage {
    /// Create storage over the given backends, using the base64 codec.
    pub fn new(durable: Arc<dyn StorageBackend>, session: Arc<dyn StorageBackend>) -> Self {
        Self {
            durable,
            session,
            codec: Base64Codec::new(),
            events: StorageEvents::new(),
        }
    }

    /// Storage with both scopes held in memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryBackend::new()), Arc::new(InMemoryBackend::new()))
    }

    /// Storage whose durable scope is backed by the file at `path`, or held
    /// in memory when no path is given.
    ///
    /// A file that cannot be opened is logged and replaced by an empty
    /// in-memory scope.
    pub fn open(path: Option<&Path>) -> Self {
        let durable: Arc<dyn StorageBackend> = match path {
            Some(path) => match FileBackend::open(path) {
                Ok(backend) => {
                    debug!(path = %path.display(), "durable storage opened");
                    Arc::new(backend)
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "durable storage unavailable, using memory");
                    Arc::new(InMemoryBackend::new())
                }
            },
            None => Arc::new(InMemoryBackend::new()),
        };
        Self::new(durable, Arc::new(InMemoryBackend::new()))
    }

    fn backend(&self, scope: StorageScope) -> &dyn StorageBackend {
        match scope {
            StorageScope::Durable => self.durable.as_ref(),
            StorageScope::Session => self.session.as_ref(),
        }
    }

    /// Read a logical value. Missing, unreadable and corrupted entries all
    /// read as `None`.
    pub fn get(&self, scope: StorageScope, key: &str) -> Option<String> {
        let raw = match self.backend(scope).get_raw(&self.codec.encode(key)) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(scope = ?scope, key, error = %e, "storage read failed");
                return None;
            }
        };

        let value = self.codec.decode(&raw);
        if value.is_none() {
            warn!(scope = ?scope, key, "stored value could not be decoded");
        }
        value
    }

    /// Write a logical value.
    pub fn set(&self, scope: StorageScope, key: &str, value: &str) {
        self.events.emit(&StorageChange {
            scope,
            key: key.to_string(),
            value: Some(value.to_string()),
        });

        let result = self
            .backend(scope)
            .set_raw(&self.codec.encode(key), &self.codec.encode(value));
        if let Err(e) = result {
            warn!(scope = ?scope, key, error = %e, "storage write failed");
        }
    }

    /// Remove a logical key.
    pub fn remove(&self, scope: StorageScope, key: &str) {
        self.events.emit(&StorageChange {
            scope,
            key: key.to_string(),
            value: None,
        });

        if let Err(e) = self.backend(scope).remove_raw(&self.codec.encode(key)) {
            warn!(scope = ?scope, key, error = %e, "storage remove failed");
        }
    }

    /// Remove every entry of a scope, announcing each removed key.
    pub fn clear(&self, scope: StorageScope) {
        let backend = self.backend(scope);
        let keys = match backend.keys() {
            Ok(keys) => keys,
            Err(e) => {
                warn!(scope = ?scope, error = %e, "storage listing failed");
                return;
            }
        };

        debug!(scope = ?scope, entries = keys.len(), "clearing storage scope");
        for raw_key in keys {
            match self.codec.decode(&raw_key) {
                Some(key) => self.remove(scope, &key),
                None => {
                    if let Err(e) = backend.remove_raw(&raw_key) {
                        warn!(scope = ?scope, error = %e, "storage remove failed");
                    }
                }
            }
        }
    }

    /// Durable scope view.
    pub fn local(&self) -> ScopedStorage<'_> {
        ScopedStorage {
            storage: self,
            scope: StorageScope::Durable,
        }
    }

    /// Session scope view.
    pub fn session(&self) -> ScopedStorage<'_> {
        ScopedStorage {
            storage: self,
            scope: StorageScope::Session,
        }
    }

    /// Change notification channel.
    pub fn events(&self) -> &StorageEvents {
        &self.events
    }

    /// Register a change observer.
    pub fn subscribe<O>(&self, observer: O) -> Subscription
    where
        O: StorageObserver + 'static,
    {
        self.events.subscribe(observer)
    }
}

impl Default for EncodedStorage {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl std::fmt::Debug for EncodedStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedStorage")
            .field("observers", &self.events.observer_count())
            .finish_non_exhaustive()
    }
}

/// One scope of an [`EncodedStorage`].
#[derive(Clone, Copy)]
pub struct ScopedStorage<'a> {
    storage: &'a EncodedStorage,
    scope: StorageScope,
}

impl ScopedStorage<'_> {
    pub fn scope(&self) -> StorageScope {
        self.scope
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.storage.get(self.scope, key)
    }

    pub fn set(&self, key: &str, value: &str) {
        self.storage.set(self.scope, key, value)
    }

    pub fn remove(&self, key: &str) {
        self.storage.remove(self.scope, key)
    }

    pub fn clear(&self) {
        self.storage.clear(self.scope)
    }
}
