//! Auth Observer
//!
//! Tracks whether an access token is present and sends the user to the
//! login screen when it goes away.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info};

use crate::storage::{StorageChange, Subscription};
use crate::token::{TokenStore, ACCESS_TOKEN_KEY, TOKEN_SCOPE};

/// Navigation hook provided by the UI layer.
pub trait Navigator: Send + Sync {
    /// Show the login screen.
    fn navigate_to_login(&self);
}

/// Access-token watcher.
///
/// Stays subscribed until [`unmount`](Self::unmount) is called or the
/// observer is dropped.
pub struct AuthObserver {
    authenticated: Arc<AtomicBool>,
    subscription: Option<Subscription>,
}

impl AuthObserver {
    /// Subscribe to token changes. The initial state is read from `store`.
    pub fn mount(store: &TokenStore, navigator: Arc<dyn Navigator>) -> Self {
        let authenticated = Arc::new(AtomicBool::new(store.has_access_token()));

        let flag = authenticated.clone();
        let subscription = store.storage().subscribe(move |change: &StorageChange| {
            if change.scope != TOKEN_SCOPE || change.key != ACCESS_TOKEN_KEY {
                return;
            }

            let present = change.value.as_deref().is_some_and(|value| !value.is_empty());
            flag.store(present, Ordering::SeqCst);
            if !present {
                info!("access token removed, navigating to login");
                navigator.navigate_to_login();
            }
        });

        debug!(
            authenticated = authenticated.load(Ordering::SeqCst),
            "auth observer mounted"
        );

        Self {
            authenticated,
            subscription: Some(subscription),
        }
    }

    /// Check if an access token is currently present.
    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    /// Check if still subscribed.
    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    /// Stop observing.
    pub fn unmount(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
            debug!("auth observer unmounted");
        }
    }
}

impl std::fmt::Debug for AuthObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthObserver")
            .field("authenticated", &self.is_authenticated())
            .field("mounted", &self.is_mounted())
            .finish()
    }
}
