//! Token Store
//!
//! Access, refresh and type tokens persisted through the encoded storage
//! wrapper in the durable scope.

use std::sync::Arc;

use tracing::debug;

use crate::storage::{EncodedStorage, StorageScope};
use crate::types::TokenSet;

/// Logical storage key of the access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Logical storage key of the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";
/// Logical storage key of the token type.
pub const TOKEN_TYPE_KEY: &str = "token_type";

/// Scope the token keys live in.
pub const TOKEN_SCOPE: StorageScope = StorageScope::Durable;

/// Token persistence over [`EncodedStorage`].
///
/// Cheap to clone; clones share the same storage.
#[derive(Clone, Debug)]
pub struct TokenStore {
    storage: Arc<EncodedStorage>,
}

impl TokenStore {
    pub fn new(storage: Arc<EncodedStorage>) -> Self {
        Self { storage }
    }

    /// Underlying storage.
    pub fn storage(&self) -> &Arc<EncodedStorage> {
        &self.storage
    }

    fn read(&self, key: &str) -> Option<String> {
        self.storage
            .get(TOKEN_SCOPE, key)
            .filter(|value| !value.is_empty())
    }

    fn write(&self, key: &str, value: Option<&str>) {
        match value {
            Some(value) => self.storage.set(TOKEN_SCOPE, key, value),
            None => self.storage.remove(TOKEN_SCOPE, key),
        }
    }

    /// Persist a token set. Absent fields remove their key.
    pub fn set_tokens(&self, tokens: &TokenSet) {
        debug!(
            has_access = tokens.access_token.is_some(),
            has_refresh = tokens.refresh_token.is_some(),
            "storing tokens"
        );
        self.write(REFRESH_TOKEN_KEY, tokens.refresh_token.as_deref());
        self.write(TOKEN_TYPE_KEY, tokens.token_type.as_deref());
        // Written last so observers of the access key see a complete set.
        self.write(ACCESS_TOKEN_KEY, tokens.access_token.as_deref());
    }

    /// Read the current token set. Empty stored values read as absent.
    pub fn get_tokens(&self) -> TokenSet {
        TokenSet {
            access_token: self.read(ACCESS_TOKEN_KEY),
            refresh_token: self.read(REFRESH_TOKEN_KEY),
            token_type: self.read(TOKEN_TYPE_KEY),
        }
    }

    /// Remove every token. Safe to call repeatedly.
    pub fn clear_tokens(&self) {
        debug!("clearing tokens");
        self.storage.remove(TOKEN_SCOPE, REFRESH_TOKEN_KEY);
        self.storage.remove(TOKEN_SCOPE, TOKEN_TYPE_KEY);
        self.storage.remove(TOKEN_SCOPE, ACCESS_TOKEN_KEY);
    }

    /// Check if an access token is stored.
    pub fn has_access_token(&self) -> bool {
        self.read(ACCESS_TOKEN_KEY).is_some()
    }
}
