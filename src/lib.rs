//! Notes API Client
//!
//! Authenticated client for the notes backend.
//!
//! # Features
//!
//! - Typed operations for sign-in, sign-up, logout and note/group CRUD
//! - Bearer token attachment from a persisted token store
//! - Transparent token refresh on 401 with a single retry, coalesced across
//!   concurrent requests
//! - Encoded key/value storage (durable and session scopes) with in-process
//!   change notifications
//! - An auth observer that sends the user to the login screen when the
//!   access token disappears
//!
//! # Storage encoding
//!
//! Stored keys and values are base64 encoded. This is obfuscation, not
//! security: anyone who can read the storage file can decode the tokens.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use noteapp_client::{client_config, ApiClient, AuthObserver, Credentials, Navigator};
//!
//! struct Router;
//!
//! impl Navigator for Router {
//!     fn navigate_to_login(&self) {
//!         println!("-> /auth");
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = client_config()
//!         .base_url("http://localhost:8080")
//!         .storage_path("noteapp-storage.json")
//!         .build()?;
//!
//!     let client = ApiClient::new(config)?;
//!     let _observer = AuthObserver::mount(client.token_store(), Arc::new(Router));
//!
//!     client.auth().login(&Credentials::new("me@example.com", "hunter2")).await?;
//!
//!     let tree = client.notes().get_tree().await?;
//!     for item in tree.prepare() {
//!         println!("{} ({} children)", item.title, item.children.map_or(0, |c| c.len()));
//!     }
//!
//!     client.auth().logout().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `types`: request, token, note and configuration types
//! - `error`: error hierarchy and response mapping
//! - `core`: HTTP transport and the storage codec
//! - `storage`: storage backends, the encoded wrapper and change notifications
//! - `token`: token store and refresh coordination
//! - `client`: the HTTP client core
//! - `services`: auth and notes operations
//! - `observer`: access-token watcher
//! - `builders`: fluent configuration builder

pub mod builders;
pub mod client;
pub mod core;
pub mod error;
pub mod observer;
pub mod services;
pub mod storage;
pub mod token;
pub mod types;

// Re-export main client
pub use client::{api_client, ApiClient};

// Re-export builders
pub use builders::{client_config, ClientConfigBuilder};

// Re-export errors
pub use error::{
    create_error_from_response, get_user_message, parse_error_response, ApiError,
    ApiErrorResponse, ApiResult, ConfigurationError, NetworkError, ProtocolError, StorageError,
    UNAUTHORIZED_STATUS,
};

// Re-export types
pub use types::{
    // Config
    ClientConfig, Endpoints,
    // Request
    ApiRequest,
    // Token
    AuthTokensResponse, Credentials, RefreshTokenRequest, TokenSet, DEFAULT_TOKEN_TYPE,
    // Notes
    CreateGroup, CreateNote, GroupNode, NoteInfo, NoteSummary, NotesTree, TreeItem, UpdateGroup,
    UpdateNote,
};

// Re-export core components
pub use crate::core::{
    // Transport
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, MockHttpTransport,
    ReqwestHttpTransport,
    // Encoding
    Base64Codec, ValueCodec,
};

// Re-export storage
pub use storage::{
    EncodedStorage, FileBackend, InMemoryBackend, MockStorageBackend, ScopedStorage,
    StorageBackend, StorageChange, StorageEvents, StorageObserver, StorageScope, Subscription,
};

// Re-export token management
pub use token::{RefreshCoordinator, RefreshState, RefreshStats, TokenStore};

// Re-export services and observer
pub use observer::{AuthObserver, Navigator};
pub use services::{AuthService, NotesService};
