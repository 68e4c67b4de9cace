//! API Services
//!
//! Typed operations over [`ApiClient`](crate::client::ApiClient), grouped
//! by backend area.

pub mod auth;
pub mod notes;

pub use auth::AuthService;
pub use notes::NotesService;
