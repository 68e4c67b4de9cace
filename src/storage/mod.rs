//! Client-Side Storage
//!
//! Encoded key/value storage with durable and session scopes, and the
//! in-process change channel used by the auth observer.

pub mod backend;
pub mod encoded;
pub mod events;

pub use backend::*;
pub use encoded::*;
pub use events::*;
