//! Token Management
//!
//! Token persistence and the refresh exchange.

pub mod refresh;
pub mod store;

pub use refresh::{RefreshCoordinator, RefreshState, RefreshStats};
pub use store::{TokenStore, ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, TOKEN_SCOPE, TOKEN_TYPE_KEY};
