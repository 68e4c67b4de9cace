//! Client Types
//!
//! Type definitions for notes API operations.

pub mod config;
pub mod notes;
pub mod request;
pub mod token;

pub use config::*;
pub use notes::*;
pub use request::*;
pub use token::*;
