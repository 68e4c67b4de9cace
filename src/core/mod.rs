//! Client Core Components
//!
//! HTTP transport and the storage encoding.

pub mod encoding;
pub mod transport;

pub use encoding::*;
pub use transport::*;
