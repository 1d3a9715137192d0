//! Per-region credentials, token providers, and the caching layer that decides when a
//! provider must be called.

pub mod cache;
pub mod credential;
pub mod provider;
pub mod secret;
pub mod source;

pub use cache::*;
pub use credential::*;
pub use provider::*;
pub use secret::*;
pub use source::*;
