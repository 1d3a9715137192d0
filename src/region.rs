//! Region identity and static endpoint configuration.
//!
//! Every backend is deployed once per region, and each deployment has its own auth domain.
//! [`RegionEndpoint`] carries what a query needs to reach one deployment: the base URL, the
//! display name surfaced to presentation layers, the refresh skew for its tokens, and where
//! the token travels on a request.

pub mod builder;
pub mod endpoint;
pub mod id;

pub use builder::*;
pub use endpoint::*;
pub use id::*;
