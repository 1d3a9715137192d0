//! One region, one call: request description, envelope normalization, and classification into
//! [`RegionResult`] values.

pub mod envelope;
pub mod executor;
pub mod request;
pub mod result;

pub use envelope::*;
pub use executor::*;
pub use request::*;
pub use result::*;
