//! Optional observability helpers for token refreshes and fan-out queries.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `region_fanout.query` with the `kind`
//!   (logical query kind) and `stage` (call site) fields, plus per-region debug events.
//! - Enable `metrics` to increment `region_fanout_query_total` for every
//!   attempt/success/failure labeled by `kind` + `outcome`, and `region_fanout_region_total`
//!   for every region result labeled by `region` + `outcome`.
//!
//! Neither feature installs a global subscriber or recorder; the embedding application owns
//! that choice.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Logical operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QueryKind {
	/// Token acquisition or refresh for one region.
	Token,
	/// Service metadata lookup.
	Service,
	/// Cluster listing lookup.
	Cluster,
	/// Instance address lookup.
	Instance,
	/// Log or trace lookup by request identifier.
	Log,
	/// Simulated RPC invocation.
	Rpc,
	/// Caller-defined query.
	Custom,
}
impl QueryKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			QueryKind::Token => "token",
			QueryKind::Service => "service",
			QueryKind::Cluster => "cluster",
			QueryKind::Instance => "instance",
			QueryKind::Log => "log",
			QueryKind::Rpc => "rpc",
			QueryKind::Custom => "custom",
		}
	}
}
impl Display for QueryKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each logical operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum QueryOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl QueryOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			QueryOutcome::Attempt => "attempt",
			QueryOutcome::Success => "success",
			QueryOutcome::Failure => "failure",
		}
	}
}
impl Display for QueryOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
