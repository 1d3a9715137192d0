//! Per-region outcome values.

// std
use std::time::Duration as StdDuration;
// self
use crate::{_prelude::*, region::{RegionEndpoint, RegionId}};

/// Classification of a per-region failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionErrorKind {
	/// The call (or the overall fan-out deadline) timed out.
	Timeout,
	/// Transport failure or non-2xx status.
	Http,
	/// 2xx body that is not a recognized envelope.
	Protocol,
	/// Recognized envelope reporting an error code.
	Business,
	/// The unit of execution terminated abnormally.
	Panicked,
}
impl RegionErrorKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Timeout => "timeout",
			Self::Http => "http",
			Self::Protocol => "protocol",
			Self::Business => "business",
			Self::Panicked => "panicked",
		}
	}
}
impl Display for RegionErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Failure recorded for one region; never interrupts sibling regions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
#[error("Region `{region}` failed ({kind}): {message}")]
pub struct RegionError {
	/// Region that failed.
	pub region: RegionId,
	/// Failure classification.
	pub kind: RegionErrorKind,
	/// Diagnostic message.
	pub message: String,
}
impl RegionError {
	/// Creates a new error.
	pub fn new(region: RegionId, kind: RegionErrorKind, message: impl Into<String>) -> Self {
		Self { region, kind, message: message.into() }
	}
}

/// Result of querying one region: exactly one of payload or error.
///
/// A payload may be an explicitly empty value, which is still a success.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionResult {
	/// Region the result belongs to.
	pub region: RegionId,
	/// Display name copied from the endpoint.
	pub display_name: String,
	/// Wall time spent by the unit of execution.
	pub elapsed: StdDuration,
	/// Payload or classified error.
	pub outcome: Result<Value, RegionError>,
}
impl RegionResult {
	/// Successful result for `endpoint`.
	pub fn success(endpoint: &RegionEndpoint, payload: Value, elapsed: StdDuration) -> Self {
		Self {
			region: endpoint.id.clone(),
			display_name: endpoint.display_name.clone(),
			elapsed,
			outcome: Ok(payload),
		}
	}

	/// Failed result for `endpoint`.
	pub fn failure(
		endpoint: &RegionEndpoint,
		kind: RegionErrorKind,
		message: impl Into<String>,
		elapsed: StdDuration,
	) -> Self {
		Self {
			region: endpoint.id.clone(),
			display_name: endpoint.display_name.clone(),
			elapsed,
			outcome: Err(RegionError::new(endpoint.id.clone(), kind, message)),
		}
	}

	/// Payload, when the region succeeded.
	pub fn payload(&self) -> Option<&Value> {
		self.outcome.as_ref().ok()
	}

	/// Error, when the region failed.
	pub fn error(&self) -> Option<&RegionError> {
		self.outcome.as_ref().err()
	}

	/// Whether the result carries a payload.
	pub fn is_usable(&self) -> bool {
		self.outcome.is_ok()
	}

	/// Label used for per-region metrics: `success` or the error kind.
	pub fn label(&self) -> &'static str {
		match &self.outcome {
			Ok(_) => "success",
			Err(e) => e.kind.as_str(),
		}
	}
}
