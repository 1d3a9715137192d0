//! Crate-level error types shared across credentials, fan-out, and selection.

// self
use crate::{_prelude::*, query::RegionError, region::RegionId};

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical error exposed by public APIs.
///
/// Only failures that abort a whole logical query surface here. Per-region failures are
/// recorded as [`RegionError`] values inside results and never interrupt sibling regions.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Credential acquisition failed; the logical query was not dispatched.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// Every region failed.
	#[error(transparent)]
	Aggregate(#[from] AggregateError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
}

/// Credential failures raised while exchanging a region secret for a token.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// No secret could be resolved for the region.
	#[error("No secret is configured for region `{region}`.")]
	MissingSecret {
		/// Region whose secret is missing.
		region: RegionId,
	},
	/// A capture file exists for the region but could not be read or parsed.
	#[error("Captured secret for region `{region}` at `{path}` could not be read.")]
	UnreadableSecret {
		/// Region whose capture file failed.
		region: RegionId,
		/// Capture file location.
		path: String,
		/// Underlying I/O or parsing failure.
		#[source]
		source: BoxError,
	},
	/// The auth endpoint answered without a token.
	#[error("Auth endpoint for region `{region}` returned no token in response.")]
	MissingToken {
		/// Region whose exchange failed.
		region: RegionId,
	},
	/// The auth endpoint answered without a usable lifetime.
	#[error("Auth endpoint for region `{region}` returned no usable expiry.")]
	MissingExpiry {
		/// Region whose exchange failed.
		region: RegionId,
	},
	/// The auth endpoint declared a lifetime that cannot be represented as an instant.
	#[error("Auth endpoint for region `{region}` returned an out-of-range expiry.")]
	ExpiryOutOfRange {
		/// Region whose exchange failed.
		region: RegionId,
	},
	/// The auth endpoint answered with a non-success status.
	#[error("Auth endpoint for region `{region}` rejected the credential with HTTP {status}.")]
	Rejected {
		/// Region whose exchange failed.
		region: RegionId,
		/// HTTP status code returned by the auth endpoint.
		status: u16,
	},
	/// The auth endpoint answered with JSON that could not be parsed.
	#[error("Auth endpoint for region `{region}` returned malformed JSON.")]
	MalformedResponse {
		/// Region whose exchange failed.
		region: RegionId,
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Transport failure (DNS, TCP, TLS, timeout) while calling the auth endpoint.
	#[error("Failed to reach the auth endpoint for region `{region}`.")]
	Transport {
		/// Region whose exchange failed.
		region: RegionId,
		/// Underlying transport error.
		#[source]
		source: BoxError,
	},
	/// The token cache was closed before the call.
	#[error("Token cache for region `{region}` has been closed.")]
	Closed {
		/// Region whose cache is closed.
		region: RegionId,
	},
}
impl AuthError {
	/// Wraps a transport-specific failure for `region`.
	pub fn transport(
		region: RegionId,
		src: impl 'static + Send + Sync + std::error::Error,
	) -> Self {
		Self::Transport { region, source: Box::new(src) }
	}

	/// Region the failure belongs to.
	pub fn region(&self) -> &RegionId {
		match self {
			Self::MissingSecret { region }
			| Self::UnreadableSecret { region, .. }
			| Self::MissingToken { region }
			| Self::MissingExpiry { region }
			| Self::ExpiryOutOfRange { region }
			| Self::Rejected { region, .. }
			| Self::MalformedResponse { region, .. }
			| Self::Transport { region, .. }
			| Self::Closed { region } => region,
		}
	}
}

/// Raised once after fan-out when no region produced a usable result.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("All region queries failed for `{key}`: {}", first_message(.errors))]
pub struct AggregateError {
	/// Logical key the query was issued for.
	pub key: String,
	/// Every per-region error, in configuration order.
	pub errors: Vec<RegionError>,
}
impl AggregateError {
	/// Creates a new aggregate for `key`.
	pub fn new(key: impl Into<String>, errors: Vec<RegionError>) -> Self {
		Self { key: key.into(), errors }
	}

	/// The error surfaced to the immediate caller.
	pub fn first(&self) -> Option<&RegionError> {
		self.errors.first()
	}

	/// All recorded errors, in configuration order.
	pub fn errors(&self) -> &[RegionError] {
		&self.errors
	}
}

fn first_message(errors: &[RegionError]) -> String {
	errors.first().map(ToString::to_string).unwrap_or_else(|| "no region was queried".into())
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Region endpoint failed validation.
	#[error(transparent)]
	InvalidEndpoint(#[from] crate::region::RegionEndpointError),
	/// A request path could not be joined onto a region base URL.
	#[error("Path `{path}` cannot be joined onto the base URL of region `{region}`.")]
	InvalidPath {
		/// Region whose base URL was used.
		region: RegionId,
		/// Offending path.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A facade needs at least one region.
	#[error("At least one region must be configured.")]
	NoRegions,
	/// Two endpoints share one region identifier.
	#[error("Region `{region}` is configured more than once.")]
	DuplicateRegion {
		/// Duplicated identifier.
		region: RegionId,
	},
	/// A region's endpoint was paired with a token cache serving another region.
	#[error("Region `{region}` has no token cache of its own.")]
	MissingTokenCache {
		/// Region missing its cache.
		region: RegionId,
	},
	/// An operation named a region that is not configured.
	#[error("Region `{region}` is not configured.")]
	UnknownRegion {
		/// Requested identifier.
		region: RegionId,
	},
	/// The component was closed and can no longer issue requests.
	#[error("The component has been closed.")]
	Closed,
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}
