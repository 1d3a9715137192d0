//! Immutable per-region endpoint descriptor.

// self
use crate::{
	_prelude::*,
	error::ConfigError,
	region::{RegionEndpointBuilder, RegionId},
};

/// Where a region query carries its token.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenHeader {
	/// `Authorization: Bearer <token>`.
	#[default]
	Bearer,
	/// A dedicated header carrying the raw token (for example `x-jwt-token`).
	Named(String),
}
impl TokenHeader {
	/// Shorthand for [`TokenHeader::Named`].
	pub fn named(header: impl Into<String>) -> Self {
		Self::Named(header.into())
	}

	/// Header name/value pair for `token`.
	pub fn pair(&self, token: &str) -> (&str, String) {
		match self {
			Self::Bearer => ("authorization", format!("Bearer {token}")),
			Self::Named(name) => (name.as_str(), token.to_owned()),
		}
	}
}

/// Static description of one regional deployment, loaded at construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionEndpoint {
	/// Region identifier.
	pub id: RegionId,
	/// Human-readable name surfaced alongside results.
	pub display_name: String,
	/// Base URL request paths are joined onto.
	pub base_url: Url,
	/// Safety margin subtracted from token expiry before a refresh is forced.
	pub skew_seconds: i64,
	/// Token placement on outgoing queries.
	#[serde(default)]
	pub token_header: TokenHeader,
}
impl RegionEndpoint {
	/// Creates a new builder for the provided identifier.
	pub fn builder(id: RegionId) -> RegionEndpointBuilder {
		RegionEndpointBuilder::new(id)
	}

	/// Refresh skew as a duration.
	pub fn skew(&self) -> Duration {
		Duration::seconds(self.skew_seconds)
	}

	/// Resolves `path` against the base URL.
	pub fn url_for(&self, path: &str) -> Result<Url, ConfigError> {
		self.base_url.join(path).map_err(|source| ConfigError::InvalidPath {
			region: self.id.clone(),
			path: path.to_owned(),
			source,
		})
	}
}
