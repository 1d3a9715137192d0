//! Validated construction of [`RegionEndpoint`] values.

// self
use crate::{
	_prelude::*,
	auth::CredentialKind,
	region::{RegionEndpoint, RegionId, TokenHeader},
};

/// Errors raised while constructing or validating region endpoints.
#[derive(Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum RegionEndpointError {
	/// Base URL is mandatory.
	#[error("Region `{region}` is missing a base URL.")]
	MissingBaseUrl {
		/// Region under construction.
		region: RegionId,
	},
	/// Only HTTP(S) endpoints can be queried.
	#[error("Region `{region}` base URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// Region under construction.
		region: RegionId,
		/// URL that failed validation.
		url: String,
	},
	/// The base URL cannot have paths joined onto it.
	#[error("Region `{region}` base URL cannot be used as a base: {url}.")]
	NotABase {
		/// Region under construction.
		region: RegionId,
		/// URL that failed validation.
		url: String,
	},
	/// Skew must not be negative.
	#[error("Region `{region}` skew must not be negative.")]
	NegativeSkew {
		/// Region under construction.
		region: RegionId,
	},
	/// Skew exceeds the supported maximum.
	#[error("Region `{region}` skew exceeds {max} seconds.")]
	SkewTooLarge {
		/// Region under construction.
		region: RegionId,
		/// Maximum permitted skew in seconds.
		max: i64,
	},
}

/// Builder for [`RegionEndpoint`] values.
#[derive(Debug)]
pub struct RegionEndpointBuilder {
	/// Identifier for the endpoint being constructed.
	pub id: RegionId,
	/// Optional display name (defaults to the identifier).
	pub display_name: Option<String>,
	/// Base URL for queries.
	pub base_url: Option<Url>,
	/// Refresh skew; defaults to the session credential skew.
	pub skew: Duration,
	/// Token placement on outgoing queries.
	pub token_header: TokenHeader,
}
impl RegionEndpointBuilder {
	/// Creates a new builder seeded with the provided identifier.
	pub fn new(id: RegionId) -> Self {
		Self {
			id,
			display_name: None,
			base_url: None,
			skew: CredentialKind::Session.default_skew(),
			token_header: TokenHeader::default(),
		}
	}

	/// Sets the display name.
	pub fn display_name(mut self, name: impl Into<String>) -> Self {
		self.display_name = Some(name.into());

		self
	}

	/// Sets the base URL.
	pub fn base_url(mut self, url: Url) -> Self {
		self.base_url = Some(url);

		self
	}

	/// Overrides the refresh skew.
	pub fn skew(mut self, skew: Duration) -> Self {
		self.skew = skew;

		self
	}

	/// Applies the default skew of a credential kind.
	pub fn credential_kind(mut self, kind: CredentialKind) -> Self {
		self.skew = kind.default_skew();

		self
	}

	/// Overrides the token placement.
	pub fn token_header(mut self, header: TokenHeader) -> Self {
		self.token_header = header;

		self
	}

	/// Consumes the builder and validates the resulting endpoint.
	pub fn build(self) -> Result<RegionEndpoint, RegionEndpointError> {
		let base_url = self
			.base_url
			.ok_or_else(|| RegionEndpointError::MissingBaseUrl { region: self.id.clone() })?;
		let endpoint = RegionEndpoint {
			display_name: self.display_name.unwrap_or_else(|| self.id.to_string()),
			id: self.id,
			base_url,
			skew_seconds: self.skew.whole_seconds(),
			token_header: self.token_header,
		};

		endpoint.validate()?;

		Ok(endpoint)
	}
}

impl RegionEndpoint {
	/// Largest accepted refresh skew (one day).
	pub const MAX_SKEW_SECONDS: i64 = 86_400;

	/// Validates invariants for the endpoint.
	pub fn validate(&self) -> Result<(), RegionEndpointError> {
		if !matches!(self.base_url.scheme(), "http" | "https") {
			return Err(RegionEndpointError::UnsupportedScheme {
				region: self.id.clone(),
				url: self.base_url.to_string(),
			});
		}
		if self.base_url.cannot_be_a_base() {
			return Err(RegionEndpointError::NotABase {
				region: self.id.clone(),
				url: self.base_url.to_string(),
			});
		}
		if self.skew_seconds < 0 {
			return Err(RegionEndpointError::NegativeSkew { region: self.id.clone() });
		}
		if self.skew_seconds > Self::MAX_SKEW_SECONDS {
			return Err(RegionEndpointError::SkewTooLarge {
				region: self.id.clone(),
				max: Self::MAX_SKEW_SECONDS,
			});
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn builder() -> RegionEndpointBuilder {
		RegionEndpoint::builder(RegionId::new("cn").expect("Region fixture should be valid."))
	}

	#[test]
	fn builder_applies_defaults() {
		let endpoint = builder()
			.base_url(Url::parse("https://svc.example.com").expect("URL fixture should parse."))
			.build()
			.expect("Endpoint should build with defaults.");

		assert_eq!(endpoint.display_name, "cn");
		assert_eq!(endpoint.skew_seconds, 300);
		assert_eq!(endpoint.token_header, TokenHeader::Bearer);
	}

	#[test]
	fn credential_kind_selects_skew() {
		let endpoint = builder()
			.base_url(Url::parse("https://open.example.com").expect("URL fixture should parse."))
			.credential_kind(CredentialKind::Application)
			.build()
			.expect("Endpoint should build for application credentials.");

		assert_eq!(endpoint.skew(), Duration::minutes(30));
	}

	#[test]
	fn builder_rejects_invalid_input() {
		assert!(matches!(builder().build(), Err(RegionEndpointError::MissingBaseUrl { .. })));
		assert!(matches!(
			builder()
				.base_url(Url::parse("ftp://files.example.com").expect("URL fixture should parse."))
				.build(),
			Err(RegionEndpointError::UnsupportedScheme { .. })
		));
		assert!(matches!(
			builder()
				.base_url(Url::parse("https://svc.example.com").expect("URL fixture should parse."))
				.skew(Duration::seconds(-1))
				.build(),
			Err(RegionEndpointError::NegativeSkew { .. })
		));
	}

	#[test]
	fn oversized_skew_is_rejected() {
		assert!(matches!(
			builder()
				.base_url(Url::parse("https://svc.example.com").expect("URL fixture should parse."))
				.skew(Duration::seconds(i64::MAX / 2))
				.build(),
			Err(RegionEndpointError::SkewTooLarge { .. })
		));
		assert!(
			builder()
				.base_url(Url::parse("https://svc.example.com").expect("URL fixture should parse."))
				.skew(Duration::seconds(RegionEndpoint::MAX_SKEW_SECONDS))
				.build()
				.is_ok()
		);
	}

	#[test]
	fn oversized_skew_from_config_is_rejected() {
		let endpoint: RegionEndpoint = serde_json::from_str(
			r#"{
				"id": "cn",
				"display_name": "cn",
				"base_url": "https://svc.example.com",
				"skew_seconds": 4611686018427387903
			}"#,
		)
		.expect("Endpoint configuration should deserialize.");

		assert!(matches!(
			endpoint.validate(),
			Err(RegionEndpointError::SkewTooLarge { max: RegionEndpoint::MAX_SKEW_SECONDS, .. })
		));
	}
}
