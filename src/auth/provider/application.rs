//! Application-credential token exchange: id/secret posted as JSON, token and lifetime in the
//! response body.

// std
use std::time::Duration as StdDuration;
// crates.io
use reqwest::header::CONTENT_TYPE;
// self
use crate::{
	_prelude::*,
	auth::{Credential, CredentialKind, ProviderFuture, TokenGrant, TokenProvider},
	error::AuthError,
	http::HttpClient,
};

#[derive(Serialize)]
struct ApplicationTokenRequest<'a> {
	app_id: &'a str,
	app_secret: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApplicationTokenResponse {
	#[serde(default, alias = "token")]
	tenant_access_token: Option<String>,
	#[serde(default)]
	expire: Option<i64>,
	#[serde(flatten)]
	other: BTreeMap<String, Value>,
}

/// Exchanges an application id/secret pair for a token whose lifetime the remote declares.
///
/// The credential's secret is the application secret; the application id is fixed per
/// provider.
#[derive(Clone, Debug)]
pub struct ApplicationTokenProvider {
	auth_url: Url,
	app_id: String,
	token_field: Option<String>,
	timeout: StdDuration,
	http: Option<HttpClient>,
}
impl ApplicationTokenProvider {
	/// Timeout applied to the exchange.
	pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(30);

	/// Creates a provider posting `app_id` to `auth_url`.
	pub fn new(auth_url: Url, app_id: impl Into<String>, http: HttpClient) -> Self {
		Self {
			auth_url,
			app_id: app_id.into(),
			token_field: None,
			timeout: Self::DEFAULT_TIMEOUT,
			http: Some(http),
		}
	}

	/// Reads the token from `field` instead of `tenant_access_token` (or `token`).
	pub fn with_token_field(mut self, field: impl Into<String>) -> Self {
		self.token_field = Some(field.into());

		self
	}

	/// Overrides the exchange timeout.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = timeout;

		self
	}
}
impl TokenProvider for ApplicationTokenProvider {
	fn kind(&self) -> CredentialKind {
		CredentialKind::Application
	}

	fn exchange<'a>(&'a self, credential: &'a Credential) -> ProviderFuture<'a> {
		Box::pin(async move {
			let region = credential.region();
			let http = self.http.as_ref().ok_or_else(|| AuthError::Closed { region: region.clone() })?;
			let body = serde_json::to_vec(&ApplicationTokenRequest {
				app_id: &self.app_id,
				app_secret: credential.secret().expose(),
			})
			.map_err(|e| AuthError::transport(region.clone(), e))?;
			let response = http
				.post(self.auth_url.clone())
				.header(CONTENT_TYPE, "application/json")
				.body(body)
				.timeout(self.timeout)
				.send()
				.await
				.map_err(|e| AuthError::transport(region.clone(), e))?;
			let status = response.status();

			if !status.is_success() {
				return Err(AuthError::Rejected { region: region.clone(), status: status.as_u16() });
			}

			let bytes = response.bytes().await.map_err(|e| AuthError::transport(region.clone(), e))?;
			let mut deserializer = serde_json::Deserializer::from_slice(&bytes);
			let parsed: ApplicationTokenResponse =
				serde_path_to_error::deserialize(&mut deserializer).map_err(|source| {
					AuthError::MalformedResponse { region: region.clone(), source }
				})?;
			let custom = self
				.token_field
				.as_ref()
				.and_then(|field| parsed.other.get(field))
				.and_then(Value::as_str)
				.map(str::to_owned);
			let token = custom
				.or(parsed.tenant_access_token)
				.filter(|token| !token.is_empty())
				.ok_or_else(|| AuthError::MissingToken { region: region.clone() })?;
			let expire = parsed
				.expire
				.filter(|seconds| *seconds > 0)
				.ok_or_else(|| AuthError::MissingExpiry { region: region.clone() })?;

			let expires_at = OffsetDateTime::now_utc()
				.checked_add(Duration::seconds(expire))
				.ok_or_else(|| AuthError::ExpiryOutOfRange { region: region.clone() })?;

			Ok(TokenGrant::new(token, expires_at))
		})
	}

	fn close(&mut self) {
		self.http = None;
	}
}
