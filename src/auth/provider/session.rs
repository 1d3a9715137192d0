//! Session-derived token exchange: secret sent as a cookie, token returned in a header.

// std
use std::time::Duration as StdDuration;
// crates.io
use reqwest::header::COOKIE;
// self
use crate::{
	_prelude::*,
	auth::{Credential, CredentialKind, ProviderFuture, TokenGrant, TokenProvider},
	error::AuthError,
	http::HttpClient,
};

/// Exchanges a browser session secret for a short-lived token.
#[derive(Clone, Debug)]
pub struct SessionTokenProvider {
	auth_url: Url,
	cookie_name: String,
	token_header: String,
	timeout: StdDuration,
	http: Option<HttpClient>,
}
impl SessionTokenProvider {
	/// Cookie that carries the session secret by default.
	pub const DEFAULT_COOKIE: &'static str = "CAS_SESSION";
	/// Response header that carries the token by default.
	pub const DEFAULT_TOKEN_HEADER: &'static str = "x-jwt-token";
	/// Timeout applied to the exchange.
	pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(30);

	/// Creates a provider that calls `auth_url`.
	pub fn new(auth_url: Url, http: HttpClient) -> Self {
		Self {
			auth_url,
			cookie_name: Self::DEFAULT_COOKIE.into(),
			token_header: Self::DEFAULT_TOKEN_HEADER.into(),
			timeout: Self::DEFAULT_TIMEOUT,
			http: Some(http),
		}
	}

	/// Overrides the cookie name carrying the secret.
	pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
		self.cookie_name = name.into();

		self
	}

	/// Overrides the response header carrying the token.
	pub fn with_token_header(mut self, header: impl Into<String>) -> Self {
		self.token_header = header.into();

		self
	}

	/// Overrides the exchange timeout.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Auth endpoint called by this provider.
	pub fn auth_url(&self) -> &Url {
		&self.auth_url
	}
}
impl TokenProvider for SessionTokenProvider {
	fn kind(&self) -> CredentialKind {
		CredentialKind::Session
	}

	fn exchange<'a>(&'a self, credential: &'a Credential) -> ProviderFuture<'a> {
		Box::pin(async move {
			let region = credential.region();
			let http = self.http.as_ref().ok_or_else(|| AuthError::Closed { region: region.clone() })?;
			let cookie = format!("{}={}", self.cookie_name, credential.secret().expose());
			let response = http
				.get(self.auth_url.clone())
				.header(COOKIE, cookie)
				.timeout(self.timeout)
				.send()
				.await
				.map_err(|e| AuthError::transport(region.clone(), e))?;
			let status = response.status();

			if !status.is_success() {
				return Err(AuthError::Rejected { region: region.clone(), status: status.as_u16() });
			}

			let token = response
				.headers()
				.get(self.token_header.as_str())
				.and_then(|value| value.to_str().ok())
				.map(str::trim)
				.filter(|value| !value.is_empty())
				.ok_or_else(|| AuthError::MissingToken { region: region.clone() })?;

			Ok(TokenGrant::new(
				token,
				OffsetDateTime::now_utc() + CredentialKind::SESSION_TOKEN_LIFETIME,
			))
		})
	}

	fn close(&mut self) {
		self.http = None;
	}
}
