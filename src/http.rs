//! Shared HTTP transport for auth exchanges and region queries.

// std
use std::{ops::Deref, time::Duration as StdDuration};
// crates.io
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
// self
use crate::{_prelude::*, error::ConfigError};

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Cloning is cheap; every clone shares one connection pool. Per-request timeouts are set by
/// callers, so the wrapped client should not impose a shorter global timeout.
#[derive(Clone, Debug, Default)]
pub struct HttpClient(pub ReqwestClient);
impl HttpClient {
	/// Connect timeout used by [`browser_like`](Self::browser_like).
	pub const CONNECT_TIMEOUT: StdDuration = StdDuration::from_secs(10);

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client that presents browser-like default headers, which some regional gateways
	/// require before they accept session-derived tokens.
	pub fn browser_like() -> Result<Self, ConfigError> {
		let mut headers = HeaderMap::new();

		headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/plain, */*"));
		headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.9"));
		headers.insert(
			USER_AGENT,
			HeaderValue::from_static(concat!("region-fanout/", env!("CARGO_PKG_VERSION"))),
		);

		let client = ReqwestClient::builder()
			.default_headers(headers)
			.connect_timeout(Self::CONNECT_TIMEOUT)
			.build()?;

		Ok(Self(client))
	}
}
impl AsRef<ReqwestClient> for HttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for HttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
