//! Per-region credential caching and deterministic concurrent fan-out for backends that are
//! partitioned across independently authenticated regions.
//!
//! A [`facade::RegionalFacade`] owns one [`auth::TokenCache`] per region, obtains tokens
//! sequentially, fans a [`query::QueryRequest`] out to every region through
//! [`fanout::FanOutCoordinator`], and lets [`select::ResultSelector`] pick a single
//! authoritative answer in configuration order.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod error;
pub mod facade;
pub mod fanout;
pub mod http;
pub mod obs;
pub mod query;
pub mod region;
pub mod select;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{Credential, CredentialKind, SessionTokenProvider, TokenCache},
		http::HttpClient,
		region::{RegionEndpoint, RegionId, TokenHeader},
	};

	/// Builds a validated region identifier, panicking on invalid fixtures.
	pub fn region_id(value: &str) -> RegionId {
		RegionId::new(value).expect("Region fixture identifier should be valid.")
	}

	/// Builds a region endpoint rooted at `base_url` that sends tokens as `x-jwt-token`.
	pub fn test_endpoint(id: &str, base_url: &str) -> RegionEndpoint {
		RegionEndpoint::builder(region_id(id))
			.display_name(format!("{id} region"))
			.base_url(Url::parse(base_url).expect("Region fixture base URL should parse."))
			.credential_kind(CredentialKind::Session)
			.token_header(TokenHeader::named("x-jwt-token"))
			.build()
			.expect("Region fixture endpoint should build.")
	}

	/// Builds a session-derived token cache that exchanges `secret` at `auth_url`.
	pub fn test_session_cache(id: &str, secret: &str, auth_url: &str) -> TokenCache {
		let region = region_id(id);
		let provider = SessionTokenProvider::new(
			Url::parse(auth_url).expect("Auth fixture URL should parse."),
			HttpClient::default(),
		);

		TokenCache::new(Credential::new(region, secret), Box::new(provider))
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::RwLock;
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
