#![allow(dead_code)]

// self
use region_fanout::{
	auth::{Credential, CredentialKind, SessionTokenProvider, TokenCache},
	http::HttpClient,
	region::{RegionEndpoint, RegionId, TokenHeader},
	url::Url,
};

pub const SESSION_SECRET: &str = "session-secret";

pub fn region_id(value: &str) -> RegionId {
	RegionId::new(value).expect("Region fixture identifier should be valid.")
}

pub fn url(value: &str) -> Url {
	Url::parse(value).expect("Fixture URL should parse.")
}

pub fn endpoint(id: &str, base_url: &str) -> RegionEndpoint {
	RegionEndpoint::builder(region_id(id))
		.display_name(format!("{id} region"))
		.base_url(url(base_url))
		.credential_kind(CredentialKind::Session)
		.token_header(TokenHeader::named("x-jwt-token"))
		.build()
		.expect("Region fixture endpoint should build.")
}

pub fn session_cache(id: &str, auth_url: &str) -> TokenCache {
	let provider = SessionTokenProvider::new(url(auth_url), HttpClient::default());

	TokenCache::new(Credential::new(region_id(id), SESSION_SECRET), Box::new(provider))
}
