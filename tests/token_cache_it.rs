mod common;

// std
use std::time::Duration as StdDuration;
// crates.io
use httpmock::prelude::*;
use region_fanout::{
	auth::{
		ApplicationTokenProvider, Credential, CredentialKind, SessionTokenProvider, TokenCache,
		TokenProvider,
	},
	error::AuthError,
	http::HttpClient,
};
use serde_json::json;
use time::{Duration, OffsetDateTime};
// self
use common::*;

fn application_cache(server: &MockServer) -> TokenCache {
	let auth_url = url(&server.url("/open-apis/auth/v3/tenant_access_token"));
	let provider = ApplicationTokenProvider::new(auth_url, "cli_app", HttpClient::default());

	TokenCache::new(Credential::new(region_id("lark"), "app-secret"), Box::new(provider))
}

#[tokio::test]
async fn session_token_is_cached_until_forced() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/auth/api/v1/jwt").header("cookie", "CAS_SESSION=session-secret");
			then.status(200).header("x-jwt-token", "t1");
		})
		.await;
	let mut cache = session_cache("cn", &server.url("/auth/api/v1/jwt"));
	let before = OffsetDateTime::now_utc();
	let first = cache.get_token(false).await.expect("Session exchange should succeed.");
	let second = cache.get_token(false).await.expect("Cached token should be reused.");

	assert_eq!(first.expose(), "t1");
	assert_eq!(second.expose(), "t1");
	mock.assert_calls_async(1).await;

	let expires_at = cache.credential().expires_at().expect("Expiry should be recorded.");

	assert!(expires_at >= before + Duration::seconds(3600));
	assert!(expires_at <= OffsetDateTime::now_utc() + Duration::seconds(3600));
	assert!(cache.is_valid_at(expires_at - Duration::seconds(301)));
	assert!(!cache.is_valid_at(expires_at - Duration::seconds(300)));

	cache.get_token(true).await.expect("Forced exchange should succeed.");
	mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn session_exchange_without_header_reports_missing_token() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/jwt");
			then.status(200).body("ok");
		})
		.await;
	let mut cache = session_cache("us", &server.url("/jwt"));
	let err = cache.get_token(false).await.expect_err("Missing header should fail.");

	assert!(matches!(err, AuthError::MissingToken { ref region } if region.as_ref() == "us"));
	assert!(err.to_string().contains("no token in response"));
	assert!(!cache.status().has_token);
	mock.assert_async().await;
}

#[tokio::test]
async fn session_rejection_carries_status() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/jwt");
			then.status(401);
		})
		.await;
	let mut cache = session_cache("i18n", &server.url("/jwt"));
	let err = cache.get_token(false).await.expect_err("Rejected session should fail.");

	assert!(matches!(err, AuthError::Rejected { status: 401, .. }));
}

#[tokio::test]
async fn session_transport_failure_is_wrapped() {
	let provider = SessionTokenProvider::new(
		url("http://127.0.0.1:9/jwt"),
		HttpClient::default(),
	)
	.with_timeout(StdDuration::from_secs(2));
	let mut cache =
		TokenCache::new(Credential::new(region_id("cn"), SESSION_SECRET), Box::new(provider));
	let err = cache.get_token(false).await.expect_err("Unreachable endpoint should fail.");

	assert!(matches!(err, AuthError::Transport { .. }));
}

#[tokio::test]
async fn application_token_uses_remote_lifetime() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/open-apis/auth/v3/tenant_access_token")
				.header("content-type", "application/json")
				.json_body(json!({ "app_id": "cli_app", "app_secret": "app-secret" }));
			then.status(200).json_body(json!({
				"code": 0,
				"msg": "ok",
				"tenant_access_token": "t-app",
				"expire": 7200
			}));
		})
		.await;
	let mut cache = application_cache(&server);

	assert_eq!(cache.skew(), CredentialKind::Application.default_skew());

	let before = OffsetDateTime::now_utc();
	let token = cache.get_token(false).await.expect("Application exchange should succeed.");

	assert_eq!(token.expose(), "t-app");

	let expires_at = cache.credential().expires_at().expect("Expiry should be recorded.");

	assert!(expires_at >= before + Duration::seconds(7200));
	assert!(cache.is_valid());

	cache.get_token(false).await.expect("Cached token should be reused.");
	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn application_token_without_expire_is_rejected() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/open-apis/auth/v3/tenant_access_token");
			then.status(200).json_body(json!({ "code": 0, "tenant_access_token": "t-app" }));
		})
		.await;
	let err = application_cache(&server).get_token(false).await.expect_err("No expire should fail.");

	assert!(matches!(err, AuthError::MissingExpiry { .. }));
}

#[tokio::test]
async fn application_token_with_huge_expire_is_rejected() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/open-apis/auth/v3/tenant_access_token");
			then.status(200)
				.json_body(json!({ "tenant_access_token": "t", "expire": 9_000_000_000_000_i64 }));
		})
		.await;
	let mut cache = application_cache(&server);
	let err = cache.get_token(false).await.expect_err("Unrepresentable expiry should fail.");

	assert!(matches!(err, AuthError::ExpiryOutOfRange { ref region } if region.as_ref() == "lark"));
	assert!(!cache.status().has_token);
}

#[tokio::test]
async fn application_token_malformed_body_is_reported() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/open-apis/auth/v3/tenant_access_token");
			then.status(200).json_body(json!({ "tenant_access_token": 42, "expire": 7200 }));
		})
		.await;
	let err = application_cache(&server).get_token(false).await.expect_err("Bad field should fail.");

	assert!(matches!(err, AuthError::MalformedResponse { .. }));
}

#[tokio::test]
async fn closed_provider_refuses_exchange() {
	let mut provider = ApplicationTokenProvider::new(
		url("http://127.0.0.1:9/token"),
		"cli_app",
		HttpClient::default(),
	);

	provider.close();

	let credential = Credential::new(region_id("lark"), "app-secret");
	let err = provider.exchange(&credential).await.expect_err("Closed provider should refuse.");

	assert!(matches!(err, AuthError::Closed { .. }));
}
