//! Region query execution: exactly one network call per region, classified into a
//! [`RegionResult`].

// std
use std::time::Instant;
// crates.io
use reqwest::header::CONTENT_TYPE;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	http::HttpClient,
	query::{Envelope, QueryMethod, QueryRequest, RegionErrorKind, RegionResult},
	region::RegionEndpoint,
};

/// Boxed future returned by [`RegionQueryExecutor::execute`]; it resolves to a result, never an
/// error.
pub type ExecuteFuture<'a> = Pin<Box<dyn Future<Output = RegionResult> + 'a + Send>>;

/// Performs one region call and classifies the outcome.
///
/// Implementations must not panic for ordinary backend failures; every failure becomes a
/// [`RegionResult`] carrying a [`RegionError`](crate::query::RegionError).
pub trait RegionQueryExecutor
where
	Self: Send + Sync,
{
	/// Queries `endpoint` with `token`.
	fn execute<'a>(
		&'a self,
		endpoint: &'a RegionEndpoint,
		token: &'a TokenSecret,
		request: &'a QueryRequest,
	) -> ExecuteFuture<'a>;

	/// Releases connection resources. Later calls should yield error results.
	fn close(&self) {}
}

/// [`RegionQueryExecutor`] backed by [`HttpClient`].
#[derive(Debug)]
pub struct HttpRegionExecutor {
	http: RwLock<Option<HttpClient>>,
}
impl HttpRegionExecutor {
	/// Creates an executor sharing `http`'s connection pool.
	pub fn new(http: HttpClient) -> Self {
		Self { http: RwLock::new(Some(http)) }
	}

	/// Whether the connection pool has been dropped.
	pub fn is_closed(&self) -> bool {
		self.http.read().is_none()
	}

	async fn run(
		&self,
		endpoint: &RegionEndpoint,
		token: &TokenSecret,
		request: &QueryRequest,
	) -> Result<Value, (RegionErrorKind, String)> {
		let http = self
			.http
			.read()
			.clone()
			.ok_or_else(|| (RegionErrorKind::Http, "executor has been closed".to_owned()))?;
		let url = endpoint.url_for(&request.path).map_err(|e| (RegionErrorKind::Http, e.to_string()))?;
		let (header, value) = endpoint.token_header.pair(token.expose());
		let mut builder = match request.method {
			QueryMethod::Get => http.get(url),
			QueryMethod::Post => http.post(url),
		}
		.query(&request.params)
		.header(header, value)
		.timeout(request.timeout);

		if let Some(body) = &request.body {
			let bytes = serde_json::to_vec(body).map_err(|e| (RegionErrorKind::Http, e.to_string()))?;

			builder = builder.header(CONTENT_TYPE, "application/json").body(bytes);
		}

		let response = builder.send().await.map_err(classify_transport)?;
		let status = response.status();

		if !status.is_success() {
			return Err((RegionErrorKind::Http, format!("HTTP {}", status.as_u16())));
		}

		let bytes = response.bytes().await.map_err(classify_transport)?;
		let envelope =
			Envelope::parse(&bytes).map_err(|e| (RegionErrorKind::Protocol, e.to_string()))?;

		if !envelope.is_success() {
			return Err((RegionErrorKind::Business, envelope.failure_message()));
		}

		Ok(envelope.data)
	}
}
impl Default for HttpRegionExecutor {
	fn default() -> Self {
		Self::new(HttpClient::default())
	}
}
impl RegionQueryExecutor for HttpRegionExecutor {
	fn execute<'a>(
		&'a self,
		endpoint: &'a RegionEndpoint,
		token: &'a TokenSecret,
		request: &'a QueryRequest,
	) -> ExecuteFuture<'a> {
		Box::pin(async move {
			let started = Instant::now();
			let outcome = self.run(endpoint, token, request).await;
			let elapsed = started.elapsed();

			match outcome {
				Ok(payload) => RegionResult::success(endpoint, payload, elapsed),
				Err((kind, message)) => RegionResult::failure(endpoint, kind, message, elapsed),
			}
		})
	}

	fn close(&self) {
		self.http.write().take();
	}
}

fn classify_transport(e: ReqwestError) -> (RegionErrorKind, String) {
	if e.is_timeout() {
		(RegionErrorKind::Timeout, "request timed out".to_owned())
	} else {
		(RegionErrorKind::Http, e.to_string())
	}
}
