//! Logical query description shared by every region of one fan-out.

// std
use std::time::Duration as StdDuration;
// self
use crate::{_prelude::*, obs::QueryKind};

/// HTTP method used for a region query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QueryMethod {
	/// Parameters travel in the query string.
	#[default]
	Get,
	/// Parameters travel in the query string and an optional JSON body is sent.
	Post,
}

/// One logical query, opaque to the engine apart from [`logical_key`](Self::logical_key).
///
/// `path` is joined onto each region's base URL; `params` become query-string pairs; `body`
/// is sent as JSON when present.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryRequest {
	/// Operation label used for spans and metrics.
	pub kind: QueryKind,
	/// Key the selector compares against each item's identity field.
	pub logical_key: String,
	/// HTTP method.
	pub method: QueryMethod,
	/// Path relative to the region base URL.
	pub path: String,
	/// Domain filters sent as query-string pairs.
	pub params: BTreeMap<String, String>,
	/// Optional JSON body.
	pub body: Option<Value>,
	/// Per-call timeout.
	pub timeout: StdDuration,
}
impl QueryRequest {
	/// Timeout applied to lookups unless overridden.
	pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(30);

	/// Creates a `GET` query.
	pub fn get(kind: QueryKind, logical_key: impl Into<String>, path: impl Into<String>) -> Self {
		Self {
			kind,
			logical_key: logical_key.into(),
			method: QueryMethod::Get,
			path: path.into(),
			params: BTreeMap::new(),
			body: None,
			timeout: Self::DEFAULT_TIMEOUT,
		}
	}

	/// Creates a `POST` query carrying `body` as JSON.
	pub fn post(
		kind: QueryKind,
		logical_key: impl Into<String>,
		path: impl Into<String>,
		body: Value,
	) -> Self {
		Self { method: QueryMethod::Post, body: Some(body), ..Self::get(kind, logical_key, path) }
	}

	/// Adds one query-string pair.
	pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.insert(name.into(), value.into());

		self
	}

	/// Overrides the per-call timeout.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = timeout;

		self
	}
}
