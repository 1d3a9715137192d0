//! Prepared requests for the lookups the regional backends serve.
//!
//! Each lookup only builds a [`QueryRequest`] and picks a [`MatchRule`]; paths default to the
//! backends' well-known routes and can be overridden with `with_path`.

// std
use std::time::Duration as StdDuration;
// crates.io
use serde_json::json;
// self
use crate::{facade::RegionFilter, obs::QueryKind, query::QueryRequest, select::MatchRule};

/// A prepared logical query.
pub trait Lookup {
	/// Request sent to every selected region.
	fn request(&self) -> QueryRequest;

	/// Selection rule.
	fn rule(&self) -> MatchRule;

	/// Regions to query.
	fn filter(&self) -> RegionFilter {
		RegionFilter::All
	}
}

/// Searches the service registry by keyword; exact when an item's `psm` equals the keyword.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceLookup {
	keyword: String,
	path: String,
}
impl ServiceLookup {
	/// Default search route.
	pub const DEFAULT_PATH: &'static str = "/api/neptune/ms/service/search";

	/// Creates a lookup for `keyword`.
	pub fn new(keyword: impl Into<String>) -> Self {
		Self { keyword: keyword.into(), path: Self::DEFAULT_PATH.into() }
	}

	/// Overrides the route.
	pub fn with_path(mut self, path: impl Into<String>) -> Self {
		self.path = path.into();

		self
	}
}
impl Lookup for ServiceLookup {
	fn request(&self) -> QueryRequest {
		QueryRequest::get(QueryKind::Service, &self.keyword, &self.path)
			.param("keyword", &self.keyword)
			.param("search_type", "all")
	}

	fn rule(&self) -> MatchRule {
		MatchRule::key_field("psm")
	}
}

/// Lists the clusters of one service in the production test plane.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterLookup {
	psm: String,
	env: String,
	path: String,
}
impl ClusterLookup {
	/// Default cluster route.
	pub const DEFAULT_PATH: &'static str = "/api/v1/explorer/explorer/v5/plane/clusters";

	/// Creates a lookup for `psm` in `prod`.
	pub fn new(psm: impl Into<String>) -> Self {
		Self { psm: psm.into(), env: "prod".into(), path: Self::DEFAULT_PATH.into() }
	}

	/// Overrides the environment.
	pub fn with_env(mut self, env: impl Into<String>) -> Self {
		self.env = env.into();

		self
	}

	/// Overrides the route.
	pub fn with_path(mut self, path: impl Into<String>) -> Self {
		self.path = path.into();

		self
	}
}
impl Lookup for ClusterLookup {
	fn request(&self) -> QueryRequest {
		QueryRequest::get(QueryKind::Cluster, &self.psm, &self.path)
			.param("psm", &self.psm)
			.param("test_plane", "1")
			.param("env", &self.env)
	}

	fn rule(&self) -> MatchRule {
		MatchRule::non_empty()
	}
}

/// Lists instance addresses of one service in a zone and data center.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstanceLookup {
	psm: String,
	zone: String,
	idc: String,
	cluster: String,
	env: String,
	path: String,
}
impl InstanceLookup {
	/// Default address route.
	pub const DEFAULT_PATH: &'static str = "/api/v1/explorer/explorer/v5/addrs";

	/// Creates a lookup in the `default` cluster of `prod`.
	pub fn new(psm: impl Into<String>, zone: impl Into<String>, idc: impl Into<String>) -> Self {
		Self {
			psm: psm.into(),
			zone: zone.into(),
			idc: idc.into(),
			cluster: "default".into(),
			env: "prod".into(),
			path: Self::DEFAULT_PATH.into(),
		}
	}

	/// Overrides the cluster.
	pub fn with_cluster(mut self, cluster: impl Into<String>) -> Self {
		self.cluster = cluster.into();

		self
	}

	/// Overrides the route.
	pub fn with_path(mut self, path: impl Into<String>) -> Self {
		self.path = path.into();

		self
	}
}
impl Lookup for InstanceLookup {
	fn request(&self) -> QueryRequest {
		QueryRequest::get(QueryKind::Instance, &self.psm, &self.path)
			.param("psm", &self.psm)
			.param("env", &self.env)
			.param("zone", &self.zone)
			.param("idc", &self.idc)
			.param("cluster", &self.cluster)
	}

	fn rule(&self) -> MatchRule {
		MatchRule::non_empty()
	}
}

/// Finds the log entries of one request identifier; the first region holding any item wins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogLookup {
	log_id: String,
	psm_list: Vec<String>,
	scan_span_in_min: u32,
	vregion: String,
	filter: RegionFilter,
	path: String,
}
impl LogLookup {
	/// Default trace route.
	pub const DEFAULT_PATH: &'static str = "/streamlog/platform/microservice/v1/query/trace";
	/// Default scan window in minutes.
	pub const DEFAULT_SCAN_SPAN_IN_MIN: u32 = 10;

	/// Creates a lookup for `log_id` across every region.
	pub fn new(log_id: impl Into<String>) -> Self {
		Self {
			log_id: log_id.into(),
			psm_list: Vec::new(),
			scan_span_in_min: Self::DEFAULT_SCAN_SPAN_IN_MIN,
			vregion: String::new(),
			filter: RegionFilter::All,
			path: Self::DEFAULT_PATH.into(),
		}
	}

	/// Restricts the search to the given services.
	pub fn with_psm_list<I, S>(mut self, psm_list: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.psm_list = psm_list.into_iter().map(Into::into).collect();

		self
	}

	/// Overrides the scan window.
	pub fn with_scan_span(mut self, minutes: u32) -> Self {
		self.scan_span_in_min = minutes;

		self
	}

	/// Sets the virtual-region list passed to the backend.
	pub fn with_vregion(mut self, vregion: impl Into<String>) -> Self {
		self.vregion = vregion.into();

		self
	}

	/// Restricts the fan-out.
	pub fn with_filter(mut self, filter: RegionFilter) -> Self {
		self.filter = filter;

		self
	}

	/// Overrides the route.
	pub fn with_path(mut self, path: impl Into<String>) -> Self {
		self.path = path.into();

		self
	}
}
impl Lookup for LogLookup {
	fn request(&self) -> QueryRequest {
		QueryRequest::post(
			QueryKind::Log,
			&self.log_id,
			&self.path,
			json!({
				"logid": self.log_id,
				"psm_list": self.psm_list,
				"scan_span_in_min": self.scan_span_in_min,
				"vregion": self.vregion,
			}),
		)
	}

	fn rule(&self) -> MatchRule {
		MatchRule::non_empty().with_items("/items")
	}

	fn filter(&self) -> RegionFilter {
		self.filter.clone()
	}
}

/// Invokes one RPC method on a discovered instance through the debugging gateway.
#[derive(Clone, Debug, PartialEq)]
pub struct RpcSimulation {
	psm: String,
	address: String,
	func_name: String,
	req_body: String,
	zone: String,
	idc: String,
	cluster: String,
	env: String,
	request_timeout_ms: u64,
	path: String,
}
impl RpcSimulation {
	/// Default RPC route.
	pub const DEFAULT_PATH: &'static str = "/api/v1/explorer/explorer/v5/rpc_request";
	/// Per-call timeout; RPC calls run longer than lookups.
	pub const TIMEOUT: StdDuration = StdDuration::from_secs(60);

	/// Creates a simulation of `func_name` on `address` with a JSON-encoded request body.
	pub fn new(
		psm: impl Into<String>,
		address: impl Into<String>,
		func_name: impl Into<String>,
		req_body: impl Into<String>,
	) -> Self {
		Self {
			psm: psm.into(),
			address: address.into(),
			func_name: func_name.into(),
			req_body: req_body.into(),
			zone: String::new(),
			idc: String::new(),
			cluster: "default".into(),
			env: "prod".into(),
			request_timeout_ms: 60_000,
			path: Self::DEFAULT_PATH.into(),
		}
	}

	/// Sets zone and data center of the target instance.
	pub fn with_location(mut self, zone: impl Into<String>, idc: impl Into<String>) -> Self {
		self.zone = zone.into();
		self.idc = idc.into();

		self
	}

	/// Overrides the cluster.
	pub fn with_cluster(mut self, cluster: impl Into<String>) -> Self {
		self.cluster = cluster.into();

		self
	}

	/// Overrides the route.
	pub fn with_path(mut self, path: impl Into<String>) -> Self {
		self.path = path.into();

		self
	}
}
impl Lookup for RpcSimulation {
	fn request(&self) -> QueryRequest {
		QueryRequest::post(
			QueryKind::Rpc,
			&self.func_name,
			&self.path,
			json!({
				"psm": self.psm,
				"func_name": self.func_name,
				"req_body": self.req_body,
				"idl_source": 1,
				"idl_version": "master",
				"zone": self.zone,
				"idc": self.idc,
				"cluster": self.cluster,
				"env": self.env,
				"address": self.address,
				"rpc_context": [],
				"request_timeout": self.request_timeout_ms,
				"connect_timeout": self.request_timeout_ms,
				"online": true,
				"source": 1,
				"base": {},
			}),
		)
		.with_timeout(Self::TIMEOUT)
	}

	fn rule(&self) -> MatchRule {
		MatchRule::non_empty()
	}
}
