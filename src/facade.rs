//! Composition of token caches, fan-out, and selection behind one call per logical query.

pub mod lookups;

pub use lookups::*;

// std
use std::time::Duration as StdDuration;
// self
use crate::{
	_prelude::*,
	auth::{TokenCache, TokenStatus},
	error::ConfigError,
	fanout::{FanOutCoordinator, FanOutTarget},
	http::HttpClient,
	obs::{self, QueryOutcome, QuerySpan},
	query::{HttpRegionExecutor, QueryRequest, RegionQueryExecutor},
	region::{RegionEndpoint, RegionId},
	select::{MatchRule, ResultSelector, SelectionOutcome},
};

/// Which configured regions a query fans out to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum RegionFilter {
	/// Every configured region.
	#[default]
	All,
	/// One region; an identifier that is not configured falls back to [`RegionFilter::All`].
	Only(RegionId),
}
impl RegionFilter {
	/// Parses a user-supplied filter; `all`, blank, or an invalid identifier mean every region.
	pub fn parse(value: &str) -> Self {
		let value = value.trim();

		if value.is_empty() || value.eq_ignore_ascii_case("all") {
			return Self::All;
		}

		RegionId::new(value).map(Self::Only).unwrap_or(Self::All)
	}
}

struct RegionSlot {
	endpoint: RegionEndpoint,
	cache: AsyncMutex<TokenCache>,
}

/// Owns one [`TokenCache`] per region and runs logical queries across them.
///
/// Tokens are obtained sequentially before dispatch; a credential failure aborts the query
/// without contacting any region. Each cache sits behind an async mutex, so a facade can be
/// shared by concurrent callers.
pub struct RegionalFacade {
	slots: Vec<RegionSlot>,
	executor: RwLock<Option<Arc<dyn RegionQueryExecutor>>>,
	deadline: Option<StdDuration>,
}
impl RegionalFacade {
	/// Creates an empty builder.
	pub fn builder() -> RegionalFacadeBuilder {
		RegionalFacadeBuilder::default()
	}

	/// Configured regions, in configuration order.
	pub fn regions(&self) -> impl Iterator<Item = &RegionEndpoint> {
		self.slots.iter().map(|slot| &slot.endpoint)
	}

	/// Whether [`close`](Self::close) has been called.
	pub fn is_closed(&self) -> bool {
		self.executor.read().is_none()
	}

	/// Runs `request` against the regions selected by `filter` and selects one answer with
	/// `rule`.
	///
	/// Returns [`Error::Auth`] when any selected region cannot produce a token and
	/// [`Error::Aggregate`] when every region failed.
	pub async fn query(
		&self,
		filter: &RegionFilter,
		request: &QueryRequest,
		rule: MatchRule,
	) -> Result<SelectionOutcome> {
		let executor = self.executor.read().clone().ok_or(ConfigError::Closed)?;
		let span = QuerySpan::new(request.kind, "facade.query");

		obs::record_query_outcome(request.kind, QueryOutcome::Attempt);

		let outcome = span.instrument(self.run_query(executor, filter, request, rule)).await;

		match &outcome {
			Ok(_) => obs::record_query_outcome(request.kind, QueryOutcome::Success),
			Err(_) => obs::record_query_outcome(request.kind, QueryOutcome::Failure),
		}

		outcome
	}

	/// Runs a prepared [`Lookup`].
	pub async fn run<L>(&self, lookup: &L) -> Result<SelectionOutcome>
	where
		L: Lookup,
	{
		self.query(&lookup.filter(), &lookup.request(), lookup.rule()).await
	}

	/// Reports every region's token state, in configuration order.
	pub async fn token_status(&self) -> Vec<TokenStatus> {
		let mut statuses = Vec::with_capacity(self.slots.len());

		for slot in &self.slots {
			statuses.push(slot.cache.lock().await.status());
		}

		statuses
	}

	/// Forces a token refresh for `region` and reports the new state.
	pub async fn refresh_token(&self, region: &RegionId) -> Result<TokenStatus> {
		if self.is_closed() {
			return Err(ConfigError::Closed.into());
		}

		let slot = self
			.slots
			.iter()
			.find(|slot| &slot.endpoint.id == region)
			.ok_or_else(|| ConfigError::UnknownRegion { region: region.clone() })?;
		let mut cache = slot.cache.lock().await;

		cache.get_token(true).await?;

		Ok(cache.status())
	}

	/// Releases every owned connection resource. Later queries fail with
	/// [`ConfigError::Closed`]; calling it twice is harmless.
	///
	/// Takes `&self` so a facade shared behind an [`Arc`] can be closed. Each cache is closed
	/// once any in-flight token fetch for its region has released the lock.
	pub async fn close(&self) {
		let executor = self.executor.write().take();

		if let Some(executor) = executor {
			executor.close();
		}

		for slot in &self.slots {
			slot.cache.lock().await.close();
		}
	}

	async fn run_query(
		&self,
		executor: Arc<dyn RegionQueryExecutor>,
		filter: &RegionFilter,
		request: &QueryRequest,
		rule: MatchRule,
	) -> Result<SelectionOutcome> {
		let mut targets = Vec::new();

		for slot in self.selected(filter) {
			let token = slot.cache.lock().await.get_token(false).await?;

			targets.push(FanOutTarget::new(slot.endpoint.clone(), token));
		}

		let mut coordinator = FanOutCoordinator::new(executor);

		if let Some(deadline) = self.deadline {
			coordinator = coordinator.with_deadline(deadline);
		}

		let results = coordinator.dispatch(targets, request).await;

		ResultSelector::new(rule).select(results, &request.logical_key).into_result(&request.logical_key)
	}

	fn selected<'a>(&'a self, filter: &RegionFilter) -> Vec<&'a RegionSlot> {
		if let RegionFilter::Only(region) = filter {
			let only = self.slots.iter().filter(|slot| &slot.endpoint.id == region).collect::<Vec<_>>();

			if !only.is_empty() {
				return only;
			}
		}

		self.slots.iter().collect()
	}
}
impl Debug for RegionalFacade {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RegionalFacade")
			.field("regions", &self.slots.iter().map(|slot| &slot.endpoint.id).collect::<Vec<_>>())
			.field("deadline", &self.deadline)
			.field("closed", &self.is_closed())
			.finish()
	}
}

/// Builder for [`RegionalFacade`].
#[derive(Default)]
pub struct RegionalFacadeBuilder {
	regions: Vec<(RegionEndpoint, TokenCache)>,
	executor: Option<Arc<dyn RegionQueryExecutor>>,
	deadline: Option<StdDuration>,
}
impl RegionalFacadeBuilder {
	/// Adds a region. Order of calls is the configuration order used for selection.
	///
	/// The endpoint's skew replaces the cache's.
	pub fn region(mut self, endpoint: RegionEndpoint, cache: TokenCache) -> Self {
		self.regions.push((endpoint, cache));

		self
	}

	/// Overrides the executor (defaults to [`HttpRegionExecutor`]).
	pub fn executor(mut self, executor: Arc<dyn RegionQueryExecutor>) -> Self {
		self.executor = Some(executor);

		self
	}

	/// Bounds every fan-out by `deadline`.
	pub fn fanout_deadline(mut self, deadline: StdDuration) -> Self {
		self.deadline = Some(deadline);

		self
	}

	/// Validates the region list and builds the facade.
	pub fn build(self) -> Result<RegionalFacade, ConfigError> {
		if self.regions.is_empty() {
			return Err(ConfigError::NoRegions);
		}

		let mut slots = Vec::<RegionSlot>::with_capacity(self.regions.len());

		for (endpoint, mut cache) in self.regions {
			endpoint.validate()?;

			if slots.iter().any(|slot| slot.endpoint.id == endpoint.id) {
				return Err(ConfigError::DuplicateRegion { region: endpoint.id });
			}
			if cache.region() != &endpoint.id {
				return Err(ConfigError::MissingTokenCache { region: endpoint.id });
			}

			cache.set_skew(endpoint.skew());
			slots.push(RegionSlot { endpoint, cache: AsyncMutex::new(cache) });
		}

		let executor = match self.executor {
			Some(executor) => executor,
			None => Arc::new(HttpRegionExecutor::new(HttpClient::browser_like()?)),
		};

		Ok(RegionalFacade {
			slots,
			executor: RwLock::new(Some(executor)),
			deadline: self.deadline,
		})
	}
}
impl Debug for RegionalFacadeBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RegionalFacadeBuilder")
			.field("regions", &self.regions.iter().map(|(endpoint, _)| &endpoint.id).collect::<Vec<_>>())
			.field("custom_executor", &self.executor.is_some())
			.field("deadline", &self.deadline)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::_preludet;

	fn facade_with(ids: &[&str]) -> Result<RegionalFacade, ConfigError> {
		ids.iter()
			.fold(RegionalFacade::builder(), |builder, id| {
				builder.region(
					_preludet::test_endpoint(id, "http://127.0.0.1:9/"),
					_preludet::test_session_cache(id, "s", "http://127.0.0.1:9/auth"),
				)
			})
			.build()
	}

	#[test]
	fn filter_parsing() {
		assert_eq!(RegionFilter::parse("all"), RegionFilter::All);
		assert_eq!(RegionFilter::parse(" "), RegionFilter::All);
		assert_eq!(RegionFilter::parse("two words"), RegionFilter::All);
		assert_eq!(RegionFilter::parse("us"), RegionFilter::Only(_preludet::region_id("us")));
	}

	#[test]
	fn unknown_filter_selects_every_region() {
		let facade = facade_with(&["cn", "us"]).expect("Facade fixture should build.");
		let unknown = RegionFilter::Only(_preludet::region_id("eu"));
		let known = RegionFilter::Only(_preludet::region_id("us"));

		assert_eq!(facade.selected(&unknown).len(), 2);
		assert_eq!(facade.selected(&known).len(), 1);
	}

	#[test]
	fn builder_rejects_bad_region_lists() {
		assert!(matches!(facade_with(&[]), Err(ConfigError::NoRegions)));
		assert!(matches!(facade_with(&["cn", "cn"]), Err(ConfigError::DuplicateRegion { .. })));

		let mismatched = RegionalFacade::builder()
			.region(
				_preludet::test_endpoint("cn", "http://127.0.0.1:9/"),
				_preludet::test_session_cache("us", "s", "http://127.0.0.1:9/auth"),
			)
			.build();

		assert!(matches!(mismatched, Err(ConfigError::MissingTokenCache { .. })));
	}

	#[tokio::test]
	async fn closed_facade_refuses_queries() {
		let facade = Arc::new(facade_with(&["cn"]).expect("Facade fixture should build."));
		let shared = Arc::clone(&facade);

		shared.close().await;
		facade.close().await;

		let request = QueryRequest::get(crate::obs::QueryKind::Custom, "k", "/q");
		let err = facade
			.query(&RegionFilter::All, &request, MatchRule::non_empty())
			.await
			.expect_err("Closed facade should refuse.");

		assert!(matches!(err, Error::Config(ConfigError::Closed)));
		assert!(facade.is_closed());

		let refresh = facade
			.refresh_token(&_preludet::region_id("cn"))
			.await
			.expect_err("Closed facade should refuse refreshes.");

		assert!(matches!(refresh, Error::Config(ConfigError::Closed)));
	}
}
