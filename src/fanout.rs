//! Concurrent dispatch of one query to many regions with order-preserving collection.

// std
use std::time::{Duration as StdDuration, Instant};
// crates.io
use tokio::task::JoinError;
// self
use crate::{
	_prelude::*,
	auth::TokenSecret,
	obs,
	query::{QueryRequest, RegionErrorKind, RegionQueryExecutor, RegionResult},
	region::RegionEndpoint,
};

/// Lifecycle of a [`FanOutCoordinator`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FanOutState {
	/// No dispatch has started.
	#[default]
	Idle,
	/// Units of execution are running.
	Dispatched,
	/// Every unit has completed and results are available.
	Collected,
}

/// One region to query together with the token obtained for it.
#[derive(Clone, Debug)]
pub struct FanOutTarget {
	/// Region endpoint.
	pub endpoint: RegionEndpoint,
	/// Token already obtained for the region.
	pub token: TokenSecret,
}
impl FanOutTarget {
	/// Creates a target.
	pub fn new(endpoint: RegionEndpoint, token: TokenSecret) -> Self {
		Self { endpoint, token }
	}
}

/// Runs one task per region and returns results in input order.
///
/// The returned list always has one entry per target, in the order the targets were given,
/// regardless of completion order. A task that panics is reported as
/// [`RegionErrorKind::Panicked`]; a task still running at the optional deadline is reported as
/// [`RegionErrorKind::Timeout`].
pub struct FanOutCoordinator {
	executor: Arc<dyn RegionQueryExecutor>,
	deadline: Option<StdDuration>,
	state: FanOutState,
}
impl FanOutCoordinator {
	/// Creates an idle coordinator.
	pub fn new(executor: Arc<dyn RegionQueryExecutor>) -> Self {
		Self { executor, deadline: None, state: FanOutState::Idle }
	}

	/// Bounds the whole dispatch by `deadline`, measured from the start of
	/// [`dispatch`](Self::dispatch).
	pub fn with_deadline(mut self, deadline: StdDuration) -> Self {
		self.deadline = Some(deadline);

		self
	}

	/// Optional deadline in effect.
	pub fn deadline(&self) -> Option<StdDuration> {
		self.deadline
	}

	/// Current state.
	pub fn state(&self) -> FanOutState {
		self.state
	}

	/// Queries every target concurrently and collects the results.
	///
	/// Must be called from within a Tokio runtime.
	pub async fn dispatch(
		&mut self,
		targets: Vec<FanOutTarget>,
		request: &QueryRequest,
	) -> Vec<RegionResult> {
		self.state = FanOutState::Dispatched;

		let request = Arc::new(request.clone());
		let deadline = self.deadline.map(|window| tokio::time::Instant::now() + window);
		let mut units = Vec::with_capacity(targets.len());

		for target in targets {
			let executor = self.executor.clone();
			let request = request.clone();
			let endpoint = target.endpoint.clone();
			let started = Instant::now();
			let unit = tokio::spawn(async move {
				let FanOutTarget { endpoint, token } = target;
				let call = executor.execute(&endpoint, &token, &request);

				match deadline {
					Some(at) => match tokio::time::timeout_at(at, call).await {
						Ok(result) => result,
						Err(_) => RegionResult::failure(
							&endpoint,
							RegionErrorKind::Timeout,
							"fan-out deadline elapsed",
							started.elapsed(),
						),
					},
					None => call.await,
				}
			});

			units.push((endpoint, started, unit));
		}

		let mut results = Vec::with_capacity(units.len());

		for (endpoint, started, unit) in units {
			let result = match unit.await {
				Ok(result) => result,
				Err(e) => RegionResult::failure(
					&endpoint,
					RegionErrorKind::Panicked,
					describe_join_error(e),
					started.elapsed(),
				),
			};

			obs::record_region_outcome(&result.region, result.label());
			obs::trace_region_result(&result.region, result.label(), result.elapsed);
			results.push(result);
		}

		self.state = FanOutState::Collected;

		results
	}
}
impl Debug for FanOutCoordinator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("FanOutCoordinator")
			.field("deadline", &self.deadline)
			.field("state", &self.state)
			.finish()
	}
}

fn describe_join_error(e: JoinError) -> String {
	if !e.is_panic() {
		return "region task was cancelled".into();
	}

	let payload = e.into_panic();

	if let Some(message) = payload.downcast_ref::<&str>() {
		format!("region task panicked: {message}")
	} else if let Some(message) = payload.downcast_ref::<String>() {
		format!("region task panicked: {message}")
	} else {
		"region task panicked".into()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{_preludet, obs::QueryKind, query::ExecuteFuture};

	struct Scripted;
	impl RegionQueryExecutor for Scripted {
		fn execute<'a>(
			&'a self,
			endpoint: &'a RegionEndpoint,
			token: &'a TokenSecret,
			_: &'a QueryRequest,
		) -> ExecuteFuture<'a> {
			Box::pin(async move {
				match endpoint.id.as_ref() {
					"boom" => panic!("scripted failure"),
					"slow" => {
						tokio::time::sleep(StdDuration::from_millis(200)).await;

						RegionResult::success(endpoint, Value::from("slow"), StdDuration::ZERO)
					},
					_ => RegionResult::success(
						endpoint,
						Value::from(token.expose().to_owned()),
						StdDuration::ZERO,
					),
				}
			})
		}
	}

	fn target(id: &str) -> FanOutTarget {
		FanOutTarget::new(
			_preludet::test_endpoint(id, "http://127.0.0.1:9/"),
			TokenSecret::new(format!("token-{id}")),
		)
	}

	fn request() -> QueryRequest {
		QueryRequest::get(QueryKind::Custom, "k", "/q")
	}

	#[tokio::test]
	async fn panicking_unit_is_isolated() {
		let mut coordinator = FanOutCoordinator::new(Arc::new(Scripted));

		assert_eq!(coordinator.state(), FanOutState::Idle);

		let results =
			coordinator.dispatch(vec![target("boom"), target("us")], &request()).await;

		assert_eq!(coordinator.state(), FanOutState::Collected);
		assert_eq!(results.len(), 2);
		assert_eq!(results[0].region.as_ref(), "boom");

		let error = results[0].error().expect("Panicking unit should yield an error.");

		assert_eq!(error.kind, RegionErrorKind::Panicked);
		assert!(error.message.contains("scripted failure"));
		assert_eq!(results[1].payload(), Some(&Value::from("token-us")));
	}

	#[tokio::test]
	async fn deadline_turns_slow_units_into_timeouts() {
		let mut coordinator =
			FanOutCoordinator::new(Arc::new(Scripted)).with_deadline(StdDuration::from_millis(50));
		let results =
			coordinator.dispatch(vec![target("slow"), target("cn")], &request()).await;

		assert_eq!(results.len(), 2);
		assert_eq!(results[0].error().map(|e| e.kind), Some(RegionErrorKind::Timeout));
		assert!(results[1].is_usable());
	}

	#[tokio::test]
	async fn empty_target_list_collects_nothing() {
		let mut coordinator = FanOutCoordinator::new(Arc::new(Scripted));
		let results = coordinator.dispatch(Vec::new(), &request()).await;

		assert!(results.is_empty());
		assert_eq!(coordinator.state(), FanOutState::Collected);
	}
}
