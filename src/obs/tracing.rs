// self
use crate::{_prelude::*, obs::QueryKind, region::RegionId};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedQuery<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedQuery<F> = F;

/// A span builder used by token refreshes and fan-out queries.
#[derive(Clone, Debug)]
pub struct QuerySpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl QuerySpan {
	/// Creates a new span tagged with the provided query kind + stage.
	pub fn new(kind: QueryKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("region_fanout.query", kind = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedQuery<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a debug event describing one region's result.
pub fn trace_region_result(region: &RegionId, outcome: &'static str, elapsed: std::time::Duration) {
	#[cfg(feature = "tracing")]
	{
		let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

		tracing::debug!(region = %region, outcome, elapsed_ms, "region query finished");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (region, outcome, elapsed);
	}
}

/// Emits a debug event describing a token cache decision (`hit`, `refresh`, `failure`).
pub fn trace_token_event(region: &RegionId, event: &'static str) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(region = %region, event, "token cache");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (region, event);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = QuerySpan::new(QueryKind::Service, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}

	#[test]
	fn events_accept_any_region() {
		let region = RegionId::new("i18n").expect("Region fixture should be valid.");

		trace_region_result(&region, "empty", std::time::Duration::from_millis(3));
		trace_token_event(&region, "hit");
	}
}
