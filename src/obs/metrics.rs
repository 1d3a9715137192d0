// self
use crate::{
	obs::{QueryKind, QueryOutcome},
	region::RegionId,
};

/// Records a logical operation outcome via the global metrics recorder (when enabled).
pub fn record_query_outcome(kind: QueryKind, outcome: QueryOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"region_fanout_query_total",
			"kind" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records one region's result label (`success`, `empty`, or an error kind).
pub fn record_region_outcome(region: &RegionId, outcome: &'static str) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"region_fanout_region_total",
			"region" => region.to_string(),
			"outcome" => outcome
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (region, outcome);
	}
}
