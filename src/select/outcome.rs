//! Selection outcome values.

// self
use crate::{
	_prelude::*,
	error::AggregateError,
	query::{RegionError, RegionResult},
};

/// Which selection branch produced an outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
	/// An item matched the logical key.
	Exact,
	/// No exact match; the first usable non-empty result was taken.
	Fallback,
	/// Every usable result was empty.
	Empty,
	/// No usable result.
	None,
}
impl MatchType {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Exact => "exact",
			Self::Fallback => "fallback",
			Self::Empty => "empty",
			Self::None => "none",
		}
	}
}
impl Display for MatchType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// The single answer chosen from a fan-out, with every partial result retained.
///
/// `chosen_index` is set exactly when `match_type` is not [`MatchType::None`].
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionOutcome {
	/// Index of the chosen result inside `all_results`.
	pub chosen_index: Option<usize>,
	/// Matching (exact) or first (fallback) item of the chosen payload.
	pub item: Option<Value>,
	/// Selection branch.
	pub match_type: MatchType,
	/// Every result, in configuration order.
	pub all_results: Vec<RegionResult>,
	/// Every per-region error, in configuration order.
	pub errors: Vec<RegionError>,
}
impl SelectionOutcome {
	pub(crate) fn pick(
		index: usize,
		item: Option<Value>,
		match_type: MatchType,
		all_results: Vec<RegionResult>,
		errors: Vec<RegionError>,
	) -> Self {
		Self { chosen_index: Some(index), item, match_type, all_results, errors }
	}

	pub(crate) fn none(all_results: Vec<RegionResult>, errors: Vec<RegionError>) -> Self {
		Self { chosen_index: None, item: None, match_type: MatchType::None, all_results, errors }
	}

	/// Chosen result, if any.
	pub fn chosen(&self) -> Option<&RegionResult> {
		self.chosen_index.and_then(|index| self.all_results.get(index))
	}

	/// Payload of the chosen result, if any.
	pub fn payload(&self) -> Option<&Value> {
		self.chosen().and_then(RegionResult::payload)
	}

	/// Converts a [`MatchType::None`] outcome into an [`AggregateError`] for `logical_key`.
	pub fn into_result(self, logical_key: &str) -> Result<Self> {
		match self.match_type {
			MatchType::None => Err(AggregateError::new(logical_key, self.errors).into()),
			_ => Ok(self),
		}
	}
}
