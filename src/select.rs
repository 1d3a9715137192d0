//! Deterministic selection of one authoritative answer from ordered region results.
//!
//! Results are scanned in configuration order, never completion order:
//!
//! 1. **exact**: the first usable result containing an item that satisfies the [`MatchRule`];
//! 2. **fallback**: otherwise the first usable result with at least one item, carrying that
//!    item;
//! 3. **empty**: every usable result is well-formed but empty; the first usable result is
//!    chosen and no error is raised;
//! 4. **none**: no usable result; every error is retained and
//!    [`SelectionOutcome::into_result`] raises an
//!    [`AggregateError`](crate::error::AggregateError).

pub mod outcome;
pub mod rule;

pub use outcome::*;
pub use rule::*;

// self
use crate::{_prelude::*, query::RegionResult};

/// Applies a [`MatchRule`] over ordered results.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultSelector {
	rule: MatchRule,
}
impl ResultSelector {
	/// Creates a selector for `rule`.
	pub fn new(rule: MatchRule) -> Self {
		Self { rule }
	}

	/// Rule in effect.
	pub fn rule(&self) -> &MatchRule {
		&self.rule
	}

	/// Selects from `results`, which must be in configuration order.
	///
	/// Empty input yields [`MatchType::None`] with no collected errors; callers that need an
	/// error get one from [`SelectionOutcome::into_result`], which reports that no region was
	/// queried.
	pub fn select(&self, results: Vec<RegionResult>, logical_key: &str) -> SelectionOutcome {
		let errors = results.iter().filter_map(|result| result.error().cloned()).collect();
		let mut exact = None;
		let mut fallback = None;
		let mut first_usable = None;

		for (index, result) in results.iter().enumerate() {
			let Some(payload) = result.payload() else { continue };
			let items = self.rule.items(payload);

			if let Some(item) = items.iter().find(|item| self.rule.matches(item, logical_key)) {
				exact = Some((index, (*item).clone()));

				break;
			}

			first_usable.get_or_insert(index);

			if fallback.is_none() {
				fallback = items.first().map(|item| (index, (*item).clone()));
			}
		}

		match (exact, fallback, first_usable) {
			(Some((index, item)), _, _) =>
				SelectionOutcome::pick(index, Some(item), MatchType::Exact, results, errors),
			(None, Some((index, item)), _) =>
				SelectionOutcome::pick(index, Some(item), MatchType::Fallback, results, errors),
			(None, None, Some(index)) =>
				SelectionOutcome::pick(index, None, MatchType::Empty, results, errors),
			(None, None, None) => SelectionOutcome::none(results, errors),
		}
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::time::Duration as StdDuration;
	// crates.io
	use serde_json::json;
	// self
	use super::*;
	use crate::{_preludet, error::Error, query::RegionErrorKind};

	fn ok(id: &str, payload: Value) -> RegionResult {
		RegionResult::success(
			&_preludet::test_endpoint(id, "http://127.0.0.1:9/"),
			payload,
			StdDuration::ZERO,
		)
	}

	fn err(id: &str, kind: RegionErrorKind, message: &str) -> RegionResult {
		RegionResult::failure(
			&_preludet::test_endpoint(id, "http://127.0.0.1:9/"),
			kind,
			message,
			StdDuration::ZERO,
		)
	}

	fn by_key() -> ResultSelector {
		ResultSelector::new(MatchRule::key_field("key"))
	}

	#[test]
	fn exact_match_follows_configuration_order() {
		let outcome = by_key().select(
			vec![
				ok("cn", json!([{ "key": "other" }])),
				ok("i18n", json!([{ "key": "x", "from": "i18n" }])),
				ok("us", json!([{ "key": "x", "from": "us" }])),
			],
			"x",
		);

		assert_eq!(outcome.match_type, MatchType::Exact);
		assert_eq!(outcome.chosen().map(|r| r.region.as_ref()), Some("i18n"));
		assert_eq!(outcome.item, Some(json!({ "key": "x", "from": "i18n" })));
	}

	#[test]
	fn fallback_prefers_first_configured_non_empty_result() {
		let outcome = by_key().select(
			vec![ok("a", json!([{ "key": "y" }])), ok("b", json!([]))],
			"x",
		);

		assert_eq!(outcome.match_type, MatchType::Fallback);
		assert_eq!(outcome.chosen().map(|r| r.region.as_ref()), Some("a"));
		assert_eq!(outcome.item, Some(json!({ "key": "y" })));
	}

	#[test]
	fn fallback_skips_empty_and_errored_results() {
		let outcome = by_key().select(
			vec![
				err("cn", RegionErrorKind::Http, "HTTP 500"),
				ok("i18n", json!([])),
				ok("us", json!([{ "key": "z" }])),
			],
			"x",
		);

		assert_eq!(outcome.match_type, MatchType::Fallback);
		assert_eq!(outcome.chosen_index, Some(2));
		assert_eq!(outcome.errors.len(), 1);
	}

	#[test]
	fn all_empty_is_not_an_error() {
		let outcome = by_key().select(
			vec![
				ok("cn", json!([])),
				err("i18n", RegionErrorKind::Timeout, "request timed out"),
				ok("us", Value::Null),
			],
			"x",
		);

		assert_eq!(outcome.match_type, MatchType::Empty);
		assert_eq!(outcome.chosen().map(|r| r.region.as_ref()), Some("cn"));
		assert!(outcome.item.is_none());
		assert!(outcome.into_result("x").is_ok());
	}

	#[test]
	fn all_errors_aggregate_in_order() {
		let outcome = by_key().select(
			vec![
				err("cn", RegionErrorKind::Business, "error code 7"),
				err("us", RegionErrorKind::Protocol, "not an envelope"),
			],
			"x",
		);

		assert_eq!(outcome.match_type, MatchType::None);
		assert!(outcome.chosen().is_none());
		assert_eq!(outcome.all_results.len(), 2);

		let Err(Error::Aggregate(aggregate)) = outcome.into_result("x") else {
			panic!("Expected an aggregate error.");
		};

		assert_eq!(aggregate.errors().len(), 2);
		assert_eq!(aggregate.first().map(|e| e.region.as_ref()), Some("cn"));
	}

	#[test]
	fn non_empty_rule_picks_first_region_with_items() {
		let selector = ResultSelector::new(MatchRule::non_empty().with_items("/items"));
		let outcome = selector.select(
			vec![
				ok("cn", json!({ "items": [] })),
				ok("i18n", json!({ "items": [{ "msg": "a" }, { "msg": "b" }] })),
				ok("us", json!({ "items": [{ "msg": "c" }] })),
			],
			"log-1",
		);

		assert_eq!(outcome.match_type, MatchType::Exact);
		assert_eq!(outcome.chosen().map(|r| r.region.as_ref()), Some("i18n"));
		assert_eq!(outcome.item, Some(json!({ "msg": "a" })));
	}

	#[test]
	fn no_results_raise_aggregate() {
		let outcome = by_key().select(Vec::new(), "x");

		assert_eq!(outcome.match_type, MatchType::None);
		assert!(outcome.errors.is_empty());

		let err = outcome.into_result("x").expect_err("Empty input should not select anything.");

		assert!(err.to_string().contains("no region was queried"));
	}
}
