//! Item extraction and matching rules.

// self
use crate::_prelude::*;

/// How items are found inside a payload and which item counts as an exact match.
///
/// `items` is an optional JSON pointer (for example `/items`) locating the item collection
/// inside the payload; without it the payload itself is the collection. An array yields its
/// elements, `null` or an empty object yields nothing, and any other value is a single item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "rule")]
pub enum MatchRule {
	/// An item matches when its `field` equals the logical key.
	KeyField {
		/// Identity field compared against the logical key.
		field: String,
		/// Pointer to the item collection.
		#[serde(default)]
		items: Option<String>,
	},
	/// Any item matches; used for lookups where "found at all" is the answer.
	NonEmpty {
		/// Pointer to the item collection.
		#[serde(default)]
		items: Option<String>,
	},
}
impl MatchRule {
	/// Exact match on `field`.
	pub fn key_field(field: impl Into<String>) -> Self {
		Self::KeyField { field: field.into(), items: None }
	}

	/// Match on presence of any item.
	pub fn non_empty() -> Self {
		Self::NonEmpty { items: None }
	}

	/// Locates the item collection at `pointer`.
	pub fn with_items(self, pointer: impl Into<String>) -> Self {
		let pointer = Some(pointer.into());

		match self {
			Self::KeyField { field, .. } => Self::KeyField { field, items: pointer },
			Self::NonEmpty { .. } => Self::NonEmpty { items: pointer },
		}
	}

	/// Items contained in `payload`, in payload order.
	pub fn items<'a>(&self, payload: &'a Value) -> Vec<&'a Value> {
		let pointer = match self {
			Self::KeyField { items, .. } | Self::NonEmpty { items } => items.as_deref(),
		};
		let collection = match pointer {
			Some(pointer) => match payload.pointer(pointer) {
				Some(collection) => collection,
				None => return Vec::new(),
			},
			None => payload,
		};

		match collection {
			Value::Null => Vec::new(),
			Value::Array(items) => items.iter().collect(),
			Value::Object(fields) if fields.is_empty() => Vec::new(),
			Value::String(s) if s.is_empty() => Vec::new(),
			other => vec![other],
		}
	}

	/// Whether `item` is an exact match for `logical_key`.
	pub fn matches(&self, item: &Value, logical_key: &str) -> bool {
		match self {
			Self::NonEmpty { .. } => true,
			Self::KeyField { field, .. } => match item.get(field) {
				Some(Value::String(value)) => value == logical_key,
				Some(value @ (Value::Number(_) | Value::Bool(_))) => value.to_string() == logical_key,
				_ => false,
			},
		}
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use serde_json::json;
	// self
	use super::*;

	#[test]
	fn item_extraction_shapes() {
		let rule = MatchRule::key_field("psm");

		assert_eq!(rule.items(&json!([1, 2])).len(), 2);
		assert!(rule.items(&Value::Null).is_empty());
		assert!(rule.items(&json!({})).is_empty());
		assert_eq!(rule.items(&json!({ "psm": "a.b.c" })).len(), 1);
		assert!(rule.clone().with_items("/missing").items(&json!({ "items": [1] })).is_empty());
	}

	#[test]
	fn key_field_compares_scalars() {
		let rule = MatchRule::key_field("id");

		assert!(rule.matches(&json!({ "id": "x" }), "x"));
		assert!(rule.matches(&json!({ "id": 42 }), "42"));
		assert!(!rule.matches(&json!({ "id": "X" }), "x"));
		assert!(!rule.matches(&json!({ "name": "x" }), "x"));
	}

	#[test]
	fn rule_loads_from_config() {
		let rule: MatchRule = serde_json::from_value(json!({ "rule": "non_empty", "items": "/items" }))
			.expect("Rule configuration should deserialize.");

		assert_eq!(rule, MatchRule::non_empty().with_items("/items"));
	}
}
