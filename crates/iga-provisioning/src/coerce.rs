// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Lenient input coercion for fields that connectors send in several shapes.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Truthiness of an arbitrary JSON value.
///
/// Falsy: `null`, `false`, zero, `""`, `"0"`, `[]` and `{}`. Everything else
/// is truthy, so `"false"` and `"no"` are `true`.
pub fn truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(b) => *b,
		Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
		Value::String(s) => !(s.is_empty() || s == "0"),
		Value::Array(items) => !items.is_empty(),
		Value::Object(map) => !map.is_empty(),
	}
}

/// Trim role names, drop empty entries and keep the first occurrence of
/// duplicates. Order is otherwise preserved.
pub fn normalize_roles<I, S>(roles: I) -> Vec<String>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut out: Vec<String> = Vec::new();
	for role in roles {
		let role = role.as_ref().trim();
		if role.is_empty() || out.iter().any(|r| r == role) {
			continue;
		}
		out.push(role.to_string());
	}
	out
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RolesInput {
	List(Vec<String>),
	Csv(String),
}

/// `null` deserializes as absent; a field that is present is coerced.
pub(crate) fn deserialize_enabled<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
	D: Deserializer<'de>,
{
	let value = Option::<Value>::deserialize(deserializer)?;
	Ok(value.map(|v| truthy(&v)))
}

/// Accepts `["A", "B"]` or `"A, B"`. `null` deserializes as absent, which
/// is distinct from an empty list.
pub(crate) fn deserialize_roles<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
	D: Deserializer<'de>,
{
	let input = Option::<RolesInput>::deserialize(deserializer)?;
	Ok(input.map(|input| match input {
		RolesInput::List(items) => normalize_roles(items),
		RolesInput::Csv(csv) => normalize_roles(csv.split(',')),
	}))
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use serde_json::json;

	#[test]
	fn test_truthy_scalars() {
		assert!(!truthy(&json!(null)));
		assert!(!truthy(&json!(false)));
		assert!(truthy(&json!(true)));
		assert!(!truthy(&json!(0)));
		assert!(!truthy(&json!(0.0)));
		assert!(truthy(&json!(1)));
		assert!(truthy(&json!(-3)));
	}

	#[test]
	fn test_truthy_strings() {
		assert!(!truthy(&json!("")));
		assert!(!truthy(&json!("0")));
		assert!(truthy(&json!("1")));
		assert!(truthy(&json!("false")));
		assert!(truthy(&json!(" ")));
	}

	#[test]
	fn test_truthy_containers() {
		assert!(!truthy(&json!([])));
		assert!(truthy(&json!([0])));
		assert!(!truthy(&json!({})));
		assert!(truthy(&json!({"a": 1})));
	}

	#[test]
	fn test_normalize_trims_and_drops_empty() {
		let roles = normalize_roles(vec![" USER ", "", "  ", "MANAGER"]);
		assert_eq!(roles, vec!["USER", "MANAGER"]);
	}

	#[test]
	fn test_normalize_dedupes_keeping_first() {
		let roles = normalize_roles(vec!["MANAGER", "USER", "MANAGER "]);
		assert_eq!(roles, vec!["MANAGER", "USER"]);
	}

	#[test]
	fn test_normalize_csv_split() {
		let roles = normalize_roles("USER, IT_ADMIN,,RH_MANAGER ,".split(','));
		assert_eq!(roles, vec!["USER", "IT_ADMIN", "RH_MANAGER"]);
	}

	proptest! {
		#[test]
		fn normalized_roles_are_trimmed_nonempty_and_unique(
			raw in prop::collection::vec("[ A-Z_]{0,8}", 0..12)
		) {
			let roles = normalize_roles(&raw);
			for (i, role) in roles.iter().enumerate() {
				prop_assert!(!role.is_empty());
				prop_assert_eq!(role.trim(), role.as_str());
				prop_assert!(!roles[..i].contains(role));
			}
		}

		#[test]
		fn normalizing_twice_is_stable(raw in prop::collection::vec("[ A-Z_,]{0,10}", 0..8)) {
			let once = normalize_roles(&raw);
			let twice = normalize_roles(&once);
			prop_assert_eq!(once, twice);
		}

		#[test]
		fn csv_and_list_forms_agree(raw in prop::collection::vec("[A-Z_]{1,8}", 0..8)) {
			let from_list = normalize_roles(&raw);
			let joined = raw.join(", ");
			let from_csv = normalize_roles(joined.split(','));
			prop_assert_eq!(from_list, from_csv);
		}

		#[test]
		fn nonzero_integers_are_truthy(n in any::<i64>().prop_filter("nonzero", |n| *n != 0)) {
			prop_assert!(truthy(&json!(n)));
		}
	}
}
