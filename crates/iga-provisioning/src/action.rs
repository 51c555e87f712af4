// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::fmt;

use serde::{Deserialize, Serialize};

/// Operation selected by the `action` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
	List,
	Get,
	Create,
	Update,
	Delete,
	AssignRole,
	RevokeRole,
	Health,
}

impl Action {
	/// Every recognized action, in the order advertised to callers.
	pub const ALL: [Action; 8] = [
		Action::List,
		Action::Get,
		Action::Create,
		Action::Update,
		Action::Delete,
		Action::AssignRole,
		Action::RevokeRole,
		Action::Health,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			Action::List => "list",
			Action::Get => "get",
			Action::Create => "create",
			Action::Update => "update",
			Action::Delete => "delete",
			Action::AssignRole => "assign_role",
			Action::RevokeRole => "revoke_role",
			Action::Health => "health",
		}
	}

	/// Matching is exact: action names are case-sensitive.
	pub fn parse(s: &str) -> Option<Action> {
		Action::ALL.into_iter().find(|a| a.as_str() == s)
	}

	pub fn names() -> Vec<&'static str> {
		Action::ALL.iter().map(Action::as_str).collect()
	}
}

impl fmt::Display for Action {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_parse_known_actions() {
		assert_eq!(Action::parse("list"), Some(Action::List));
		assert_eq!(Action::parse("assign_role"), Some(Action::AssignRole));
		assert_eq!(Action::parse("revoke_role"), Some(Action::RevokeRole));
		assert_eq!(Action::parse("health"), Some(Action::Health));
	}

	#[test]
	fn test_parse_rejects_unknown_and_case_variants() {
		assert_eq!(Action::parse(""), None);
		assert_eq!(Action::parse("LIST"), None);
		assert_eq!(Action::parse("assign-role"), None);
		assert_eq!(Action::parse("purge"), None);
	}

	#[test]
	fn test_names_order() {
		assert_eq!(
			Action::names(),
			vec![
				"list",
				"get",
				"create",
				"update",
				"delete",
				"assign_role",
				"revoke_role",
				"health"
			]
		);
	}

	#[test]
	fn test_as_str_roundtrips_through_parse() {
		for action in Action::ALL {
			assert_eq!(Action::parse(action.as_str()), Some(action));
		}
	}

	#[test]
	fn test_serde_uses_snake_case() {
		let json = serde_json::to_string(&Action::AssignRole).unwrap();
		assert_eq!(json, "\"assign_role\"");
	}
}
