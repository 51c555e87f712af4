// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::Serialize;
use sqlx::FromRow;

/// A directory user joined with its role names in assignment order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecord {
	pub id: i64,
	pub username: String,
	pub email: String,
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	pub full_name: Option<String>,
	pub department: Option<String>,
	pub title: Option<String>,
	pub employee_number: Option<String>,
	pub enabled: bool,
	pub roles: Vec<String>,
	pub created_at: String,
	pub updated_at: String,
}

#[derive(Debug, Clone, FromRow)]
pub(crate) struct UserRow {
	pub id: i64,
	pub username: String,
	pub email: String,
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	pub department: Option<String>,
	pub title: Option<String>,
	pub employee_number: Option<String>,
	pub enabled: bool,
	pub created_at: String,
	pub updated_at: String,
}

impl UserRow {
	pub(crate) fn into_record(self, roles: Vec<String>) -> UserRecord {
		let full_name = full_name(self.first_name.as_deref(), self.last_name.as_deref());
		UserRecord {
			id: self.id,
			username: self.username,
			email: self.email,
			first_name: self.first_name,
			last_name: self.last_name,
			full_name,
			department: self.department,
			title: self.title,
			employee_number: self.employee_number,
			enabled: self.enabled,
			roles,
			created_at: self.created_at,
			updated_at: self.updated_at,
		}
	}
}

/// `first_name` and `last_name` joined by a space, or `None` when both are
/// absent or blank.
pub fn full_name(first: Option<&str>, last: Option<&str>) -> Option<String> {
	let joined = [first, last]
		.into_iter()
		.flatten()
		.map(str::trim)
		.filter(|part| !part.is_empty())
		.collect::<Vec<_>>()
		.join(" ");
	(!joined.is_empty()).then_some(joined)
}

/// Result of an upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpsertOutcome {
	pub user_id: i64,
	pub created: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct DepartmentCount {
	pub department: Option<String>,
	pub count: i64,
}

/// Read-only summary served by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
	pub total_users: i64,
	pub active_users: i64,
	pub total_roles: i64,
	pub by_department: Vec<DepartmentCount>,
	pub users: Vec<UserRecord>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_full_name_joins_both_parts() {
		assert_eq!(full_name(Some("John"), Some("Doe")), Some("John Doe".to_string()));
	}

	#[test]
	fn test_full_name_single_part() {
		assert_eq!(full_name(Some("John"), None), Some("John".to_string()));
		assert_eq!(full_name(None, Some(" Doe ")), Some("Doe".to_string()));
	}

	#[test]
	fn test_full_name_absent() {
		assert_eq!(full_name(None, None), None);
		assert_eq!(full_name(Some(""), Some("  ")), None);
	}
}
