// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request payloads, one per write operation.
//!
//! Payloads deserialize leniently (every field optional) so that a missing
//! field surfaces as a [`ValidationError::MissingField`] naming it, rather
//! than as an opaque decoder error.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::coerce::{deserialize_enabled, deserialize_roles};
use crate::error::ValidationError;

/// Decode a request body into a JSON object.
///
/// Empty bodies, malformed JSON and non-object values all decode to an empty
/// object.
pub fn parse_body(bytes: &[u8]) -> Map<String, Value> {
	match serde_json::from_slice::<Value>(bytes) {
		Ok(Value::Object(map)) => map,
		_ => Map::new(),
	}
}

fn from_body<T: DeserializeOwned>(body: &Map<String, Value>) -> Result<T, ValidationError> {
	Ok(serde_json::from_value(Value::Object(body.clone()))?)
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
	match value {
		Some(v) if !v.trim().is_empty() => Ok(v),
		_ => Err(ValidationError::MissingField(field)),
	}
}

/// Validate a username taken from the query string.
pub fn require_username(value: Option<&str>) -> Result<String, ValidationError> {
	required(value.map(str::to_string), "username")
}

/// Body of `create` and `update`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpsertUserPayload {
	pub username: Option<String>,
	pub email: Option<String>,
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	pub department: Option<String>,
	pub title: Option<String>,
	pub employee_number: Option<String>,
	#[serde(default, deserialize_with = "deserialize_enabled")]
	pub enabled: Option<bool>,
	#[serde(default, deserialize_with = "deserialize_roles")]
	pub roles: Option<Vec<String>>,
}

impl UpsertUserPayload {
	pub fn from_body(body: &Map<String, Value>) -> Result<Self, ValidationError> {
		from_body(body)
	}

	/// Required fields are checked in order: `username`, then `email`.
	pub fn validate(self) -> Result<UserUpsert, ValidationError> {
		let username = required(self.username, "username")?;
		let email = required(self.email, "email")?;

		Ok(UserUpsert {
			username,
			email,
			first_name: self.first_name,
			last_name: self.last_name,
			department: self.department,
			title: self.title,
			employee_number: self.employee_number,
			enabled: self.enabled,
			roles: self.roles,
		})
	}
}

/// A validated upsert, keyed by `username`.
///
/// `enabled: None` means "true for a new user, unchanged for an existing one".
/// `roles: None` leaves assignments alone; `Some(vec![])` clears them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserUpsert {
	pub username: String,
	pub email: String,
	pub first_name: Option<String>,
	pub last_name: Option<String>,
	pub department: Option<String>,
	pub title: Option<String>,
	pub employee_number: Option<String>,
	pub enabled: Option<bool>,
	pub roles: Option<Vec<String>>,
}

impl UserUpsert {
	pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
		Self {
			username: username.into(),
			email: email.into(),
			first_name: None,
			last_name: None,
			department: None,
			title: None,
			employee_number: None,
			enabled: None,
			roles: None,
		}
	}

	pub fn replaces_roles(&self) -> bool {
		self.roles.is_some()
	}
}

/// Body of `assign_role` and `revoke_role`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleAssignmentPayload {
	pub username: Option<String>,
	pub role: Option<String>,
}

impl RoleAssignmentPayload {
	pub fn from_body(body: &Map<String, Value>) -> Result<Self, ValidationError> {
		from_body(body)
	}

	pub fn validate(self) -> Result<RoleAssignment, ValidationError> {
		let username = required(self.username, "username")?;
		let role = required(self.role, "role")?;
		Ok(RoleAssignment {
			username,
			role: role.trim().to_string(),
		})
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleAssignment {
	pub username: String,
	pub role: String,
}

/// Body of `delete`; the query string is consulted first.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DeleteUserPayload {
	pub username: Option<String>,
}

impl DeleteUserPayload {
	pub fn from_body(body: &Map<String, Value>) -> Result<Self, ValidationError> {
		from_body(body)
	}

	pub fn resolve(self, query_username: Option<&str>) -> Result<String, ValidationError> {
		let from_query = query_username
			.filter(|u| !u.trim().is_empty())
			.map(str::to_string);
		required(from_query.or(self.username), "username")
	}
}
