// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Single-endpoint provisioning API. The `action` query parameter selects the
//! operation; write operations take a JSON object body.

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::Method;
use axum::Json;
use iga_provisioning::{
	parse_body, require_username, Action, DeleteUserPayload, RoleAssignmentPayload,
	UpsertUserPayload,
};
use serde_json::{json, Map, Value};

use crate::error::GatewayError;
use crate::health;
use crate::AppState;

type ApiResult = Result<Json<Value>, GatewayError>;

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ApiQuery {
	pub action: Option<String>,
	pub username: Option<String>,
}

impl ApiQuery {
	/// Repeated parameters keep their first value; unknown ones are ignored.
	pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
		let mut query = ApiQuery::default();
		for (key, value) in pairs {
			let slot = match key.as_str() {
				"action" => &mut query.action,
				"username" => &mut query.username,
				_ => continue,
			};
			slot.get_or_insert(value);
		}
		query
	}
}

/// Methods whose body is decoded. Other methods see an empty object.
fn reads_body(method: &Method) -> bool {
	matches!(
		*method,
		Method::POST | Method::PUT | Method::PATCH | Method::DELETE
	)
}

/// ANY /api
#[tracing::instrument(skip_all, fields(%method, action = tracing::field::Empty))]
pub async fn handle(
	State(state): State<AppState>,
	method: Method,
	query: Result<Query<Vec<(String, String)>>, QueryRejection>,
	body: Bytes,
) -> ApiResult {
	let Query(pairs) = query.map_err(|e| GatewayError::InvalidQuery(e.body_text()))?;
	let query = ApiQuery::from_pairs(pairs);
	if let Some(action) = &query.action {
		tracing::Span::current().record("action", action.as_str());
	}

	let Some(action) = query.action.as_deref().and_then(Action::parse) else {
		tracing::debug!("unrecognized action");
		return Err(GatewayError::InvalidAction);
	};

	let body = if reads_body(&method) {
		parse_body(&body)
	} else {
		Map::new()
	};

	match action {
		Action::List => list_users(&state).await,
		Action::Get => get_user(&state, query.username.as_deref()).await,
		Action::Create | Action::Update => upsert_user(&state, action, &body).await,
		Action::Delete => delete_user(&state, query.username.as_deref(), &body).await,
		Action::AssignRole => assign_role(&state, &body).await,
		Action::RevokeRole => revoke_role(&state, &body).await,
		Action::Health => health::health_body(&state).await.map(Json),
	}
}

async fn list_users(state: &AppState) -> ApiResult {
	let users = state.store.list_users().await?;
	Ok(Json(json!({
		"success": true,
		"count": users.len(),
		"users": users,
	})))
}

async fn get_user(state: &AppState, username: Option<&str>) -> ApiResult {
	let username = require_username(username)?;
	let user = state
		.store
		.get_user(&username)
		.await?
		.ok_or(GatewayError::UserNotFound)?;
	Ok(Json(json!({ "success": true, "user": user })))
}

async fn upsert_user(state: &AppState, action: Action, body: &Map<String, Value>) -> ApiResult {
	let upsert = UpsertUserPayload::from_body(body)?.validate()?;
	let outcome = state.store.upsert_user(&upsert).await?;

	let message = match action {
		Action::Create => "User created",
		_ => "User updated",
	};
	Ok(Json(json!({
		"success": true,
		"message": message,
		"user_id": outcome.user_id,
	})))
}

async fn delete_user(
	state: &AppState,
	query_username: Option<&str>,
	body: &Map<String, Value>,
) -> ApiResult {
	let username = DeleteUserPayload::from_body(body)?.resolve(query_username)?;
	if !state.store.delete_user(&username).await? {
		return Err(GatewayError::UserNotFound);
	}
	Ok(Json(json!({ "success": true, "message": "User deleted" })))
}

async fn assign_role(state: &AppState, body: &Map<String, Value>) -> ApiResult {
	let assignment = RoleAssignmentPayload::from_body(body)?.validate()?;
	state
		.store
		.assign_role(&assignment.username, &assignment.role)
		.await?;
	Ok(Json(json!({
		"success": true,
		"message": format!("Role '{}' assigned to '{}'", assignment.role, assignment.username),
	})))
}

async fn revoke_role(state: &AppState, body: &Map<String, Value>) -> ApiResult {
	let assignment = RoleAssignmentPayload::from_body(body)?.validate()?;
	state
		.store
		.revoke_role(&assignment.username, &assignment.role)
		.await?;
	Ok(Json(json!({
		"success": true,
		"message": format!("Role '{}' revoked from '{}'", assignment.role, assignment.username),
	})))
}
