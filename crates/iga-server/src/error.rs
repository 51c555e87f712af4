// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request-boundary errors and their JSON rendering.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use iga_provisioning::{Action, ValidationError};
use iga_server_db::DbError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
	#[error(transparent)]
	Validation(#[from] ValidationError),

	#[error("User not found")]
	UserNotFound,

	#[error("Database connection failed: {0}")]
	StoreConnection(String),

	#[error("Database error: {0}")]
	StoreQuery(String),

	#[error("Invalid action")]
	InvalidAction,

	#[error("Invalid query string: {0}")]
	InvalidQuery(String),
}

impl From<DbError> for GatewayError {
	fn from(e: DbError) -> Self {
		let connection = e.is_connection_error();
		let message = match e {
			DbError::Sqlx(e) => e.to_string(),
			DbError::Constraint(msg) | DbError::Internal(msg) => msg,
		};
		if connection {
			GatewayError::StoreConnection(message)
		} else {
			GatewayError::StoreQuery(message)
		}
	}
}

impl GatewayError {
	pub fn status(&self) -> StatusCode {
		match self {
			GatewayError::Validation(_) | GatewayError::InvalidAction | GatewayError::InvalidQuery(_) => {
				StatusCode::BAD_REQUEST
			}
			GatewayError::UserNotFound => StatusCode::NOT_FOUND,
			GatewayError::StoreConnection(_) | GatewayError::StoreQuery(_) => {
				StatusCode::INTERNAL_SERVER_ERROR
			}
		}
	}
}

impl IntoResponse for GatewayError {
	fn into_response(self) -> Response {
		let status = self.status();
		let body = match &self {
			GatewayError::Validation(ValidationError::MissingField(_)) => {
				json!({ "error": self.to_string() })
			}
			GatewayError::Validation(ValidationError::InvalidBody(msg)) => {
				json!({ "error": "Invalid request body", "message": msg })
			}
			GatewayError::UserNotFound => json!({ "error": "User not found" }),
			GatewayError::StoreConnection(msg) => {
				tracing::error!(error = %msg, "store unreachable");
				json!({ "error": "Database connection failed", "message": msg })
			}
			GatewayError::StoreQuery(msg) => {
				tracing::error!(error = %msg, "store query failed");
				json!({ "error": "Database error", "message": msg })
			}
			GatewayError::InvalidAction => json!({
				"error": "Invalid action",
				"available_actions": Action::names(),
			}),
			GatewayError::InvalidQuery(msg) => {
				json!({ "error": "Invalid query string", "message": msg })
			}
		};

		(status, Json(body)).into_response()
	}
}
