// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::error::GatewayError;
use crate::AppState;

/// Pings the store; any failure surfaces as a 500.
pub(crate) async fn health_body(state: &AppState) -> Result<Value, GatewayError> {
	state.store.ping().await?;
	Ok(json!({
		"success": true,
		"status": "healthy",
		"database": "connected",
		"timestamp": Utc::now().to_rfc3339(),
	}))
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, GatewayError> {
	health_body(&state).await.map(Json)
}
