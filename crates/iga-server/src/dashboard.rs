// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::extract::State;
use axum::Json;
use iga_server_db::DashboardStats;

use crate::error::GatewayError;
use crate::AppState;

/// GET /dashboard - directory totals, headcount per department and the first
/// page of users by display name.
#[tracing::instrument(skip(state))]
pub async fn dashboard(State(state): State<AppState>) -> Result<Json<DashboardStats>, GatewayError> {
	let stats = state.store.dashboard_stats().await?;
	Ok(Json(stats))
}
