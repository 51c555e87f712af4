// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity provisioning gateway.
//!
//! An identity governance tool drives user and role provisioning through a
//! single JSON endpoint; a read-only dashboard summarizes the same directory.

use std::sync::Arc;

use axum::routing::{any, get};
use axum::Router;
use iga_server_db::UserStore;

pub mod api;
pub mod dashboard;
pub mod error;
pub mod health;
pub mod version;

pub use error::GatewayError;

#[derive(Clone)]
pub struct AppState {
	pub store: Arc<dyn UserStore>,
}

pub fn create_app_state(store: Arc<dyn UserStore>) -> AppState {
	AppState { store }
}

pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/api", any(api::handle))
		.route("/api.php", any(api::handle))
		.route("/dashboard", get(dashboard::dashboard))
		.route("/health", get(health::health_check))
		.with_state(state)
}
