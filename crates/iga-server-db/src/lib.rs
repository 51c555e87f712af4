// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite-backed user store for the provisioning gateway.

pub mod error;
pub mod migrations;
pub mod pool;
pub mod types;
pub mod user;

#[cfg(test)]
pub mod testing;

pub use error::{DbError, Result};
pub use migrations::run_migrations;
pub use pool::{create_pool, PoolSettings};
pub use types::{full_name, DashboardStats, DepartmentCount, UpsertOutcome, UserRecord};
pub use user::{UserRepository, UserStore};
