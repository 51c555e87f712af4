// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::migrations::run_migrations;
use crate::user::UserRepository;

/// Roles seeded by [`create_test_repository`].
pub const TEST_ROLES: [&str; 6] = [
	"USER",
	"MANAGER",
	"AGENT_COMMERCIAL",
	"RH_MANAGER",
	"IT_ADMIN",
	"COMPTABLE",
];

/// A single-connection in-memory pool, so every query sees the same database.
pub async fn create_test_pool() -> SqlitePool {
	let options = SqliteConnectOptions::from_str("sqlite::memory:")
		.unwrap()
		.foreign_keys(true);
	SqlitePoolOptions::new()
		.max_connections(1)
		.idle_timeout(None)
		.max_lifetime(None)
		.connect_with(options)
		.await
		.unwrap()
}

/// Migrated pool with the role catalog seeded.
pub async fn create_test_repository() -> UserRepository {
	let pool = create_test_pool().await;
	run_migrations(&pool).await.unwrap();
	let repo = UserRepository::new(pool);
	let catalog: Vec<String> = TEST_ROLES.iter().map(|r| r.to_string()).collect();
	repo.ensure_roles(&catalog).await.unwrap();
	repo
}

/// Migrated, seeded repository over a SQLite file in `dir`, with a
/// multi-connection pool like the server's.
pub async fn create_file_repository(dir: &std::path::Path) -> UserRepository {
	let url = format!("sqlite:{}?mode=rwc", dir.join("directory.db").display());
	let settings = crate::pool::PoolSettings {
		max_connections: 5,
		acquire_timeout: std::time::Duration::from_secs(30),
	};
	let pool = crate::pool::create_pool(&url, &settings).await.unwrap();
	run_migrations(&pool).await.unwrap();
	let repo = UserRepository::new(pool);
	let catalog: Vec<String> = TEST_ROLES.iter().map(|r| r.to_string()).collect();
	repo.ensure_roles(&catalog).await.unwrap();
	repo
}
