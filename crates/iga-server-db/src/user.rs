// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User repository: directory users, their role assignments and the role
//! catalog.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use iga_provisioning::UserUpsert;
use sqlx::sqlite::{Sqlite, SqliteConnection, SqlitePool};
use sqlx::QueryBuilder;

use crate::error::{DbError, Result};
use crate::types::{DashboardStats, DepartmentCount, UpsertOutcome, UserRecord, UserRow};

const DASHBOARD_USER_LIMIT: i64 = 50;

const USER_COLUMNS: &str = "id, username, email, first_name, last_name, department, title, \
	employee_number, enabled, created_at, updated_at";

#[async_trait]
pub trait UserStore: Send + Sync {
	async fn ping(&self) -> Result<()>;
	async fn list_users(&self) -> Result<Vec<UserRecord>>;
	async fn get_user(&self, username: &str) -> Result<Option<UserRecord>>;
	async fn upsert_user(&self, upsert: &UserUpsert) -> Result<UpsertOutcome>;
	async fn delete_user(&self, username: &str) -> Result<bool>;
	async fn assign_role(&self, username: &str, role: &str) -> Result<bool>;
	async fn revoke_role(&self, username: &str, role: &str) -> Result<bool>;
	async fn ensure_roles(&self, catalog: &[String]) -> Result<u64>;
	async fn dashboard_stats(&self) -> Result<DashboardStats>;
}

#[derive(Clone)]
pub struct UserRepository {
	pool: SqlitePool,
}

impl UserRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self))]
	pub async fn ping(&self) -> Result<()> {
		sqlx::query("SELECT 1").execute(&self.pool).await?;
		Ok(())
	}

	/// All users ordered by username.
	#[tracing::instrument(skip(self))]
	pub async fn list_users(&self) -> Result<Vec<UserRecord>> {
		let mut tx = self.pool.begin().await?;
		let rows: Vec<UserRow> =
			sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM app_users ORDER BY username"))
				.fetch_all(&mut *tx)
				.await?;
		let mut roles = load_roles(&mut *tx, None).await?;
		tx.commit().await?;
		Ok(with_roles(rows, &mut roles))
	}

	#[tracing::instrument(skip(self))]
	pub async fn get_user(&self, username: &str) -> Result<Option<UserRecord>> {
		let mut tx = self.pool.begin().await?;
		let row: Option<UserRow> =
			sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM app_users WHERE username = ?1"))
				.bind(username)
				.fetch_optional(&mut *tx)
				.await?;

		let Some(row) = row else {
			return Ok(None);
		};

		let mut roles = load_roles(&mut *tx, Some(&[row.id][..])).await?;
		tx.commit().await?;
		let roles = roles.remove(&row.id).unwrap_or_default();
		Ok(Some(row.into_record(roles)))
	}

	/// Insert or update a user keyed by username.
	///
	/// When `upsert.roles` is present the role set is replaced in the same
	/// transaction, so an unknown role leaves the user untouched. The first
	/// statement is the write, so the transaction never has to upgrade a read
	/// lock.
	#[tracing::instrument(skip(self, upsert), fields(username = %upsert.username))]
	pub async fn upsert_user(&self, upsert: &UserUpsert) -> Result<UpsertOutcome> {
		let now = Utc::now().to_rfc3339();
		let mut tx = self.pool.begin().await?;

		let (user_id, created): (i64, bool) = sqlx::query_as(
			r#"
			INSERT INTO app_users (
				username, email, first_name, last_name, department, title,
				employee_number, enabled, created_at, updated_at
			)
			VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, COALESCE(?8, 1), ?9, ?9)
			ON CONFLICT(username) DO UPDATE SET
				email = excluded.email,
				first_name = excluded.first_name,
				last_name = excluded.last_name,
				department = excluded.department,
				title = excluded.title,
				employee_number = excluded.employee_number,
				enabled = COALESCE(?8, app_users.enabled),
				updated_at = excluded.updated_at
			RETURNING id, created_at = ?9 AS created
			"#,
		)
		.bind(&upsert.username)
		.bind(&upsert.email)
		.bind(upsert.first_name.as_deref())
		.bind(upsert.last_name.as_deref())
		.bind(upsert.department.as_deref())
		.bind(upsert.title.as_deref())
		.bind(upsert.employee_number.as_deref())
		.bind(upsert.enabled)
		.bind(&now)
		.fetch_one(&mut *tx)
		.await?;

		if let Some(roles) = &upsert.roles {
			sqlx::query("DELETE FROM user_roles WHERE user_id = ?1")
				.bind(user_id)
				.execute(&mut *tx)
				.await?;

			for role in roles {
				insert_assignment(&mut *tx, user_id, role, &now).await?;
			}
		}

		tx.commit().await?;

		tracing::info!(user_id, created, roles_replaced = upsert.replaces_roles(), "upserted user");
		Ok(UpsertOutcome { user_id, created })
	}

	/// Returns `false` when no user had this username.
	#[tracing::instrument(skip(self))]
	pub async fn delete_user(&self, username: &str) -> Result<bool> {
		let result = sqlx::query("DELETE FROM app_users WHERE username = ?1")
			.bind(username)
			.execute(&self.pool)
			.await?;

		let deleted = result.rows_affected() > 0;
		if deleted {
			tracing::info!("deleted user");
		}
		Ok(deleted)
	}

	/// Idempotent. Returns `true` if a new assignment was recorded.
	///
	/// # Errors
	/// Returns `DbError::Constraint` when the user or the role does not exist.
	#[tracing::instrument(skip(self))]
	pub async fn assign_role(&self, username: &str, role: &str) -> Result<bool> {
		let now = Utc::now().to_rfc3339();
		let mut tx = self.pool.begin().await?;

		let result = sqlx::query(
			r#"
			INSERT OR IGNORE INTO user_roles (user_id, role_id, assigned_at)
			SELECT u.id, r.id, ?3
			FROM app_users u
			JOIN app_roles r ON r.name = ?2
			WHERE u.username = ?1
			"#,
		)
		.bind(username)
		.bind(role)
		.bind(&now)
		.execute(&mut *tx)
		.await?;

		let inserted = result.rows_affected() > 0;
		if !inserted {
			let user_id: Option<i64> =
				sqlx::query_scalar("SELECT id FROM app_users WHERE username = ?1")
					.bind(username)
					.fetch_optional(&mut *tx)
					.await?;
			if user_id.is_none() {
				return Err(DbError::Constraint(format!("User '{username}' does not exist")));
			}
			lookup_role_id(&mut *tx, role).await?;
		}

		tx.commit().await?;

		if inserted {
			tracing::info!("assigned role");
		}
		Ok(inserted)
	}

	/// Revoking a role that is not assigned is a no-op returning `false`.
	#[tracing::instrument(skip(self))]
	pub async fn revoke_role(&self, username: &str, role: &str) -> Result<bool> {
		let result = sqlx::query(
			r#"
			DELETE FROM user_roles
			WHERE user_id = (SELECT id FROM app_users WHERE username = ?1)
			  AND role_id = (SELECT id FROM app_roles WHERE name = ?2)
			"#,
		)
		.bind(username)
		.bind(role)
		.execute(&self.pool)
		.await?;

		let revoked = result.rows_affected() > 0;
		if revoked {
			tracing::info!("revoked role");
		}
		Ok(revoked)
	}

	/// Seed the role catalog. Existing roles are left alone; returns how many
	/// were added.
	#[tracing::instrument(skip(self, catalog), fields(count = catalog.len()))]
	pub async fn ensure_roles(&self, catalog: &[String]) -> Result<u64> {
		let now = Utc::now().to_rfc3339();
		let mut tx = self.pool.begin().await?;
		let mut added = 0;

		for name in catalog {
			let result = sqlx::query("INSERT OR IGNORE INTO app_roles (name, created_at) VALUES (?1, ?2)")
				.bind(name)
				.bind(&now)
				.execute(&mut *tx)
				.await?;
			added += result.rows_affected();
		}

		tx.commit().await?;
		tracing::debug!(added, "role catalog seeded");
		Ok(added)
	}

	/// Every figure is read inside one transaction, so they agree with each
	/// other.
	#[tracing::instrument(skip(self))]
	pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
		let mut tx = self.pool.begin().await?;

		let total_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM app_users")
			.fetch_one(&mut *tx)
			.await?;

		let active_users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM app_users WHERE enabled = 1")
			.fetch_one(&mut *tx)
			.await?;

		let total_roles: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM app_roles")
			.fetch_one(&mut *tx)
			.await?;

		let by_department: Vec<DepartmentCount> = sqlx::query_as(
			r#"
			SELECT department, COUNT(*) AS count
			FROM app_users
			GROUP BY department
			ORDER BY count DESC, department
			"#,
		)
		.fetch_all(&mut *tx)
		.await?;

		let rows: Vec<UserRow> = sqlx::query_as(&format!(
			r#"
			SELECT {USER_COLUMNS}
			FROM app_users
			ORDER BY COALESCE(
				NULLIF(TRIM(COALESCE(first_name, '') || ' ' || COALESCE(last_name, '')), ''),
				username
			) COLLATE NOCASE, username
			LIMIT ?1
			"#
		))
		.bind(DASHBOARD_USER_LIMIT)
		.fetch_all(&mut *tx)
		.await?;

		let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
		let mut roles = load_roles(&mut *tx, Some(ids.as_slice())).await?;
		tx.commit().await?;

		Ok(DashboardStats {
			total_users,
			active_users,
			total_roles,
			by_department,
			users: with_roles(rows, &mut roles),
		})
	}
}

/// Role names per user id, in assignment order. `None` loads every user.
async fn load_roles(
	conn: &mut SqliteConnection,
	user_ids: Option<&[i64]>,
) -> Result<HashMap<i64, Vec<String>>> {
	let mut query = QueryBuilder::<Sqlite>::new(
		"SELECT ur.user_id, r.name FROM user_roles ur JOIN app_roles r ON r.id = ur.role_id",
	);
	if let Some(ids) = user_ids {
		if ids.is_empty() {
			return Ok(HashMap::new());
		}
		query.push(" WHERE ur.user_id IN (");
		let mut separated = query.separated(", ");
		for id in ids {
			separated.push_bind(*id);
		}
		separated.push_unseparated(")");
	}
	query.push(" ORDER BY ur.user_id, ur.id");

	let assignments: Vec<(i64, String)> = query.build_query_as().fetch_all(&mut *conn).await?;

	let mut by_user: HashMap<i64, Vec<String>> = HashMap::new();
	for (user_id, role) in assignments {
		by_user.entry(user_id).or_default().push(role);
	}
	Ok(by_user)
}

fn with_roles(rows: Vec<UserRow>, roles: &mut HashMap<i64, Vec<String>>) -> Vec<UserRecord> {
	rows.into_iter()
		.map(|row| {
			let user_roles = roles.remove(&row.id).unwrap_or_default();
			row.into_record(user_roles)
		})
		.collect()
}

async fn lookup_role_id(conn: &mut SqliteConnection, role: &str) -> Result<i64> {
	let id: Option<i64> = sqlx::query_scalar("SELECT id FROM app_roles WHERE name = ?1")
		.bind(role)
		.fetch_optional(&mut *conn)
		.await?;
	id.ok_or_else(|| DbError::Constraint(format!("Role '{role}' does not exist")))
}

/// Returns `false` when the pair was already assigned.
async fn insert_assignment(
	conn: &mut SqliteConnection,
	user_id: i64,
	role: &str,
	assigned_at: &str,
) -> Result<bool> {
	let result = sqlx::query(
		r#"
		INSERT OR IGNORE INTO user_roles (user_id, role_id, assigned_at)
		SELECT ?1, id, ?3 FROM app_roles WHERE name = ?2
		"#,
	)
	.bind(user_id)
	.bind(role)
	.bind(assigned_at)
	.execute(&mut *conn)
	.await?;

	if result.rows_affected() > 0 {
		return Ok(true);
	}
	lookup_role_id(conn, role).await?;
	Ok(false)
}

#[async_trait]
impl UserStore for UserRepository {
	async fn ping(&self) -> Result<()> {
		self.ping().await
	}

	async fn list_users(&self) -> Result<Vec<UserRecord>> {
		self.list_users().await
	}

	async fn get_user(&self, username: &str) -> Result<Option<UserRecord>> {
		self.get_user(username).await
	}

	async fn upsert_user(&self, upsert: &UserUpsert) -> Result<UpsertOutcome> {
		self.upsert_user(upsert).await
	}

	async fn delete_user(&self, username: &str) -> Result<bool> {
		self.delete_user(username).await
	}

	async fn assign_role(&self, username: &str, role: &str) -> Result<bool> {
		self.assign_role(username, role).await
	}

	async fn revoke_role(&self, username: &str, role: &str) -> Result<bool> {
		self.revoke_role(username, role).await
	}

	async fn ensure_roles(&self, catalog: &[String]) -> Result<u64> {
		self.ensure_roles(catalog).await
	}

	async fn dashboard_stats(&self) -> Result<DashboardStats> {
		self.dashboard_stats().await
	}
}
