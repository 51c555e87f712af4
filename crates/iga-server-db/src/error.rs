// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, thiserror::Error)]
pub enum DbError {
	#[error("Database error: {0}")]
	Sqlx(#[from] sqlx::Error),

	/// The store refused a write that would break referential integrity,
	/// e.g. assigning a role that is not in the catalog.
	#[error("{0}")]
	Constraint(String),

	#[error("Internal: {0}")]
	Internal(String),
}

impl DbError {
	/// Whether the store could not be reached at all, as opposed to a
	/// reachable store rejecting a query.
	pub fn is_connection_error(&self) -> bool {
		match self {
			DbError::Sqlx(e) => matches!(
				e,
				sqlx::Error::PoolTimedOut
					| sqlx::Error::PoolClosed
					| sqlx::Error::Io(_)
					| sqlx::Error::Tls(_)
					| sqlx::Error::Configuration(_)
					| sqlx::Error::WorkerCrashed
			),
			_ => false,
		}
	}
}

pub type Result<T> = std::result::Result<T, DbError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_pool_errors_are_connection_errors() {
		assert!(DbError::Sqlx(sqlx::Error::PoolTimedOut).is_connection_error());
		assert!(DbError::Sqlx(sqlx::Error::PoolClosed).is_connection_error());
	}

	#[test]
	fn test_query_errors_are_not_connection_errors() {
		assert!(!DbError::Sqlx(sqlx::Error::RowNotFound).is_connection_error());
		assert!(!DbError::Constraint("Role 'X' does not exist".to_string()).is_connection_error());
		assert!(!DbError::Internal("bad url".to_string()).is_connection_error());
	}

	#[test]
	fn test_constraint_message_passes_through() {
		let err = DbError::Constraint("Role 'GHOST' does not exist".to_string());
		assert_eq!(err.to_string(), "Role 'GHOST' does not exist");
	}
}
