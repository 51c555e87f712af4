// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Provisioning request types for the intranet identity gateway.
//!
//! An identity-governance tool drives the gateway through a single endpoint
//! whose operation is chosen by an `action` query parameter. This crate owns
//! everything between the raw request and the store:
//!
//! - [`Action`]: the operation discriminator
//! - [`UpsertUserPayload`], [`RoleAssignmentPayload`], [`DeleteUserPayload`]:
//!   one explicit payload per write operation, validated into
//!   [`UserUpsert`] / [`RoleAssignment`]
//! - [`coerce`]: truthiness coercion for `enabled` and role-list normalization

pub mod action;
pub mod coerce;
pub mod error;
pub mod payload;

pub use action::Action;
pub use coerce::{normalize_roles, truthy};
pub use error::ValidationError;
pub use payload::{
	parse_body, require_username, DeleteUserPayload, RoleAssignment, RoleAssignmentPayload,
	UpsertUserPayload, UserUpsert,
};
