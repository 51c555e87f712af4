// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
	#[error("Field '{0}' is required")]
	MissingField(&'static str),

	#[error("Invalid request body: {0}")]
	InvalidBody(String),
}

impl From<serde_json::Error> for ValidationError {
	fn from(e: serde_json::Error) -> Self {
		ValidationError::InvalidBody(e.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_missing_field_message_names_field() {
		let err = ValidationError::MissingField("email");
		assert_eq!(err.to_string(), "Field 'email' is required");
	}

	#[test]
	fn test_invalid_body_message() {
		let err = ValidationError::InvalidBody("expected a string".to_string());
		assert!(err.to_string().starts_with("Invalid request body"));
	}
}
