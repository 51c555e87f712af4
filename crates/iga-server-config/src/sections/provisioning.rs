// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Provisioning configuration: the role catalog seeded into the store.

use serde::Deserialize;

/// Roles the intranet recognizes out of the box.
pub const DEFAULT_ROLE_CATALOG: &[&str] = &[
	"USER",
	"MANAGER",
	"AGENT_COMMERCIAL",
	"RH_MANAGER",
	"IT_ADMIN",
	"COMPTABLE",
];

/// Provisioning configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct ProvisioningConfig {
	/// Role names inserted at startup if missing. Existing roles are never
	/// removed, so shrinking the list does not revoke anything.
	pub role_catalog: Vec<String>,
}

impl Default for ProvisioningConfig {
	fn default() -> Self {
		Self {
			role_catalog: default_catalog(),
		}
	}
}

fn default_catalog() -> Vec<String> {
	DEFAULT_ROLE_CATALOG.iter().map(|r| r.to_string()).collect()
}

/// Provisioning configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvisioningConfigLayer {
	#[serde(default)]
	pub role_catalog: Option<Vec<String>>,
}

impl ProvisioningConfigLayer {
	pub fn merge(&mut self, other: ProvisioningConfigLayer) {
		if other.role_catalog.is_some() {
			self.role_catalog = other.role_catalog;
		}
	}

	pub fn finalize(self) -> ProvisioningConfig {
		ProvisioningConfig {
			role_catalog: self.role_catalog.unwrap_or_else(default_catalog),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_catalog() {
		let config = ProvisioningConfigLayer::default().finalize();
		assert_eq!(config.role_catalog.len(), 6);
		assert_eq!(config.role_catalog[0], "USER");
		assert!(config.role_catalog.contains(&"MANAGER".to_string()));
	}

	#[test]
	fn test_custom_catalog_replaces_default() {
		let layer = ProvisioningConfigLayer {
			role_catalog: Some(vec!["AUDITOR".to_string()]),
		};
		assert_eq!(layer.finalize().role_catalog, vec!["AUDITOR".to_string()]);
	}

	#[test]
	fn test_toml_catalog() {
		let layer: ProvisioningConfigLayer =
			toml::from_str(r#"role_catalog = ["USER", "AUDITOR"]"#).unwrap();
		assert_eq!(
			layer.role_catalog,
			Some(vec!["USER".to_string(), "AUDITOR".to_string()])
		);
	}
}
