// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for the provisioning gateway.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`IGA_SERVER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use iga_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Gateway listening on {}", config.socket_addr());
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub database: DatabaseConfig,
	pub logging: LoggingConfig,
	pub provisioning: ProvisioningConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`IGA_SERVER_*`)
/// 2. Config file (`/etc/iga/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
pub fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let database = layer.database.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();
	let provisioning = layer.provisioning.unwrap_or_default().finalize();

	validate_config(&http, &database, &provisioning)?;

	info!(
		host = %http.host,
		port = http.port,
		database = %database.url,
		max_connections = database.max_connections,
		roles = provisioning.role_catalog.len(),
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		database,
		logging,
		provisioning,
	})
}

/// Validate cross-field configuration rules.
fn validate_config(
	http: &HttpConfig,
	database: &DatabaseConfig,
	provisioning: &ProvisioningConfig,
) -> Result<(), ConfigError> {
	if http.port == 0 {
		return Err(ConfigError::Validation(
			"http.port must be non-zero".to_string(),
		));
	}

	if database.max_connections == 0 {
		return Err(ConfigError::Validation(
			"database.max_connections must be at least 1".to_string(),
		));
	}

	if provisioning
		.role_catalog
		.iter()
		.any(|role| role.trim().is_empty())
	{
		return Err(ConfigError::Validation(
			"provisioning.role_catalog contains an empty role name".to_string(),
		));
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_socket_addr() {
		let config = ServerConfig {
			http: HttpConfig {
				host: "127.0.0.1".to_string(),
				port: 9000,
			},
			..Default::default()
		};
		assert_eq!(config.socket_addr(), "127.0.0.1:9000");
	}

	#[test]
	fn test_finalize_defaults() {
		let config = finalize(ServerConfigLayer::default()).unwrap();
		assert_eq!(config.http.port, 8080);
		assert_eq!(config.database.url, "sqlite:./intranet.db");
		assert_eq!(config.provisioning.role_catalog.len(), DEFAULT_ROLE_CATALOG.len());
	}

	#[test]
	fn test_zero_port_rejected() {
		let layer = ServerConfigLayer {
			http: Some(HttpConfigLayer {
				port: Some(0),
				..Default::default()
			}),
			..Default::default()
		};
		let err = finalize(layer).unwrap_err();
		assert!(err.to_string().contains("http.port"));
	}

	#[test]
	fn test_zero_connections_rejected() {
		let layer = ServerConfigLayer {
			database: Some(DatabaseConfigLayer {
				max_connections: Some(0),
				..Default::default()
			}),
			..Default::default()
		};
		assert!(finalize(layer).is_err());
	}

	#[test]
	fn test_blank_role_rejected() {
		let layer = ServerConfigLayer {
			provisioning: Some(ProvisioningConfigLayer {
				role_catalog: Some(vec!["USER".to_string(), " ".to_string()]),
			}),
			..Default::default()
		};
		let err = finalize(layer).unwrap_err();
		assert!(err.to_string().contains("role_catalog"));
	}

	#[test]
	fn test_file_overrides_defaults() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("server.toml");
		std::fs::write(&path, "[database]\nurl = \"sqlite:/srv/intranet.db\"\n").unwrap();
		let config = load_from_sources(vec![
			Box::new(DefaultsSource),
			Box::new(TomlSource::new(&path)),
		])
		.unwrap();
		assert_eq!(config.database.url, "sqlite:/srv/intranet.db");
		assert_eq!(config.http.port, 8080);
	}
}
