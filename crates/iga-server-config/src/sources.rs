// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: defaults, TOML files and environment variables.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{
	DatabaseConfigLayer, HttpConfigLayer, LoggingConfigLayer, ProvisioningConfigLayer,
};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file is not an error.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/iga/server.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: IGA_SERVER_<SECTION>_<FIELD>
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		layer_from_vars(|name| std::env::var(name).ok())
	}
}

/// Build a layer from a variable lookup. Empty values count as unset.
pub(crate) fn layer_from_vars<F>(lookup: F) -> Result<ServerConfigLayer, ConfigError>
where
	F: Fn(&str) -> Option<String>,
{
	let vars = EnvVars { lookup };
	Ok(ServerConfigLayer {
		http: Some(HttpConfigLayer {
			host: vars.string("IGA_SERVER_HOST"),
			port: vars.parsed("IGA_SERVER_PORT", "u16")?,
		}),
		database: Some(DatabaseConfigLayer {
			url: vars.string("IGA_SERVER_DATABASE_URL"),
			max_connections: vars.parsed("IGA_SERVER_DATABASE_MAX_CONNECTIONS", "u32")?,
			acquire_timeout_secs: vars.parsed("IGA_SERVER_DATABASE_ACQUIRE_TIMEOUT_SECS", "u64")?,
		}),
		logging: Some(LoggingConfigLayer {
			level: vars.string("IGA_SERVER_LOG_LEVEL"),
		}),
		provisioning: Some(ProvisioningConfigLayer {
			role_catalog: vars.list("IGA_SERVER_ROLE_CATALOG"),
		}),
	})
}

struct EnvVars<F> {
	lookup: F,
}

impl<F> EnvVars<F>
where
	F: Fn(&str) -> Option<String>,
{
	fn string(&self, name: &str) -> Option<String> {
		(self.lookup)(name).filter(|s| !s.is_empty())
	}

	fn parsed<T: std::str::FromStr>(
		&self,
		name: &str,
		type_name: &str,
	) -> Result<Option<T>, ConfigError> {
		match self.string(name) {
			Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
				key: name.to_string(),
				message: format!("invalid {type_name} value '{v}'"),
			}),
			None => Ok(None),
		}
	}

	fn list(&self, name: &str) -> Option<Vec<String>> {
		self.string(name).map(|s| {
			s.split(',')
				.map(|s| s.trim().to_string())
				.filter(|s| !s.is_empty())
				.collect()
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let map: HashMap<String, String> = pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		move |name| map.get(name).cloned()
	}

	#[test]
	fn test_precedence_ordering() {
		assert!(Precedence::Environment > Precedence::ConfigFile);
		assert!(Precedence::ConfigFile > Precedence::Defaults);
	}

	#[test]
	fn test_defaults_source_returns_empty_layer() {
		let layer = DefaultsSource.load().unwrap();
		assert!(layer.http.is_none());
		assert!(layer.database.is_none());
	}

	#[test]
	fn test_toml_source_missing_file_returns_empty() {
		let layer = TomlSource::new("/nonexistent/server.toml").load().unwrap();
		assert!(layer.http.is_none());
	}

	#[test]
	fn test_toml_source_reads_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("server.toml");
		std::fs::write(&path, "[http]\nport = 9001\n").unwrap();
		let layer = TomlSource::new(&path).load().unwrap();
		assert_eq!(layer.http.unwrap().port, Some(9001));
	}

	#[test]
	fn test_toml_source_parse_error_names_path() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("broken.toml");
		std::fs::write(&path, "[http\nport = ").unwrap();
		let err = TomlSource::new(&path).load().unwrap_err();
		assert!(matches!(err, ConfigError::TomlParse { .. }));
		assert!(err.to_string().contains("broken.toml"));
	}

	#[test]
	fn test_env_layer_reads_variables() {
		let layer = layer_from_vars(vars(&[
			("IGA_SERVER_HOST", "127.0.0.1"),
			("IGA_SERVER_PORT", "8181"),
			("IGA_SERVER_DATABASE_URL", "sqlite:/tmp/x.db"),
			("IGA_SERVER_ROLE_CATALOG", "USER, AUDITOR,,"),
		]))
		.unwrap();
		let http = layer.http.unwrap();
		assert_eq!(http.host.as_deref(), Some("127.0.0.1"));
		assert_eq!(http.port, Some(8181));
		assert_eq!(
			layer.database.unwrap().url.as_deref(),
			Some("sqlite:/tmp/x.db")
		);
		assert_eq!(
			layer.provisioning.unwrap().role_catalog,
			Some(vec!["USER".to_string(), "AUDITOR".to_string()])
		);
	}

	#[test]
	fn test_env_empty_values_are_unset() {
		let layer = layer_from_vars(vars(&[("IGA_SERVER_HOST", ""), ("IGA_SERVER_PORT", "")])).unwrap();
		let http = layer.http.unwrap();
		assert!(http.host.is_none());
		assert!(http.port.is_none());
	}

	#[test]
	fn test_env_invalid_port() {
		let err = layer_from_vars(vars(&[("IGA_SERVER_PORT", "eighty")])).unwrap_err();
		match err {
			ConfigError::InvalidValue { key, message } => {
				assert_eq!(key, "IGA_SERVER_PORT");
				assert!(message.contains("eighty"));
			}
			other => panic!("unexpected error: {other}"),
		}
	}
}
