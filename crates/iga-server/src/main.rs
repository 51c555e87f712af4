// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity provisioning gateway binary.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use iga_server::{create_app_state, create_router, version};
use iga_server_db::{create_pool, run_migrations, PoolSettings, UserRepository};
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// iga-server - HTTP/JSON provisioning gateway for the intranet directory.
#[derive(Parser, Debug)]
#[command(name = "iga-server", about = "Identity provisioning gateway", version)]
struct Args {
	/// Config file (defaults to /etc/iga/server.toml)
	#[arg(long, global = true, env = "IGA_SERVER_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Run the gateway (default)
	Serve,
	/// Show version and build information
	Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	// Load .env file if present
	dotenvy::dotenv().ok();

	let config = match &args.config {
		Some(path) => iga_server_config::load_config_with_file(path)?,
		None => iga_server_config::load_config()?,
	};

	tracing_subscriber::registry()
		.with(
			tracing_subscriber::EnvFilter::try_from_default_env()
				.unwrap_or_else(|_| config.logging.level.clone().into()),
		)
		.with(tracing_subscriber::fmt::layer())
		.init();

	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		database = %config.database.url,
		"starting iga-server"
	);

	let pool = create_pool(
		&config.database.url,
		&PoolSettings {
			max_connections: config.database.max_connections,
			acquire_timeout: Duration::from_secs(config.database.acquire_timeout_secs),
		},
	)
	.await?;

	run_migrations(&pool).await?;

	let repo = UserRepository::new(pool);
	let added = repo.ensure_roles(&config.provisioning.role_catalog).await?;
	tracing::info!(
		catalog = config.provisioning.role_catalog.len(),
		added,
		"role catalog ready"
	);

	let state = create_app_state(Arc::new(repo));

	let app = create_router(state)
		.layer(TraceLayer::new_for_http())
		.layer(
			CorsLayer::new()
				.allow_origin(Any)
				.allow_methods(Any)
				.allow_headers(Any),
		);

	let addr = config.socket_addr();
	tracing::info!("listening on {}", addr);

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	tracing::info!("Server shutdown complete");
	Ok(())
}
