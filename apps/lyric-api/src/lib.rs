pub mod cli;
pub mod routes;
pub mod state;

pub use cli::{Args, VERSION};

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use lyric_storage::db::Db;

use crate::state::AppState;

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = match args.config.as_deref() {
		Some(path) => lyric_config::load(path)?,
		None => lyric_config::load_from_env()?,
	};

	init_tracing(&config);

	let http_addr: SocketAddr = config.service.http_bind.parse()?;
	let db = Db::connect(&config.storage.postgres).await?;

	db.ensure_schema().await?;

	tracing::info!("Connected to Postgres.");

	let state = AppState::new(&db, &config.matcher)?;
	let app = routes::router(state);
	let listener = TcpListener::bind(http_addr).await?;

	tracing::info!(%http_addr, matcher = %config.matcher.api_base, "HTTP server listening.");

	axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

	db.close().await;

	tracing::info!("Postgres pool closed.");

	Ok(())
}

fn init_tracing(config: &lyric_config::Config) {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(err) = tokio::signal::ctrl_c().await {
			tracing::error!(error = %err, "Failed to listen for Ctrl-C.");

			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
			Ok(mut signal) => {
				signal.recv().await;
			},
			Err(err) => {
				tracing::error!(error = %err, "Failed to listen for SIGTERM.");

				std::future::pending::<()>().await;
			},
		}
	};
	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}

	tracing::info!("Shutdown signal received; draining HTTP server.");
}
