//! StockWise license gateway.
//!
//! Serves the license HTTP API for a StockWise installation: issuance and
//! activation (superadmin), the debounced heartbeat, rate-limited
//! revalidation, and the public current-license overview.
//!
//! Usage:
//!   stockwise-gateway --port 8090 --database stockwise-license.db

use anyhow::{Context, Result};
use clap::Parser;
use rand::RngCore;
use std::{fs, net::SocketAddr, path::PathBuf, sync::Arc};
use stockwise_gateway::{build_router, AppState};
use stockwise_license::{FailureMode, LicenseConfig, SignatureEngine};
use stockwise_store::SqliteStore;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "stockwise-gateway")]
#[command(about = "StockWise license validation gateway")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8090")]
    port: u16,

    /// Path to the license database
    #[arg(short, long, default_value = "stockwise-license.db")]
    database: PathBuf,

    /// Path to the signing secret file
    #[arg(short, long, default_value = "license-signing.key")]
    secret: PathBuf,

    /// Fail closed when the store is unreachable
    #[arg(long)]
    strict: bool,

    /// Reject revalidation when a license exceeds its installation limit
    #[arg(long)]
    enforce_installations: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .compact()
        .init();

    info!("StockWise license gateway starting...");
    let secret = load_or_generate_secret(&args.secret)?;
    let store = SqliteStore::open(&args.database).with_context(|| {
        format!("failed to open license store at {}", args.database.display())
    })?;

    let config = LicenseConfig {
        failure_mode: if args.strict {
            FailureMode::Strict
        } else {
            FailureMode::Permissive
        },
        enforce_installation_limit: args.enforce_installations,
        ..LicenseConfig::default()
    };
    let state = AppState::new(Arc::new(store), SignatureEngine::new(&secret), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.port))
        .await
        .context("failed to bind HTTP port")?;
    info!("license API listening on port {}", args.port);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("HTTP server failed")?;

    Ok(())
}

fn load_or_generate_secret(path: &PathBuf) -> Result<Vec<u8>> {
    if path.exists() {
        info!("loading signing secret from {:?}", path);
        fs::read(path).context("failed to read signing secret")
    } else {
        info!("generating new signing secret at {:?}", path);
        let mut secret = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut secret);
        fs::write(path, secret).context("failed to write signing secret")?;
        Ok(secret.to_vec())
    }
}
