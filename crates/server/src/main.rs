use std::{
    net::{IpAddr, SocketAddr},
    str::FromStr,
    sync::Arc,
};

use clap::Parser;
use server::{cli::Cli, load_worker_config, missing_assets, router, AppState};
use shared::utils::{configure_tracing, load_dotenv};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    load_dotenv()?;
    configure_tracing()?;

    let args = Cli::parse();
    debug!(?args);

    let worker_config = load_worker_config(args.worker_config.as_deref())?;
    info!(
        "Worker caches {} assets as {}",
        worker_config.assets.len(),
        worker_config.cache_id
    );

    // Any of these will make the worker install fail in the browser
    for asset in missing_assets(&args.assets_dir, &worker_config) {
        warn!("Asset {asset} is not in {:?}, worker install will fail", args.assets_dir);
    }

    let state = AppState {
        worker_script: args.worker_script_path(),
        worker_config: Arc::new(worker_config),
    };

    let socket = SocketAddr::new(IpAddr::from_str(&args.bind_addr)?, args.port);

    let listener = TcpListener::bind(socket).await?;
    debug!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router(args.assets_dir.clone(), state)).await?;

    Ok(())
}
