use clap::Parser;
use sportsbook::server::{Daemon, ServerConfig};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "sportsbookd", about = "Racing and sports catalog server", version)]
struct Args {
  #[arg(long, env = "SPORTSBOOK_RACING_DB")]
  racing_db: Option<String>,
  #[arg(long, env = "SPORTSBOOK_SPORTS_DB")]
  sports_db: Option<String>,
  /// Insert fixture rows on startup
  #[arg(long)]
  seed: bool,
  #[arg(short, long)]
  port: Option<u16>,
  #[arg(long)]
  host: Option<String>,
  #[arg(short, long)]
  config: Option<String>,
  #[arg(long)]
  log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
  let args = Args::parse();

  // Load config: explicit path > auto-detect > defaults
  let mut config = if let Some(path) = &args.config {
    ServerConfig::from_file(path)?
  } else {
    ServerConfig::find_and_load()?.unwrap_or_default()
  };

  // CLI args override config file
  if let Some(path) = args.racing_db {
    config.racing.path = path;
  }
  if let Some(path) = args.sports_db {
    config.sports.path = path;
  }
  if args.seed {
    config.seed = true;
  }
  if let Some(port) = args.port {
    config.server.port = port;
  }
  if let Some(host) = args.host {
    config.server.host = host;
  }
  if let Some(level) = args.log_level {
    config.logging.level = level;
  }

  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.clone().into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let daemon = Arc::new(Daemon::open(config)?);
  let daemon_clone = daemon.clone();

  // Handle shutdown signals (SIGINT, SIGTERM)
  tokio::spawn(async move {
    shutdown_signal().await;
    daemon_clone.shutdown();
  });

  daemon.run().await
}

async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      tracing::error!("Failed to install Ctrl+C handler: {}", e);
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
      Ok(mut signal) => {
        signal.recv().await;
      }
      Err(e) => {
        tracing::error!("Failed to install SIGTERM handler: {}", e);
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    _ = ctrl_c => tracing::info!("Received SIGINT"),
    _ = terminate => tracing::info!("Received SIGTERM"),
  }
}
