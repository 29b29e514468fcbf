use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use {
    clap::Parser,
    sqlx::sqlite::SqlitePoolOptions,
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {
    crosslist_channels::{AdapterRegistry, SqliteAuditLog, SqliteChannelStore},
    crosslist_config::{CrosslistConfig, QueueMode},
    crosslist_gateway::AppState,
    crosslist_listings::SqliteListingStore,
    crosslist_sync::{PublishDispatcher, PublishQueue, PublishWorker, SqlitePublishQueue, SyncReconciler},
};

#[derive(Parser)]
#[command(name = "crosslist", about = "Crosslist — multi-channel listing synchronization", version)]
struct Cli {
    /// Address to bind, host:port (overrides config value).
    #[arg(long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, default_value_t = false)]
    json_logs: bool,

    /// Path to a config file (skips discovery).
    #[arg(long, env = "CROSSLIST_CONFIG")]
    config: Option<PathBuf>,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "crosslist starting");

    let config: CrosslistConfig = match &cli.config {
        Some(path) => crosslist_config::load_config(path)?,
        None => crosslist_config::discover_and_load(),
    };

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database.url)
        .await?;
    SqliteListingStore::init(&pool).await?;
    SqliteChannelStore::init(&pool).await?;
    SqliteAuditLog::init(&pool).await?;
    SqlitePublishQueue::init(&pool).await?;

    let listings = Arc::new(SqliteListingStore::new(pool.clone()));
    let channels = Arc::new(SqliteChannelStore::new(pool.clone()));
    let audit = Arc::new(SqliteAuditLog::new(pool.clone()));
    let adapters = Arc::new(AdapterRegistry::from_config(&config.platforms));
    let adapter_timeout = Duration::from_secs(config.platforms.adapter_timeout_secs);

    let queue = match config.queue.mode {
        QueueMode::Durable => Some(Arc::new(SqlitePublishQueue::new(pool.clone()))),
        QueueMode::Inline => None,
    };

    let dispatcher = Arc::new(PublishDispatcher::new(
        queue.clone().map(|q| q as Arc<dyn PublishQueue>),
        listings.clone(),
        channels.clone(),
        adapters.clone(),
        audit.clone(),
        config.registry.backend,
        adapter_timeout,
    ));

    let worker = match queue {
        Some(queue) => {
            let worker = Arc::new(PublishWorker::new(
                queue,
                dispatcher.clone(),
                Duration::from_millis(config.queue.poll_interval_ms),
                config.queue.concurrency,
            ));
            worker.start().await;
            Some(worker)
        },
        None => {
            info!("inline publish mode, no worker");
            None
        },
    };

    let reconciler = Arc::new(SyncReconciler::new(
        listings,
        channels,
        adapters,
        audit.clone(),
        adapter_timeout,
    ));

    let state = AppState {
        dispatcher,
        reconciler,
        audit,
        webhook_secret: config.server.webhook_secret.clone(),
    };

    let bind = cli.bind.unwrap_or(config.server.bind);
    let addr: SocketAddr = bind.parse()?;
    crosslist_gateway::serve(state, addr).await?;

    if let Some(worker) = worker {
        worker.stop().await;
    }
    Ok(())
}
