use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;
use vectradb_core::config::{self, StoreConfig};
use vectradb_core::storage::Database;
use vectradb_server::api::create_router;
use vectradb_server::api::handlers::AppState;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Json,
    Pretty,
}

#[derive(Parser)]
#[command(name = "vectradb", about = "Embedded vector and document store", version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "VECTRADB_PORT", default_value_t = config::DEFAULT_PORT)]
    port: u16,

    /// Path of the database file (parent directories are created)
    #[arg(long, env = "VECTRADB_DB_PATH", default_value = config::DEFAULT_DB_PATH)]
    db_path: PathBuf,

    /// Seconds to wait for another process to release the database file
    #[arg(long, env = "VECTRADB_OPEN_TIMEOUT", default_value_t = config::DEFAULT_OPEN_TIMEOUT_SECS)]
    open_timeout: u64,

    /// Default log directive; RUST_LOG takes precedence when set
    #[arg(long, env = "VECTRADB_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, env = "VECTRADB_LOG_FORMAT", value_enum, default_value_t = LogFormat::Json)]
    log_format: LogFormat,

    /// Graceful shutdown timeout in seconds
    #[arg(long, env = "VECTRADB_SHUTDOWN_TIMEOUT", default_value_t = config::DEFAULT_SHUTDOWN_TIMEOUT_SECS)]
    shutdown_timeout: u64,
}

fn init_tracing(args: &Args) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "vectradb_server={level},vectradb_core={level},tower_http=info",
            level = args.log_level
        ))
    });
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match args.log_format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(&args);

    if args.port == 0 {
        eprintln!("Error: port must be > 0");
        std::process::exit(1);
    }
    if args.db_path.is_dir() {
        eprintln!(
            "Error: db_path '{}' is a directory, expected a file",
            args.db_path.display()
        );
        std::process::exit(1);
    }

    let store_config = StoreConfig::new(&args.db_path)
        .with_open_timeout(Duration::from_secs(args.open_timeout));
    let db = Arc::new(Database::open(&store_config)?);

    let prometheus_handle =
        metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()?;

    let state = AppState {
        db: Arc::clone(&db),
        prometheus_handle,
        start_time: Instant::now(),
    };
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        port = args.port,
        db_path = %args.db_path.display(),
        vectors = db.vectors().len(),
        "VectraDB ready"
    );

    let (drain_tx, drain_rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = drain_rx.await;
            })
            .await
    });

    wait_for_signal().await;
    let _ = drain_tx.send(());

    let shutdown_timeout = Duration::from_secs(args.shutdown_timeout);
    match tokio::time::timeout(shutdown_timeout, server).await {
        Ok(Ok(Ok(()))) => tracing::info!("All requests drained"),
        Ok(Ok(Err(e))) => tracing::error!("Server error during shutdown: {}", e),
        Ok(Err(e)) => tracing::error!("Server task failed: {}", e),
        Err(_) => tracing::warn!(
            "Shutdown timeout ({}s) exceeded, abandoning in-flight requests",
            args.shutdown_timeout
        ),
    }

    close_database(db);
    Ok(())
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }

    tracing::info!("Shutting down gracefully, draining in-flight requests...");
}

fn close_database(db: Arc<Database>) {
    match Arc::try_unwrap(db) {
        Ok(db) => db.close(),
        // Abandoned request tasks still hold the handle; the file lock is
        // released when the process exits.
        Err(_) => tracing::warn!("Database still referenced at shutdown, skipping close"),
    }
}
