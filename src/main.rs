//! geolocation - IP geolocation importer and lookup API
//!
//! This is the composition root that wires together all the components.
//!
//! Usage: `geolocation import` | `geolocation serve`

use geolocation::adapters::inbound::ApiServer;
use geolocation::adapters::outbound::{CsvRecordSource, SqliteGeoRepository};
use geolocation::application::{ImportService, LookupService};
use geolocation::config::{load_config, Config};
use geolocation::infrastructure::{shutdown_signal, ShutdownController};
use std::sync::Arc;
use tracing_subscriber::fmt::format::FmtSpan;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment
    let cfg = load_config()?;

    // Setup logging
    let log_level = if cfg.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_span_events(FmtSpan::CLOSE)
        .init();

    let mode = std::env::args().nth(1).unwrap_or_default();

    // ===== COMPOSITION ROOT =====
    let repo = Arc::new(SqliteGeoRepository::open(&cfg.db_path)?);
    tracing::info!("store opened at {}", cfg.db_path);

    let shutdown = ShutdownController::new();
    tokio::spawn(shutdown_signal(shutdown.clone()));

    match mode.as_str() {
        "import" => run_import(&cfg, repo, shutdown).await,
        "serve" => {
            let lookup = Arc::new(LookupService::new(repo));
            let server = ApiServer::new(cfg.api_listen_addr.clone(), lookup);
            server.run(shutdown).await
        }
        other => anyhow::bail!("unknown mode {:?}, expected `import` or `serve`", other),
    }
}

async fn run_import(
    cfg: &Config,
    repo: Arc<SqliteGeoRepository>,
    shutdown: ShutdownController,
) -> anyhow::Result<()> {
    // Nothing has been read yet: a plain error, no statistics
    let mut source = CsvRecordSource::open(&cfg.csv_file_path).await?;

    let service = ImportService::new(repo, shutdown);
    match service.run(&mut source, cfg.batch_size).await {
        Ok(stats) => {
            stats.print(std::io::stdout())?;
            Ok(())
        }
        Err(failure) => {
            failure.stats.print(std::io::stdout())?;
            tracing::error!("import failed: {}", failure);
            Err(failure.into())
        }
    }
}
