//! # Ventes Dashboard Library
//!
//! Wires configuration, logging, the record store and the console together.
//!
//! ## Module Organization
//! ```text
//! ventes_dashboard/
//! ├── lib.rs          ◄─── You are here (startup)
//! ├── config.rs       ◄─── TOML config + VENTES_* overrides
//! ├── console.rs      ◄─── Line-oriented front end
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   └── sales.rs    ◄─── Snapshot mirror, entry form, in-flight flag
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── sale.rs     ◄─── Add / delete / look up / preview
//! │   ├── dashboard.rs◄─── Computed views
//! │   └── report.rs   ◄─── Annual PDF export
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod config;
pub mod console;
pub mod error;
pub mod state;

use std::path::PathBuf;
use std::sync::Arc;

use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};
use ventes_db::{Database, DbConfig, SqliteRecordStore};

use config::{AppConfig, DEFAULT_LOG_FILTER};
use console::{run_console, Console};
use state::SalesState;

/// Runs the dashboard until `quit` or end of input.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • RUST_LOG, else the default filter                                │
/// │     • Written to stderr so stdout stays the console                    │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • --config file, else the platform config file, else defaults      │
/// │     • VENTES_* environment overrides, then validation                  │
/// │     • [logging].filter replaces the default unless RUST_LOG is set     │
/// │                                                                         │
/// │  3. Connect to Database ──────────────────────────────────────────────► │
/// │     • SQLite with WAL mode, pending migrations applied                 │
/// │                                                                         │
/// │  4. Subscribe ────────────────────────────────────────────────────────► │
/// │     • First snapshot loaded before the prompt appears                  │
/// │                                                                         │
/// │  5. Console Loop ─────────────────────────────────────────────────────► │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(config_path: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let log_filter = init_tracing();
    let config = AppConfig::load(config_path)?;
    if let Some(handle) = log_filter {
        apply_log_filter(&handle, &config.logging.filter);
    }

    info!("Starting Ventes dashboard");

    let db_path = config.database.path.clone();
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    info!(?db_path, "Database path determined");

    let db = Database::new(
        DbConfig::new(db_path).max_connections(config.database.max_connections),
    )
    .await?;
    info!("Database connected and migrations applied");

    let today = chrono::Local::now().date_naive();
    let year = config.tracked_year(today);
    let store = Arc::new(SqliteRecordStore::new(db.clone()));
    let state = SalesState::start(store, config.store.collection.clone(), year, today).await?;

    let console = Console::new(state, config.report.to_options());
    run_console(
        &console,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
        || chrono::Local::now().date_naive(),
    )
    .await?;

    drop(console);
    db.close().await;
    info!("Ventes dashboard stopped");
    Ok(())
}

/// Handle for swapping the log filter once the configuration is known.
type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Initializes the tracing subscriber for structured logging.
///
/// Runs before the configuration is read, so config loading is logged too.
/// Returns a handle for the configured filter, or `None` when `RUST_LOG`
/// is set and takes precedence.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=ventes=trace` - Show trace for ventes crates only
/// - Default: `[logging].filter` from the config file
fn init_tracing() -> Option<FilterHandle> {
    let from_env = EnvFilter::try_from_default_env().ok();
    let env_wins = from_env.is_some();
    let filter = from_env.unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER));

    let (subscriber, handle) = reloadable_subscriber(filter, std::io::stderr);
    subscriber.init();

    (!env_wins).then_some(handle)
}

fn reloadable_subscriber<W>(
    filter: EnvFilter,
    writer: W,
) -> (impl tracing::Subscriber + Send + Sync + 'static, FilterHandle)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let (filter, handle) = reload::Layer::new(filter);
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer));
    (subscriber, handle)
}

fn apply_log_filter(handle: &FilterHandle, directives: &str) {
    match handle.reload(EnvFilter::new(directives)) {
        Ok(()) => info!(filter = %directives, "Applied configured log filter"),
        Err(e) => warn!(error = %e, "Could not apply configured log filter"),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
