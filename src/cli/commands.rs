//! CLI command implementations

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::http_server::{HttpServer, HttpServerConfig};
use crate::store::{connection, seed_sample_data, DbPath, Schema, SqliteStore};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};

/// Environment variable that overrides `database_path`
pub const DATABASE_PATH_ENV: &str = "TRIVIA_DATABASE_PATH";

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// SQLite database file (default "trivia.db")
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// tracing filter used when RUST_LOG is unset (default "info")
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// HTTP server settings
    #[serde(default)]
    pub server: HttpServerConfig,
}

fn default_database_path() -> String {
    connection::DEFAULT_DATABASE_FILE.to_string()
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            log_filter: default_log_filter(),
            server: HttpServerConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        Self::from_json(&content)
    }

    /// Parse and validate configuration JSON
    pub fn from_json(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load from an optional file, then apply environment overrides
    pub fn resolve(path: Option<&Path>) -> CliResult<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Ok(database_path) = std::env::var(DATABASE_PATH_ENV) {
            if !database_path.trim().is_empty() {
                config.database_path = database_path;
            }
        }

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.database_path.trim().is_empty() {
            return Err(CliError::config_error("database_path must not be empty"));
        }

        if self.server.store_timeout_ms == 0 {
            return Err(CliError::config_error("server.store_timeout_ms must be > 0"));
        }

        self.server
            .cors_header_values()
            .map_err(|e| CliError::config_error(format!("server.cors_origins: {}", e)))?;

        Ok(())
    }

    pub fn db_path(&self) -> DbPath {
        DbPath::new(&self.database_path)
    }

    fn busy_timeout(&self) -> Duration {
        self.server.store_timeout()
    }
}

/// Parse arguments and dispatch
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run a parsed command
pub fn run_command(command: Command) -> CliResult<()> {
    match command {
        Command::Init { config, seed } => {
            let config = Config::resolve(config.as_deref())?;
            init_logging(&config);
            init(&config, seed).map(|_| ())
        }
        Command::Serve { config, port } => {
            let mut config = Config::resolve(config.as_deref())?;
            if let Some(port) = port {
                config.server.port = port;
            }
            init_logging(&config);
            serve(&config)
        }
    }
}

/// Install the global tracing subscriber
///
/// RUST_LOG wins over the configured filter. A second call is a no-op.
pub fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Create the schema, optionally loading sample data.
///
/// Returns the number of sample questions inserted.
pub fn init(config: &Config, seed: bool) -> CliResult<usize> {
    let path = config.db_path();
    let conn = connection::open(&path, config.busy_timeout())?;
    Schema::init(&conn)?;
    tracing::info!(path = %path.as_path().display(), "Database schema ready");

    if !seed {
        return Ok(0);
    }

    let store = SqliteStore::new(conn);
    let inserted = seed_sample_data(&store)?;
    if inserted == 0 {
        tracing::info!("Database already has categories, skipping sample data");
    }
    Ok(inserted)
}

/// Open the store and run the HTTP server until shutdown
pub fn serve(config: &Config) -> CliResult<()> {
    let path = config.db_path();
    if !path.exists() {
        return Err(CliError::not_initialized());
    }

    let conn = connection::open(&path, config.busy_timeout())?;
    if !Schema::is_initialized(&conn)? {
        return Err(CliError::not_initialized());
    }

    tracing::info!(path = %path.as_path().display(), "Opened trivia database");
    let server = HttpServer::with_store(config.server.clone(), SqliteStore::new(conn));

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::serve_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::serve_failed(format!("HTTP server failed: {}", e)))
    })
}
