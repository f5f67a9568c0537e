//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATABASE_URL: &str = "postgres://localhost:5432/flow";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 8;
const DEFAULT_LEGACY_STORE_DIR: &str = "data";

/// Command-line arguments for the Flow binary.
#[derive(Debug, Parser)]
#[command(name = "flow", version, about = "Flow blog server")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "FLOW_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the database connection URL.
    #[arg(long = "database-url", env = "DATABASE_URL", value_name = "URL")]
    pub database_url: Option<String>,

    /// Override the directory holding the superseded local store.
    #[arg(long = "legacy-store-dir", value_name = "PATH")]
    pub legacy_store_dir: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("configuration could not be loaded: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid listener address `{address}`: {source}")]
    Address {
        address: String,
        source: std::net::AddrParseError,
    },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub legacy_store: LegacyStoreSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn addr(&self) -> Result<SocketAddr, SettingsError> {
        let address = format!("{}:{}", self.host, self.port);
        address
            .parse()
            .map_err(|source| SettingsError::Address { address, source })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyStoreSettings {
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LoggingSettings {
    pub level: LogLevel,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn filter(self) -> LevelFilter {
        match self {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Compact,
    Json,
}

/// Parse CLI arguments and resolve settings in one step.
pub fn load_with_cli() -> Result<(CliArgs, Settings), SettingsError> {
    let cli = CliArgs::parse();
    let settings = load(&cli)?;
    Ok((cli, settings))
}

/// Resolve settings: compiled defaults, then `config/default.*`, then an
/// explicit file, then `FLOW_*` environment variables, then CLI overrides.
pub fn load(cli: &CliArgs) -> Result<Settings, SettingsError> {
    let mut builder = Config::builder()
        .set_default("server.host", DEFAULT_HOST)?
        .set_default("server.port", i64::from(DEFAULT_PORT))?
        .set_default("database.url", DEFAULT_DATABASE_URL)?
        .set_default("database.max_connections", i64::from(DEFAULT_DB_MAX_CONNECTIONS))?
        .set_default("legacy_store.dir", DEFAULT_LEGACY_STORE_DIR)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "compact")?
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false));

    if let Some(path) = &cli.config_file {
        builder = builder.add_source(File::from(path.clone()));
    }

    builder = builder.add_source(Environment::with_prefix("FLOW").separator("__"));

    let mut settings: Settings = builder.build()?.try_deserialize()?;

    if let Some(host) = &cli.server_host {
        settings.server.host = host.clone();
    }
    if let Some(port) = cli.server_port {
        settings.server.port = port;
    }
    if let Some(url) = &cli.database_url {
        settings.database.url = url.clone();
    }
    if let Some(dir) = &cli.legacy_store_dir {
        settings.legacy_store.dir = dir.clone();
    }

    Ok(settings)
}
