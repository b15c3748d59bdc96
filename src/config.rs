use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::db::Backend;
use crate::core::{DbError, Result};

pub const ENV_BACKEND: &str = "TASKU_DB_BACKEND";
pub const ENV_HOST: &str = "TASKU_DB_HOST";
pub const ENV_PORT: &str = "TASKU_DB_PORT";
pub const ENV_DATABASE: &str = "TASKU_DB_NAME";
pub const ENV_USER: &str = "TASKU_DB_USER";
pub const ENV_PASSWORD: &str = "TASKU_DB_PASSWORD";

/// Top-level configuration structure parsed from a TOML file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database: ConnectionConfig,
}

/// Where and how to connect. Missing keys fall back to the TaskU
/// development defaults: `root@localhost:3307/tasku` with no password.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub backend: Backend,
    pub host: String,
    /// Schema name for MySQL, file path (or `:memory:`) for SQLite
    pub database: String,
    pub user: String,
    pub password: String,
    pub port: u16,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        ConnectionConfig {
            backend: Backend::Mysql,
            host: "localhost".to_string(),
            database: "tasku".to_string(),
            user: "root".to_string(),
            password: String::new(),
            port: 3307,
        }
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("backend", &self.backend)
            .field("host", &self.host)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &if self.password.is_empty() { "" } else { "***" })
            .field("port", &self.port)
            .finish()
    }
}

impl ConnectionConfig {
    /// Configuration for a SQLite database at `path`.
    pub fn sqlite(path: impl Into<String>) -> Self {
        ConnectionConfig {
            backend: Backend::Sqlite,
            database: path.into(),
            ..ConnectionConfig::default()
        }
    }

    /// Human-readable target for log lines; never includes the password.
    pub fn target(&self) -> String {
        match self.backend {
            Backend::Mysql => format!("{}@{}:{}/{}", self.user, self.host, self.port, self.database),
            Backend::Sqlite => self.database.clone(),
        }
    }

    /// Overrides fields from the `TASKU_DB_*` environment variables.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Same as `apply_env`, reading variables through `lookup`.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(backend) = lookup(ENV_BACKEND) {
            self.backend = backend
                .parse()
                .map_err(|e| DbError::Config(format!("{}: {}", ENV_BACKEND, e)))?;
        }
        if let Some(host) = lookup(ENV_HOST) {
            self.host = host;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| DbError::Config(format!("{}: invalid port '{}'", ENV_PORT, port)))?;
        }
        if let Some(database) = lookup(ENV_DATABASE) {
            self.database = database;
        }
        if let Some(user) = lookup(ENV_USER) {
            self.user = user;
        }
        if let Some(password) = lookup(ENV_PASSWORD) {
            self.password = password;
        }
        Ok(())
    }
}

/// Loads configuration from a TOML file at the given path.
///
/// # Arguments
///
/// * `path` - The file path to the TOML configuration file.
///
/// # Example
///
/// ```no_run
/// let config = tasku_db::config::load_config("db.toml").expect("Failed to load config");
/// println!("{:?}", config);
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// `<config dir>/tasku/db.toml`, e.g. `~/.config/tasku/db.toml` on Linux.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tasku").join("db.toml"))
}

/// Builds the effective connection config: defaults, then the config file,
/// then the environment.
///
/// An explicit `path` must exist; the default path is only read if present.
pub fn resolve(path: Option<&Path>) -> Result<ConnectionConfig> {
    let file = match path {
        Some(path) => Some(path.to_path_buf()),
        None => default_config_path().filter(|p| p.exists()),
    };

    let mut config = match file {
        Some(file) => load_config(&file)?.database,
        None => ConnectionConfig::default(),
    };
    config.apply_env()?;
    Ok(config)
}
