use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Prefix of the environment variables that override file settings,
/// e.g. `TASKMANAGER_DB_URL`.
pub const ENV_PREFIX: &str = "TASKMANAGER";
/// Base name of the optional configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "taskmanager";

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_db_url")]
    pub db_url: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout_secs")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime_secs")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

impl Config {
    /// Loads configuration from a file, overlaid with environment variables.
    ///
    /// Without an explicit `path`, `taskmanager.{toml,yaml,json,...}` is read
    /// from the working directory if it exists.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        let settings = config::Config::builder()
            .add_source(file)
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        Ok(config)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    pub fn max_lifetime(&self) -> Duration {
        Duration::from_secs(self.max_lifetime_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_url: default_db_url(),
            pool_size: default_pool_size(),
            connect_timeout_secs: default_connect_timeout_secs(),
            idle_timeout_secs: default_idle_timeout_secs(),
            max_lifetime_secs: default_max_lifetime_secs(),
            run_migrations: default_run_migrations(),
        }
    }
}

fn default_db_url() -> String {
    "sqlite://taskmanager.db?mode=rwc".to_string()
}

fn default_pool_size() -> u32 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    30
}

fn default_idle_timeout_secs() -> u64 {
    600
}

fn default_max_lifetime_secs() -> u64 {
    1800
}

fn default_run_migrations() -> bool {
    true
}
