use config::{Config, ConfigError, Environment, File, Source};
use serde::Deserialize;

/// Optional settings file looked up in the working directory (`wholesale.toml`).
pub const CONFIG_FILE: &str = "wholesale";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://wholesale.db?mode=rwc";
pub const DEFAULT_LOG_FILTER: &str = "wholesale=info,sea_orm=warn";

/// Application settings.
///
/// Sources, lowest precedence first: built-in defaults, `wholesale.toml`,
/// then `WHOLESALE__*` environment variables (e.g. `WHOLESALE__DATABASE_URL`).
/// A `.env` file is read into the environment before anything else.
/// Command line arguments win over all of these.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub log_filter: String,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_source(File::with_name(CONFIG_FILE).required(false))
    }

    /// Builds settings with `file` in place of `wholesale.toml`.
    pub fn from_source<S>(file: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        Config::builder()
            .set_default("database_url", DEFAULT_DATABASE_URL)?
            .set_default("log_filter", DEFAULT_LOG_FILTER)?
            .add_source(file)
            .add_source(Environment::with_prefix("WHOLESALE").separator("__"))
            .build()?
            .try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}
