use anyhow::Result;
use config::Config;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CalendarConfig {
    /// Calendar file used when no `--calendar` argument is given.
    pub path: Option<String>,
    /// Default cap on the number of occurrences listed.
    pub limit: Option<usize>,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from `eventide.toml` and `EVENTIDE_*` environment variables
    /// into a `Settings`. Environment variables take precedence over file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Config::builder()
            .set_default("logging.level", "info")?
            // TOML file
            .add_source(config::File::with_name("eventide.toml").required(false))
            // Env
            .add_source(
                config::Environment::with_prefix("EVENTIDE")
                    .separator("_")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    tracing::debug!(settings = ?settings, "Configuration loaded");
    Ok(settings)
}
