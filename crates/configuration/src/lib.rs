use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{
    CloudinarySettings, DatabaseBackend, DatabaseSettings, ImageBackend, ImageSettings,
    LocalSettings, ServerSettings, Settings,
};

/// Prefix of the environment variables that override file settings,
/// e.g. `SCHOOLS__SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "SCHOOLS";

/// Loads and validates the application settings.
///
/// Sources, lowest precedence first: built-in defaults, the TOML file at
/// `path` (optional, may be missing), then `SCHOOLS__*` environment variables.
/// A `.env` file is read first so secrets can live there.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    load_unvalidated(path)?.finalize()
}

/// Reads the same sources as [`load_settings`] but skips `finalize`, so a
/// caller can layer its own overrides first. Call `Settings::finalize`
/// before use.
pub fn load_unvalidated(path: &Path) -> Result<Settings, ConfigError> {
    dotenvy::dotenv().ok();

    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    tracing::debug!(path = %path.display(), "Configuration loaded.");
    Ok(settings)
}

/// Parses settings from TOML text alone, without consulting the environment.
pub fn parse_settings(toml: &str) -> Result<Settings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;
    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;
    Ok(settings)
}
