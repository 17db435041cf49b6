//! # Application Configuration
//!
//! Global configuration state for the application, backed by the `config`
//! crate. Settings are layered: embedded defaults, then an optional
//! configuration file passed with `--config`, then `PASSKEEP_*` environment
//! variables, then command-line flags.

use config::{Config, Environment, File, FileFormat};
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::RwLock;

use super::error::{Error, Result};
use super::types::LogLevel;

lazy_static! {
    // Global configuration state, written during startup and read afterwards.
    pub static ref CONFIG: RwLock<Config> = RwLock::new(Config::default());
}

/// The resolved application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Enables debug mode.
    pub debug: bool,
    /// Logging verbosity.
    pub log_level: LogLevel,
    /// Root directory of the password store. A leading `~` is expanded to
    /// the user's home directory when the store is opened.
    pub store_dir: String,
    /// Seconds a copied secret stays on the clipboard before it is cleared.
    pub clip_time: u64,
    /// Default length for generated passwords.
    pub generated_length: usize,
    /// Editor invoked by the `edit` command when `$EDITOR` is not set.
    pub editor: String,
    /// Name or path of the gpg binary to shell out to.
    pub gpg_binary: String,
}

impl AppConfig {
    /// Initializes the global configuration from the embedded defaults and
    /// the process environment.
    pub fn init(default_config: Option<&str>) -> Result<()> {
        let mut builder = Config::builder();

        // Embedded defaults ship with the binary
        if let Some(contents) = default_config {
            builder = builder.add_source(File::from_str(contents, FileFormat::Toml));
        }

        // PASSKEEP_* environment variables override file values
        builder = builder.add_source(Environment::with_prefix("PASSKEEP").try_parsing(true));

        let settings = builder.build()?;

        let mut writer = CONFIG
            .write()
            .map_err(|_| Error::new("configuration lock poisoned"))?;
        *writer = settings;

        Ok(())
    }

    /// Merges a configuration file on top of the current settings.
    pub fn merge_config(config_file: Option<&Path>) -> Result<()> {
        let Some(path) = config_file else {
            return Ok(());
        };

        if !path.exists() {
            return Err(Error::new(&format!(
                "configuration file not found: {}",
                path.display()
            )));
        }

        let mut writer = CONFIG
            .write()
            .map_err(|_| Error::new("configuration lock poisoned"))?;
        let merged = Config::builder()
            .add_source(writer.clone())
            .add_source(File::from(path))
            .build()?;
        *writer = merged;

        Ok(())
    }

    /// Merges command-line arguments on top of the current settings.
    pub fn merge_args(args: clap::ArgMatches) -> Result<()> {
        if let Some(debug) = args.get_one::<bool>("debug") {
            Self::set("debug", &debug.to_string())?;
        }

        if let Some(log_level) = args.get_one::<LogLevel>("log_level") {
            Self::set("log_level", &log_level.to_string())?;
        }

        Ok(())
    }

    /// Overrides a single configuration value.
    pub fn set(key: &str, value: &str) -> Result<()> {
        let mut writer = CONFIG
            .write()
            .map_err(|_| Error::new("configuration lock poisoned"))?;
        let updated = Config::builder()
            .add_source(writer.clone())
            .set_override(key, value)?
            .build()?;
        *writer = updated;

        Ok(())
    }

    /// Reads a single configuration value.
    pub fn get<'de, T>(key: &str) -> Result<T>
    where
        T: serde::Deserialize<'de>,
    {
        let reader = CONFIG
            .read()
            .map_err(|_| Error::new("configuration lock poisoned"))?;
        Ok(reader.get::<T>(key)?)
    }

    /// Deserializes the full configuration into an [`AppConfig`].
    pub fn fetch() -> Result<AppConfig> {
        let reader = CONFIG
            .read()
            .map_err(|_| Error::new("configuration lock poisoned"))?;
        Ok(reader.clone().try_deserialize()?)
    }
}
