//! Loading and saving `config.toml`.

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

use crate::models::settings::AppConfig;

pub const API_URL_ENV: &str = "LAB_CALENDAR_API_URL";
pub const API_TOKEN_ENV: &str = "LAB_CALENDAR_API_TOKEN";

pub struct ConfigService {
    path: PathBuf,
}

impl ConfigService {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Service for the platform config location, e.g.
    /// `~/.config/lab-calendar/config.toml` on Linux.
    pub fn from_default_location() -> Result<Self> {
        let path = Self::default_path().context("Could not determine config directory")?;
        Ok(Self::new(path))
    }

    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("edu", "lab", "lab-calendar")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the file (defaults when absent), apply environment overrides and
    /// validate.
    pub fn load(&self) -> Result<AppConfig> {
        let mut config = if self.path.exists() {
            let contents = std::fs::read_to_string(&self.path)
                .with_context(|| format!("Failed to read config at {}", self.path.display()))?;
            toml::from_str::<AppConfig>(&contents)
                .with_context(|| format!("Failed to parse {}", self.path.display()))?
        } else {
            log::info!(
                "No config at {}, using defaults",
                self.path.display()
            );
            AppConfig::default()
        };

        apply_env_overrides(&mut config);
        config
            .validate()
            .map_err(|e| anyhow!("Invalid configuration: {}", e))?;
        Ok(config)
    }

    pub fn save(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
        std::fs::write(&self.path, contents)
            .with_context(|| format!("Failed to write config to {}", self.path.display()))?;
        Ok(())
    }

    /// Write a default config file; refuses to overwrite an existing one.
    pub fn write_default(&self) -> Result<&Path> {
        if self.path.exists() {
            return Err(anyhow!(
                "Config already exists at {}",
                self.path.display()
            ));
        }
        self.save(&AppConfig::default())?;
        Ok(&self.path)
    }
}

fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(url) = std::env::var(API_URL_ENV) {
        if !url.trim().is_empty() {
            log::debug!("API URL overridden by {}", API_URL_ENV);
            config.api.base_url = url;
        }
    }
    if let Ok(token) = std::env::var(API_TOKEN_ENV) {
        if !token.trim().is_empty() {
            config.api.token = Some(token);
        }
    }
}
