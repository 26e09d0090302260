mod defaults;
mod providers;


pub use providers::*;

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::AnnadataError;
use defaults::*;

/// Top-level Annadata configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub annadata: AppConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub advisory: AdvisoryConfig,
    #[serde(default)]
    pub localization: LocalizationConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

/// Advisory request settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryConfig {
    /// Cache successful model outputs keyed by input hash.
    #[serde(default)]
    pub cache_enabled: bool,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: u64,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            cache_enabled: false,
            cache_ttl_secs: default_cache_ttl_secs(),
            cache_max_entries: default_cache_max_entries(),
        }
    }
}

/// Localization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalizationConfig {
    /// Language used when no preference is stored and as the load fallback.
    #[serde(default = "default_language")]
    pub default_language: String,
    /// Directory of `<code>.json` catalogs. Empty = use bundled catalogs.
    #[serde(default)]
    pub locales_dir: String,
    /// SQLite file holding the persisted language preference.
    #[serde(default = "default_preferences_db")]
    pub preferences_db: String,
    /// Persist the selected language on every switch.
    #[serde(default = "default_true")]
    pub persist_selection: bool,
}

impl Default for LocalizationConfig {
    fn default() -> Self {
        Self {
            default_language: default_language(),
            locales_dir: String::new(),
            preferences_db: default_preferences_db(),
            persist_selection: true,
        }
    }
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

impl Config {
    /// Make sure the section for the default provider exists so its
    /// defaults and environment keys apply.
    fn ensure_default_provider_section(&mut self) {
        match self.provider.default.as_str() {
            "gemini" if self.provider.gemini.is_none() => {
                self.provider.gemini = Some(GeminiConfig::default());
            }
            "openai" if self.provider.openai.is_none() => {
                self.provider.openai = Some(OpenAiConfig::default());
            }
            _ => {}
        }
    }
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist. Empty API keys are
/// filled from the environment.
pub fn load(path: &str) -> Result<Config, AnnadataError> {
    let path = Path::new(path);
    let mut config = if path.exists() {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnnadataError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        parse(&content)?
    } else {
        info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        Config::default()
    };

    config.ensure_default_provider_section();
    config.provider.apply_env();
    Ok(config)
}

/// Parse configuration from TOML text.
pub fn parse(content: &str) -> Result<Config, AnnadataError> {
    toml::from_str(content)
        .map_err(|e| AnnadataError::Config(format!("failed to parse config: {}", e)))
}
