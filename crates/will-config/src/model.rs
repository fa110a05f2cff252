use serde::{de::Deserializer, Deserialize, Serialize};
use std::{env, fmt, path::PathBuf};

use crate::ConfigError;

const DEFAULT_DIR_NAME: &str = ".mywill";
const HOME_ENV: &str = "MYWILL_HOME";

/// Stores user-configurable wizard preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub accessibility: AccessibilitySettings,

    /// Estates valued below this skip the complex-assets step.
    #[serde(default = "Config::default_complex_assets_skip_threshold")]
    pub complex_assets_skip_threshold: u64,

    /// Estates valued above this are flagged for solicitor referral.
    #[serde(default = "Config::default_high_value_estate_threshold")]
    pub high_value_estate_threshold: u64,

    #[serde(default = "Config::default_record_backup_retention")]
    pub record_backup_retention: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Optional custom data directory. Defaults to `$MYWILL_HOME` or `~/.mywill`.
    pub data_root: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// `tracing` filter directive, e.g. `mywill=debug`.
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "en-GB".into(),
            currency: "GBP".into(),
            currency_symbol: Self::default_currency_symbol(),
            theme: Theme::default(),
            accessibility: AccessibilitySettings::default(),
            complex_assets_skip_threshold: Self::default_complex_assets_skip_threshold(),
            high_value_estate_threshold: Self::default_high_value_estate_threshold(),
            record_backup_retention: Self::default_record_backup_retention(),
            data_root: None,
            log_filter: None,
        }
    }
}

impl Config {
    pub fn default_currency_symbol() -> String {
        "£".into()
    }

    pub fn default_complex_assets_skip_threshold() -> u64 {
        400_000
    }

    pub fn default_high_value_estate_threshold() -> u64 {
        1_000_000
    }

    pub fn default_record_backup_retention() -> usize {
        5
    }

    /// Application data directory: config override, then `MYWILL_HOME`, then `~/.mywill`.
    pub fn resolve_data_root(&self) -> PathBuf {
        if let Some(path) = &self.data_root {
            return path.clone();
        }
        default_data_root()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.complex_assets_skip_threshold > self.high_value_estate_threshold {
            return Err(ConfigError::Invalid(format!(
                "complex_assets_skip_threshold ({}) must not exceed high_value_estate_threshold ({})",
                self.complex_assets_skip_threshold, self.high_value_estate_threshold
            )));
        }
        if self.record_backup_retention == 0 {
            return Err(ConfigError::Invalid(
                "record_backup_retention must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// `MYWILL_HOME` when set, otherwise `~/.mywill`.
pub fn default_data_root() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Plain,
    #[default]
    Iconic,
}

impl Theme {
    fn from_value(value: Option<String>) -> Self {
        value
            .map(|v| Theme::from_str(v.trim()))
            .unwrap_or_default()
    }

    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "plain" => Theme::Plain,
            _ => Theme::Iconic,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Theme::Plain => "plain",
            Theme::Iconic => "iconic",
        };
        f.write_str(label)
    }
}

impl<'de> Deserialize<'de> for Theme {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(Theme::from_value(value))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccessibilitySettings {
    #[serde(default)]
    pub plain_output: bool,
    #[serde(default)]
    pub high_contrast: bool,
}
