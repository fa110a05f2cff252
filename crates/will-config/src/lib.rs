//! will-config
//!
//! Persistent preferences for the will wizard: wizard thresholds, storage
//! roots, presentation and logging. Owns the Config model plus disk
//! persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{default_data_root, AccessibilitySettings, Config, Theme};
