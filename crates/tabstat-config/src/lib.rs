//! Configuration plumbing shared by tabstat services.
//!
//! A configuration type derives [`Config`] to describe how it is read
//! from a TOML table, which of its fields may change at runtime, and how it
//! is validated. [`ConfigManager`] holds the live value behind an `ArcSwap`
//! so readers never block while a reload is published.

pub mod manager;

pub use manager::ConfigManager;
pub use tabstat_config_derive::Config;

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("field `{field}` has wrong type, expected {expected}")]
    TypeMismatch { field: String, expected: String },

    #[error("field `{field}` value {value} out of range [{}, {}]",
        .min.as_deref().unwrap_or("-inf"), .max.as_deref().unwrap_or("+inf"))]
    OutOfRange {
        field: String,
        value: String,
        min: Option<String>,
        max: Option<String>,
    },
}

/// A configuration section.
pub trait Config: Send + Sync + Sized + 'static {
    /// Build the configuration from a TOML table. Missing keys keep their defaults.
    fn from_toml(value: &toml::Value) -> Result<Self, ConfigError>;

    /// Copy the hot-updatable fields of `other` into `self`.
    fn hot_update(&mut self, other: &Self);

    /// Render as TOML text.
    fn render(&self) -> String;

    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }
}
