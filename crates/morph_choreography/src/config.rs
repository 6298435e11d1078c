//! Choreographer configuration
//!
//! Defaults applied to steps that do not configure themselves, loaded from TOML:
//!
//! ```toml
//! default_duration_ms = 350
//! default_curve = "standard"
//! allow_inheritance = true
//! frame_cache_capacity = 5
//!
//! [default_pivot.relative_to_self]
//! x = 0.5
//! y = 0.5
//! ```
//!
//! Every field is optional.

use crate::error::ConfigError;
use morph_animation::{CurveName, DEFAULT_FRAME_CACHE_CAPACITY};
use morph_core::Pivot;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Choreographer-wide defaults
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ChoreographerConfig {
    /// Duration of steps that neither set nor inherit one
    #[serde(default = "default_duration_ms")]
    pub default_duration_ms: u32,
    /// Curve of steps that neither set nor inherit one
    #[serde(default)]
    pub default_curve: CurveName,
    /// Pivot of steps that neither set nor inherit one
    #[serde(default)]
    pub default_pivot: Pivot,
    /// Whether steps inherit unset duration, curve and pivot from their parent
    #[serde(default = "default_true")]
    pub allow_inheritance: bool,
    /// Capacity of frame caches created for frame animations
    #[serde(default = "default_frame_cache_capacity")]
    pub frame_cache_capacity: usize,
}

fn default_duration_ms() -> u32 {
    350
}

fn default_true() -> bool {
    true
}

fn default_frame_cache_capacity() -> usize {
    DEFAULT_FRAME_CACHE_CAPACITY
}

impl Default for ChoreographerConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: default_duration_ms(),
            default_curve: CurveName::default(),
            default_pivot: Pivot::default(),
            allow_inheritance: default_true(),
            frame_cache_capacity: default_frame_cache_capacity(),
        }
    }
}

impl ChoreographerConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: ChoreographerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "choreographer config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_cache_capacity == 0 {
            return Err(ConfigError::Invalid(
                "frame_cache_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
