//! Scenario files and playback settings.
//!
//! A scenario names one algorithm with its parameters plus the playback
//! settings used to walk through it:
//!
//! ```yaml
//! schema_version: "1.0"
//! name: "Linear search, target present"
//! playback:
//!   interval_ms: 1000
//!   autoplay: true
//! algorithm:
//!   kind: linear_search
//!   array: [10, 25, 30, 42, 55]
//!   target: 42
//! ```
//!
//! Loading runs three layers of checks: serde structure (unknown fields are
//! rejected), `validator` ranges, and a semantic pass over the algorithm
//! parameters.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;
use validator::Validate;

use crate::error::{VizError, VizResult};
use crate::generators::AlgorithmSpec;

/// Auto-advance period used when none is configured, in milliseconds.
pub const DEFAULT_INTERVAL_MS: u64 = 1500;

/// Shortest accepted auto-advance period, in milliseconds.
pub const MIN_INTERVAL_MS: u64 = 50;

/// Longest accepted auto-advance period, in milliseconds.
pub const MAX_INTERVAL_MS: u64 = 60_000;

/// Largest array a scenario may carry; quadratic generators stay bounded.
pub const MAX_ARRAY_LEN: usize = 256;

/// One algorithm walkthrough, loaded from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Schema version for forward compatibility.
    #[validate(length(min = 1))]
    #[serde(default = "default_schema_version")]
    pub schema_version: String,

    /// Display name.
    #[serde(default)]
    pub name: String,

    /// Playback settings.
    #[validate(nested)]
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// Algorithm and parameters.
    pub algorithm: AlgorithmSpec,
}

fn default_schema_version() -> String {
    "1.0".to_string()
}

impl ScenarioConfig {
    /// Scenario with default playback settings.
    #[must_use]
    pub fn new(algorithm: AlgorithmSpec) -> Self {
        Self {
            schema_version: default_schema_version(),
            name: String::new(),
            playback: PlaybackConfig::default(),
            algorithm,
        }
    }

    /// Load a scenario from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> VizResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading scenario");
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse a scenario from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> VizResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        config.validate_semantic()?;
        Ok(config)
    }

    /// Serialize back to YAML.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_yaml(&self) -> VizResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Name to show, falling back to the algorithm name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            self.algorithm.name()
        } else {
            &self.name
        }
    }

    /// Validate constraints that the schema cannot express.
    fn validate_semantic(&self) -> VizResult<()> {
        if !self.schema_version.starts_with("1.") && self.schema_version != "1" {
            return Err(VizError::config(format!(
                "Unsupported schema version '{}', expected 1.x",
                self.schema_version
            )));
        }

        let array_len = self.algorithm.array().map_or(0, <[i64]>::len);
        if array_len > MAX_ARRAY_LEN {
            return Err(VizError::config(format!(
                "{} array has {array_len} values, at most {MAX_ARRAY_LEN} are supported",
                self.algorithm.name()
            )));
        }

        Ok(())
    }
}

/// Auto-advance settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct PlaybackConfig {
    /// Period between automatic steps, in milliseconds.
    #[validate(range(min = 50, max = 60_000))]
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Start playing as soon as the scenario is loaded.
    #[serde(default)]
    pub autoplay: bool,
}

const fn default_interval_ms() -> u64 {
    DEFAULT_INTERVAL_MS
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            autoplay: false,
        }
    }
}

impl PlaybackConfig {
    /// Create a builder for playback settings.
    #[must_use]
    pub fn builder() -> PlaybackConfigBuilder {
        PlaybackConfigBuilder::default()
    }

    /// Auto-advance period.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Builder for [`PlaybackConfig`].
#[derive(Debug, Default)]
pub struct PlaybackConfigBuilder {
    interval_ms: Option<u64>,
    autoplay: Option<bool>,
}

impl PlaybackConfigBuilder {
    /// Set the auto-advance period in milliseconds.
    #[must_use]
    pub const fn interval_ms(mut self, interval_ms: u64) -> Self {
        self.interval_ms = Some(interval_ms);
        self
    }

    /// Start playing immediately.
    #[must_use]
    pub const fn autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = Some(autoplay);
        self
    }

    /// Build the settings, clamping the interval into the accepted range.
    #[must_use]
    pub fn build(self) -> PlaybackConfig {
        let mut config = PlaybackConfig::default();

        if let Some(interval_ms) = self.interval_ms {
            config.interval_ms = interval_ms.clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS);
        }

        if let Some(autoplay) = self.autoplay {
            config.autoplay = autoplay;
        }

        config
    }
}
