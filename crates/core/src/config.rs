//! Configuration system for the forwarding simulator.
//!
//! This module defines the configuration structures used to parameterize a run.
//! It provides:
//! 1. **Defaults:** Baseline window and policy constants (the `full` profile).
//! 2. **Profiles:** The two observed deployments (`full` and `compact`) as presets.
//! 3. **Structures:** Window geometry, admission policy and general run settings.
//! 4. **Validation:** Rejection of malformed configurations before any instruction is admitted.
//!
//! Configuration is supplied as JSON (CLI `--config`, Python dicts) and is
//! overlaid onto a profile, so a document only needs to name what it changes.

use serde::{Deserialize, Serialize};

use crate::common::error::ConfigError;

/// Default configuration constants (the `full` profile).
mod defaults {
    /// Window capacity in entries.
    pub const CAPACITY: usize = 256;

    /// Maximum operand count analyzed per instruction; also the number of ranked producers.
    pub const MAX_OPERANDS: usize = 3;

    /// Maximum simultaneous forwards out of one producer.
    pub const MAX_FORWARDS: usize = 3;

    /// A producer this close to the consumer forwards without relocation.
    pub const IMMINENT_DISTANCE: usize = 3;

    /// Number of slots after a producer searched for a free position.
    pub const LOOKAHEAD: usize = 3;

    /// Report file written at end of run.
    pub const OUTPUT: &str = "robscan.out";
}

/// Constants of the `compact` profile (small window, two-operand instructions).
mod compact {
    pub const CAPACITY: usize = 64;
    pub const MAX_OPERANDS: usize = 2;
    pub const MAX_FORWARDS: usize = 2;
    pub const IMMINENT_DISTANCE: usize = 1;
    pub const LOOKAHEAD: usize = 2;
}

/// Named configuration presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// 256-entry window, three operands/forwards, missed-forward tracking and backfill.
    #[default]
    Full,
    /// 64-entry window, two operands/forwards, binary/logical instructions only, no ratio in the report.
    Compact,
}

impl std::str::FromStr for Profile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "compact" => Ok(Self::Compact),
            other => Err(ConfigError::Parse(format!("unknown profile `{other}`"))),
        }
    }
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use robscan_core::config::{Config, Profile};
///
/// let config = Config::default();
/// assert_eq!(config.window.capacity, 256);
/// assert!(config.policy.backfill);
///
/// let compact = Config::for_profile(Profile::Compact);
/// assert_eq!(compact.window.capacity, 64);
/// assert!(compact.policy.restrict_categories);
/// ```
///
/// Overlaying a partial JSON document onto a profile:
///
/// ```
/// use robscan_core::config::{Config, Profile};
///
/// let base = Config::for_profile(Profile::Compact);
/// let config = base.overlay(r#"{ "policy": { "baseline": true } }"#).unwrap();
/// assert!(config.policy.baseline);
/// assert_eq!(config.window.capacity, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Config {
    /// General run settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Window geometry
    #[serde(default)]
    pub window: WindowConfig,
    /// Admission policy switches
    #[serde(default)]
    pub policy: PolicyConfig,
}

impl Config {
    /// Returns the preset configuration for `profile`.
    pub fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::Full => Self::default(),
            Profile::Compact => Self {
                general: GeneralConfig {
                    report_potential: false,
                    ..GeneralConfig::default()
                },
                window: WindowConfig {
                    capacity: compact::CAPACITY,
                    max_operands: compact::MAX_OPERANDS,
                    max_forwards: compact::MAX_FORWARDS,
                    imminent_distance: compact::IMMINENT_DISTANCE,
                    lookahead: compact::LOOKAHEAD,
                    extend_to_tail: true,
                },
                policy: PolicyConfig {
                    baseline: false,
                    track_missed: false,
                    backfill: false,
                    restrict_categories: true,
                },
            },
        }
    }

    /// Parses a complete configuration from JSON; omitted fields take `full` defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the document is not valid JSON for this schema.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Returns a copy of `self` with the fields present in `json` replaced.
    ///
    /// Objects are merged recursively; any other value replaces the base value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if `json` is not an object or does not fit the schema.
    pub fn overlay(&self, json: &str) -> Result<Self, ConfigError> {
        let patch: serde_json::Value =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if !patch.is_object() {
            return Err(ConfigError::Parse(
                "configuration overlay must be a JSON object".to_string(),
            ));
        }
        let mut base = serde_json::to_value(self).map_err(|e| ConfigError::Parse(e.to_string()))?;
        merge_json(&mut base, patch);
        serde_json::from_value(base).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Checks the configuration for values the simulator cannot run with.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.window;
        if w.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if w.max_operands == 0 {
            return Err(ConfigError::ZeroOperands);
        }
        if w.max_forwards == 0 {
            return Err(ConfigError::ZeroForwards);
        }
        if w.lookahead == 0 {
            return Err(ConfigError::ZeroLookahead);
        }
        if w.imminent_distance >= w.capacity {
            return Err(ConfigError::ImminentDistanceTooLarge {
                distance: w.imminent_distance,
                capacity: w.capacity,
            });
        }
        Ok(())
    }
}

fn merge_json(base: &mut serde_json::Value, patch: serde_json::Value) {
    match (base, patch) {
        (serde_json::Value::Object(base), serde_json::Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        let _ = base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

/// General run settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Path the end-of-run report is written to
    #[serde(default = "GeneralConfig::default_output")]
    pub output: String,

    /// Include the forwarding potential line in the report
    #[serde(default = "GeneralConfig::default_report_potential")]
    pub report_potential: bool,
}

impl GeneralConfig {
    /// Returns the default report path.
    fn default_output() -> String {
        defaults::OUTPUT.to_string()
    }

    /// Reports include the ratio unless disabled.
    const fn default_report_potential() -> bool {
        true
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            output: defaults::OUTPUT.to_string(),
            report_potential: true,
        }
    }
}

/// Window geometry and search distances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Maximum number of in-flight entries
    #[serde(default = "WindowConfig::default_capacity")]
    pub capacity: usize,

    /// Instructions with more operands bypass analysis; also the number of ranked producers
    #[serde(default = "WindowConfig::default_max_operands")]
    pub max_operands: usize,

    /// Maximum forwards out of a single producer
    #[serde(default = "WindowConfig::default_max_forwards")]
    pub max_forwards: usize,

    /// Producers at most this many slots before the consumer forward without relocation
    #[serde(default = "WindowConfig::default_imminent_distance")]
    pub imminent_distance: usize,

    /// Number of slots after a producer searched for a relocation target
    #[serde(default = "WindowConfig::default_lookahead")]
    pub lookahead: usize,

    /// Let the slot search continue past the lookahead up to the consumer
    #[serde(default)]
    pub extend_to_tail: bool,
}

impl WindowConfig {
    /// Returns the default window capacity.
    const fn default_capacity() -> usize {
        defaults::CAPACITY
    }

    /// Returns the default operand limit.
    const fn default_max_operands() -> usize {
        defaults::MAX_OPERANDS
    }

    /// Returns the default per-producer forward limit.
    const fn default_max_forwards() -> usize {
        defaults::MAX_FORWARDS
    }

    /// Returns the default imminent-forward distance.
    const fn default_imminent_distance() -> usize {
        defaults::IMMINENT_DISTANCE
    }

    /// Returns the default slot search distance.
    const fn default_lookahead() -> usize {
        defaults::LOOKAHEAD
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            capacity: defaults::CAPACITY,
            max_operands: defaults::MAX_OPERANDS,
            max_forwards: defaults::MAX_FORWARDS,
            imminent_distance: defaults::IMMINENT_DISTANCE,
            lookahead: defaults::LOOKAHEAD,
            extend_to_tail: false,
        }
    }
}

/// Admission policy switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Control condition: never relocate, only count forwards that need no reordering
    #[serde(default)]
    pub baseline: bool,

    /// Record missed forwards on producers
    #[serde(default = "PolicyConfig::default_enabled")]
    pub track_missed: bool,

    /// Pull idle producers next to an unforwarded consumer
    #[serde(default = "PolicyConfig::default_enabled")]
    pub backfill: bool,

    /// Only analyze binary-arithmetic and logical instructions
    #[serde(default)]
    pub restrict_categories: bool,
}

impl PolicyConfig {
    /// Full-profile switches default to on.
    const fn default_enabled() -> bool {
        true
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            baseline: false,
            track_missed: true,
            backfill: true,
            restrict_categories: false,
        }
    }
}
