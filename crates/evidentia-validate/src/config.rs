//! Capture requirement configuration schema.
//!
//! A `RequirementsConfig` is deserialized from TOML and holds, per event
//! type, the payload sections a capture request must carry, plus numeric
//! limits for the semantic checks. Configuration problems surface at load
//! time — a config that parses is complete and internally consistent, so
//! capture-time validation never hits a missing table.

use serde::{Deserialize, Serialize};
use std::path::Path;

use evidentia_contracts::{
    error::{EvidentiaError, EvidentiaResult},
    evidence::{CaptureRequest, EventType},
};

/// The built-in requirements shipped with the crate.
const DEFAULT_REQUIREMENTS: &str = include_str!("requirements.toml");

/// Required payload sections for one event type.
///
/// Example in TOML:
/// ```toml
/// [[event_types]]
/// event_type = "violation"
/// required_sections = ["regulation", "detection", "violation_state"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRequirement {
    /// The snake_case event type name this entry applies to.
    pub event_type: String,

    /// Section names that must be present and non-empty on a capture.
    pub required_sections: Vec<String>,
}

/// Numeric bounds for the semantic checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Limits {
    /// Lowest acceptable `detection.confidence`, inclusive.
    #[serde(default)]
    pub confidence_min: f64,

    /// Highest acceptable `detection.confidence`, inclusive.
    #[serde(default = "default_confidence_max")]
    pub confidence_max: f64,
}

fn default_confidence_max() -> f64 {
    1.0
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            confidence_min: 0.0,
            confidence_max: 1.0,
        }
    }
}

/// The top-level structure deserialized from a TOML requirements file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementsConfig {
    /// One entry per event type. Every known event type must be covered.
    pub event_types: Vec<EventRequirement>,

    /// Numeric limits. Defaults to confidence in [0, 1].
    #[serde(default)]
    pub limits: Limits,
}

impl RequirementsConfig {
    /// Parse `s` as TOML and check it for completeness.
    ///
    /// # Errors
    ///
    /// `Config` when the TOML is malformed, names an unknown event type or
    /// section, omits a known event type, or carries inverted limits.
    pub fn from_toml_str(s: &str) -> EvidentiaResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| EvidentiaError::Config {
            reason: format!("failed to parse requirements TOML: {}", e),
        })?;
        config.check()?;
        Ok(config)
    }

    /// Read the file at `path` and parse it as requirements configuration.
    ///
    /// # Errors
    ///
    /// `Config` when the file cannot be read or its contents fail
    /// `from_toml_str`.
    pub fn from_file(path: &Path) -> EvidentiaResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| EvidentiaError::Config {
            reason: format!("failed to read requirements file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// The required section names for one event type.
    ///
    /// Always `Some` for a config that passed `check()`.
    pub fn required_sections(&self, event_type: EventType) -> Option<&[String]> {
        self.event_types
            .iter()
            .find(|e| e.event_type == event_type.as_str())
            .map(|e| e.required_sections.as_slice())
    }

    /// Every name in the config must be known, every event type covered,
    /// and the limits ordered.
    fn check(&self) -> EvidentiaResult<()> {
        for entry in &self.event_types {
            let known = EventType::ALL
                .iter()
                .any(|t| t.as_str() == entry.event_type);
            if !known {
                return Err(EvidentiaError::Config {
                    reason: format!("unknown event type '{}' in requirements", entry.event_type),
                });
            }

            for section in &entry.required_sections {
                if !CaptureRequest::SECTION_NAMES.contains(&section.as_str()) {
                    return Err(EvidentiaError::Config {
                        reason: format!(
                            "unknown section '{}' required for event type '{}'",
                            section, entry.event_type
                        ),
                    });
                }
            }
        }

        for event_type in EventType::ALL {
            if self.required_sections(event_type).is_none() {
                return Err(EvidentiaError::Config {
                    reason: format!(
                        "requirements missing an entry for event type '{}'",
                        event_type
                    ),
                });
            }
        }

        if self.limits.confidence_min > self.limits.confidence_max {
            return Err(EvidentiaError::Config {
                reason: format!(
                    "confidence_min {} exceeds confidence_max {}",
                    self.limits.confidence_min, self.limits.confidence_max
                ),
            });
        }

        Ok(())
    }
}

impl Default for RequirementsConfig {
    /// The built-in requirements embedded at compile time.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML fails to parse — which cannot happen for
    /// the file shipped with the crate.
    fn default() -> Self {
        Self::from_toml_str(DEFAULT_REQUIREMENTS)
            .expect("embedded requirements.toml must be valid")
    }
}
