//! The capture validator implementation.
//!
//! `SectionValidator` implements the `CaptureValidator` trait from
//! `evidentia-core`. Validation runs in three phases:
//!
//! 1. **Presence** — every section the config requires for the request's
//!    event type must be present and non-empty.
//! 2. **Structural** — every present section with a compiled schema is
//!    validated against it using the `jsonschema` crate.
//! 3. **Semantic** — `detection.confidence`, when present, must be a number
//!    within the configured bounds.
//!
//! All failures across all phases are collected before returning so callers
//! see the full problem set in one pass, never one problem at a time.

use std::collections::HashMap;

use tracing::{debug, warn};

use evidentia_contracts::{
    error::{EvidentiaError, EvidentiaResult},
    evidence::CaptureRequest,
};
use evidentia_core::traits::CaptureValidator;

use crate::{config::RequirementsConfig, schema::section_schemas};

/// The Evidentia capture validator.
///
/// Holds the requirements config and one compiled JSON Schema validator per
/// section. Construct once at startup and share; validation itself takes no
/// locks and allocates only for failure messages.
pub struct SectionValidator {
    config: RequirementsConfig,
    schemas: HashMap<&'static str, jsonschema::Validator>,
}

impl SectionValidator {
    /// Build a validator over the given requirements.
    ///
    /// Compiles every section schema up front so capture-time validation
    /// never pays compilation cost.
    ///
    /// # Errors
    ///
    /// `Config` when a section schema fails to compile — which cannot
    /// happen for the documents shipped with the crate.
    pub fn new(config: RequirementsConfig) -> EvidentiaResult<Self> {
        let mut schemas = HashMap::new();
        for (section, document) in section_schemas() {
            let validator =
                jsonschema::validator_for(&document).map_err(|e| EvidentiaError::Config {
                    reason: format!("invalid schema for section '{}': {}", section, e),
                })?;
            schemas.insert(section, validator);
        }
        Ok(Self { config, schemas })
    }

    /// A validator over the built-in requirements.
    ///
    /// # Panics
    ///
    /// Panics if the embedded config or schemas are invalid — which cannot
    /// happen for the documents shipped with the crate.
    pub fn with_defaults() -> Self {
        Self::new(RequirementsConfig::default())
            .expect("built-in section schemas must compile")
    }
}

impl CaptureValidator for SectionValidator {
    /// Check a capture request against the configured requirements.
    ///
    /// Runs presence, structural, and semantic checks in order, collecting
    /// every problem. Returns `Validation` with all problems joined by `"; "`
    /// when any phase found one.
    fn validate(&self, request: &CaptureRequest) -> EvidentiaResult<()> {
        let mut problems: Vec<String> = Vec::new();

        debug!(event_type = %request.event_type, "validating capture request");

        // ── Phase 1: required-section presence ────────────────────────────────
        match self.config.required_sections(request.event_type) {
            Some(required) => {
                for section in required {
                    match request.section(section) {
                        None => {
                            problems
                                .push(format!("required section '{}' is missing", section));
                        }
                        Some(value) if value.is_null() => {
                            problems
                                .push(format!("required section '{}' is missing", section));
                        }
                        Some(value) => {
                            if value.as_object().map_or(false, |m| m.is_empty()) {
                                problems
                                    .push(format!("required section '{}' is empty", section));
                            }
                        }
                    }
                }
            }
            None => {
                // Unreachable for a config that passed its load-time check.
                problems.push(format!(
                    "no requirements configured for event type '{}'",
                    request.event_type
                ));
            }
        }

        // ── Phase 2: structural schema validation per present section ────────
        //
        // Sections without a compiled schema (linkages, metadata) are
        // free-form and skip this phase.
        for name in CaptureRequest::SECTION_NAMES {
            let value = match request.section(name) {
                Some(v) if !v.is_null() => v,
                _ => continue,
            };
            if let Some(validator) = self.schemas.get(name) {
                for error in validator.iter_errors(value) {
                    problems.push(format!(
                        "section '{}': schema violation at {}: {}",
                        name, error.instance_path, error
                    ));
                }
            }
        }

        // ── Phase 3: semantic checks ──────────────────────────────────────────
        if let Some(confidence) = request.detection.get("confidence") {
            if !confidence.is_null() {
                match confidence.as_f64() {
                    Some(c)
                        if c < self.config.limits.confidence_min
                            || c > self.config.limits.confidence_max =>
                    {
                        problems.push(format!(
                            "detection.confidence {} is outside [{}, {}]",
                            c,
                            self.config.limits.confidence_min,
                            self.config.limits.confidence_max
                        ));
                    }
                    Some(_) => {}
                    None => {
                        problems.push("detection.confidence must be a number".to_string());
                    }
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            warn!(
                event_type = %request.event_type,
                problem_count = problems.len(),
                "capture request rejected"
            );
            Err(EvidentiaError::Validation {
                reason: problems.join("; "),
            })
        }
    }
}
