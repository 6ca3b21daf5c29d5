//! # evidentia-validate
//!
//! TOML-driven capture validation for the Evidentia evidence ledger.
//!
//! ## Overview
//!
//! This crate provides [`SectionValidator`], which implements the
//! [`CaptureValidator`](evidentia_core::traits::CaptureValidator) trait.
//! Which payload sections a capture must carry is declared per event type
//! in a TOML requirements file; the shape of each section is pinned by
//! compiled JSON Schemas; numeric limits (confidence bounds) are checked
//! semantically. Every problem across all three phases is reported in one
//! `Validation` error.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use evidentia_validate::SectionValidator;
//! use evidentia_core::traits::CaptureValidator;
//!
//! let validator = SectionValidator::with_defaults();
//! validator.validate(&request)?;
//! ```
//!
//! ## Configuration
//!
//! The built-in requirements cover the five event types; deployments with
//! different section policies load their own file via
//! `RequirementsConfig::from_file`. A config must cover every event type —
//! gaps are a load-time error, never a capture-time surprise.

pub mod config;
pub mod schema;
pub mod validator;

pub use config::{EventRequirement, Limits, RequirementsConfig};
pub use validator::SectionValidator;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use evidentia_contracts::{
        error::EvidentiaError,
        evidence::{CaptureRequest, EventType},
    };
    use evidentia_core::traits::CaptureValidator;

    use crate::{RequirementsConfig, SectionValidator};

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// A fully populated violation request that passes the default rules.
    fn valid_violation() -> CaptureRequest {
        CaptureRequest::new(
            EventType::Violation,
            json!({ "framework": "PCI-DSS", "version": "3.2.1", "clause": "3.4" }),
            json!({
                "detected_by": "pan_scanner",
                "detection_method": "pattern_match",
                "confidence": 0.94,
            }),
        )
        .with_violation_state(json!({
            "before": { "field": "card_number", "masked": false },
            "after": { "field": "card_number", "masked": true },
        }))
    }

    fn valid_remediation() -> CaptureRequest {
        CaptureRequest::new(
            EventType::Remediation,
            json!({ "framework": "GDPR", "clause": "Art. 32" }),
            json!({ "detected_by": "field_auditor", "detection_method": "config_scan" }),
        )
        .with_remediation(json!({
            "agent_id": "remediation-agent-01",
            "action_type": "encrypt_field",
        }))
    }

    // ── 1. valid captures pass ────────────────────────────────────────────────

    #[test]
    fn test_valid_violation_passes() {
        let validator = SectionValidator::with_defaults();
        let result = validator.validate(&valid_violation());
        assert!(result.is_ok(), "expected pass, got {:?}", result);
    }

    #[test]
    fn test_valid_remediation_passes() {
        let validator = SectionValidator::with_defaults();
        let result = validator.validate(&valid_remediation());
        assert!(result.is_ok(), "expected pass, got {:?}", result);
    }

    // ── 2. required-section presence ──────────────────────────────────────────

    /// A violation without violation_state is rejected and the message
    /// names the missing section.
    #[test]
    fn test_missing_required_section() {
        let validator = SectionValidator::with_defaults();

        let mut request = valid_violation();
        request.violation_state = None;

        match validator.validate(&request) {
            Err(EvidentiaError::Validation { reason }) => {
                assert!(
                    reason.contains("violation_state"),
                    "reason should name the missing section: {reason}"
                );
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    /// An empty required section counts as a problem distinct from absence.
    #[test]
    fn test_empty_required_section() {
        let validator = SectionValidator::with_defaults();

        let mut request = valid_violation();
        request.regulation = json!({});

        match validator.validate(&request) {
            Err(EvidentiaError::Validation { reason }) => {
                assert!(
                    reason.contains("'regulation' is empty"),
                    "unexpected reason: {reason}"
                );
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    // ── 3. all problems reported together ─────────────────────────────────────

    /// Multiple independent problems must all appear in one rejection.
    #[test]
    fn test_all_problems_collected() {
        let validator = SectionValidator::with_defaults();

        let mut request = valid_violation();
        request.violation_state = None;
        request.detection = json!({
            "detected_by": "pan_scanner",
            "detection_method": "pattern_match",
            "confidence": 1.5,
        });

        match validator.validate(&request) {
            Err(EvidentiaError::Validation { reason }) => {
                assert!(
                    reason.contains("violation_state"),
                    "missing section not reported: {reason}"
                );
                assert!(
                    reason.contains("confidence"),
                    "confidence bound not reported: {reason}"
                );
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    // ── 4. structural schema checks ───────────────────────────────────────────

    /// A regulation section without a clause fails the compiled schema.
    #[test]
    fn test_regulation_schema_violation() {
        let validator = SectionValidator::with_defaults();

        let mut request = valid_violation();
        request.regulation = json!({ "framework": "PCI-DSS" });

        match validator.validate(&request) {
            Err(EvidentiaError::Validation { reason }) => {
                assert!(
                    reason.contains("section 'regulation'"),
                    "reason should name the section: {reason}"
                );
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    /// Optional sections are schema-checked whenever they are present,
    /// even when the event type does not require them.
    #[test]
    fn test_present_optional_section_is_checked() {
        let validator = SectionValidator::with_defaults();

        // Detection events do not require remediation, but a malformed one
        // still fails.
        let request = CaptureRequest::new(
            EventType::Detection,
            json!({ "framework": "PCI-DSS", "clause": "3.4" }),
            json!({ "detected_by": "scanner", "detection_method": "scan" }),
        )
        .with_remediation(json!({ "agent_id": "a-1" }));

        match validator.validate(&request) {
            Err(EvidentiaError::Validation { reason }) => {
                assert!(
                    reason.contains("section 'remediation'"),
                    "unexpected reason: {reason}"
                );
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    /// Extra fields beyond the schema's properties are allowed.
    #[test]
    fn test_extra_fields_allowed() {
        let validator = SectionValidator::with_defaults();

        let mut request = valid_violation();
        request.detection = json!({
            "detected_by": "pan_scanner",
            "detection_method": "pattern_match",
            "scanner_version": "4.2.1",
            "scan_duration_ms": 144,
        });

        assert!(validator.validate(&request).is_ok());
    }

    // ── 5. confidence bounds ──────────────────────────────────────────────────

    #[test]
    fn test_confidence_above_one_rejected() {
        let validator = SectionValidator::with_defaults();

        let mut request = valid_violation();
        request.detection["confidence"] = json!(1.01);

        match validator.validate(&request) {
            Err(EvidentiaError::Validation { reason }) => {
                assert!(reason.contains("outside"), "unexpected reason: {reason}");
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_confidence_below_zero_rejected() {
        let validator = SectionValidator::with_defaults();

        let mut request = valid_violation();
        request.detection["confidence"] = json!(-0.1);

        assert!(matches!(
            validator.validate(&request),
            Err(EvidentiaError::Validation { .. })
        ));
    }

    /// The bounds are inclusive: exactly 0 and exactly 1 both pass.
    #[test]
    fn test_confidence_bounds_inclusive() {
        let validator = SectionValidator::with_defaults();

        let mut request = valid_violation();
        request.detection["confidence"] = json!(0.0);
        assert!(validator.validate(&request).is_ok());

        request.detection["confidence"] = json!(1.0);
        assert!(validator.validate(&request).is_ok());
    }

    /// A non-numeric confidence is rejected by the detection schema.
    #[test]
    fn test_confidence_must_be_number() {
        let validator = SectionValidator::with_defaults();

        let mut request = valid_violation();
        request.detection["confidence"] = json!("high");

        match validator.validate(&request) {
            Err(EvidentiaError::Validation { reason }) => {
                assert!(
                    reason.contains("confidence"),
                    "unexpected reason: {reason}"
                );
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    // ── 6. configuration loading ──────────────────────────────────────────────

    /// Malformed TOML must produce a Config error.
    #[test]
    fn test_toml_parse_error() {
        let bad_toml = r#"
            this is not valid toml ][[[
        "#;

        match RequirementsConfig::from_toml_str(bad_toml) {
            Err(EvidentiaError::Config { reason }) => {
                assert!(
                    reason.contains("failed to parse requirements TOML"),
                    "expected parse error message, got: {reason}"
                );
            }
            other => panic!("expected Config, got {:?}", other),
        }
    }

    /// A config that omits an event type fails at load time.
    #[test]
    fn test_incomplete_config_rejected() {
        let toml = r#"
            [[event_types]]
            event_type = "violation"
            required_sections = ["regulation", "detection"]
        "#;

        match RequirementsConfig::from_toml_str(toml) {
            Err(EvidentiaError::Config { reason }) => {
                assert!(
                    reason.contains("missing an entry"),
                    "unexpected reason: {reason}"
                );
            }
            other => panic!("expected Config, got {:?}", other),
        }
    }

    /// Unknown event types and unknown section names fail at load time.
    #[test]
    fn test_unknown_names_rejected() {
        let unknown_type = r#"
            [[event_types]]
            event_type = "data_breach"
            required_sections = ["regulation"]
        "#;
        assert!(matches!(
            RequirementsConfig::from_toml_str(unknown_type),
            Err(EvidentiaError::Config { .. })
        ));

        let unknown_section = r#"
            [[event_types]]
            event_type = "violation"
            required_sections = ["regulation", "attachments"]
        "#;
        match RequirementsConfig::from_toml_str(unknown_section) {
            Err(EvidentiaError::Config { reason }) => {
                assert!(
                    reason.contains("attachments"),
                    "unexpected reason: {reason}"
                );
            }
            other => panic!("expected Config, got {:?}", other),
        }
    }

    /// Custom limits override the built-in confidence bounds.
    #[test]
    fn test_custom_limits() {
        let toml = r#"
            [[event_types]]
            event_type = "violation"
            required_sections = ["regulation", "detection", "violation_state"]

            [[event_types]]
            event_type = "remediation"
            required_sections = ["regulation", "detection", "remediation"]

            [[event_types]]
            event_type = "detection"
            required_sections = ["regulation", "detection"]

            [[event_types]]
            event_type = "policy_check"
            required_sections = ["regulation", "detection"]

            [[event_types]]
            event_type = "agent_decision"
            required_sections = ["regulation", "detection"]

            [limits]
            confidence_min = 0.5
            confidence_max = 0.9
        "#;

        let config = RequirementsConfig::from_toml_str(toml).unwrap();
        let validator = SectionValidator::new(config).unwrap();

        let mut request = valid_violation();
        request.detection["confidence"] = json!(0.94);
        assert!(
            matches!(
                validator.validate(&request),
                Err(EvidentiaError::Validation { .. })
            ),
            "0.94 must be rejected when confidence_max is 0.9"
        );

        request.detection["confidence"] = json!(0.7);
        assert!(validator.validate(&request).is_ok());
    }

    /// Inverted limits fail at load time.
    #[test]
    fn test_inverted_limits_rejected() {
        let toml = r#"
            [[event_types]]
            event_type = "violation"
            required_sections = ["regulation"]

            [[event_types]]
            event_type = "remediation"
            required_sections = ["regulation"]

            [[event_types]]
            event_type = "detection"
            required_sections = ["regulation"]

            [[event_types]]
            event_type = "policy_check"
            required_sections = ["regulation"]

            [[event_types]]
            event_type = "agent_decision"
            required_sections = ["regulation"]

            [limits]
            confidence_min = 0.9
            confidence_max = 0.1
        "#;

        match RequirementsConfig::from_toml_str(toml) {
            Err(EvidentiaError::Config { reason }) => {
                assert!(reason.contains("exceeds"), "unexpected reason: {reason}");
            }
            other => panic!("expected Config, got {:?}", other),
        }
    }

    /// The built-in config covers every event type.
    #[test]
    fn test_default_config_complete() {
        let config = RequirementsConfig::default();
        for event_type in EventType::ALL {
            let sections = config
                .required_sections(event_type)
                .unwrap_or_else(|| panic!("no entry for {event_type}"));
            assert!(
                sections.iter().any(|s| s == "regulation"),
                "{event_type} must require regulation"
            );
            assert!(
                sections.iter().any(|s| s == "detection"),
                "{event_type} must require detection"
            );
        }
    }
}
