//! Structural schemas for the evidence payload sections.
//!
//! Each schema pins down the minimum shape an auditor needs from a section:
//! the identifying fields must exist and carry the right type. Everything
//! beyond the listed properties is allowed — capture payloads routinely
//! carry detector-specific extras.
//!
//! `linkages` and `metadata` deliberately have no schema: they are
//! free-form by contract.

use serde_json::{json, Value};

/// The section schemas as (section name, JSON Schema document) pairs.
///
/// Compiled once at validator construction; the documents never change at
/// runtime.
pub fn section_schemas() -> Vec<(&'static str, Value)> {
    vec![
        (
            "regulation",
            json!({
                "type": "object",
                "properties": {
                    "framework": { "type": "string", "minLength": 1 },
                    "clause": { "type": "string", "minLength": 1 },
                    "version": { "type": "string" }
                },
                "required": ["framework", "clause"]
            }),
        ),
        (
            "detection",
            json!({
                "type": "object",
                "properties": {
                    "detected_by": { "type": "string", "minLength": 1 },
                    "detection_method": { "type": "string", "minLength": 1 },
                    "confidence": { "type": "number" }
                },
                "required": ["detected_by", "detection_method"]
            }),
        ),
        (
            "violation_state",
            json!({
                "type": "object",
                "properties": {
                    "before": { "type": "object" },
                    "after": { "type": "object" }
                },
                "required": ["before", "after"]
            }),
        ),
        (
            "remediation",
            json!({
                "type": "object",
                "properties": {
                    "agent_id": { "type": "string", "minLength": 1 },
                    "action_type": { "type": "string", "minLength": 1 },
                    "executed_at": { "type": "string" }
                },
                "required": ["agent_id", "action_type"]
            }),
        ),
        (
            "reasoning_chain",
            json!({
                "type": "object",
                "properties": {
                    "steps": {
                        "type": "array",
                        "items": { "type": "string" },
                        "minItems": 1
                    }
                },
                "required": ["steps"]
            }),
        ),
    ]
}
