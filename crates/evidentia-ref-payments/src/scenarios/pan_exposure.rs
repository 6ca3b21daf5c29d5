//! Scenario 1: PAN Exposure (PCI DSS Requirement 3.4)
//!
//! A primary account number leaks into a payment-gateway log in cleartext.
//! The scanner finds it, the violation is captured with its before/after
//! masking states, and the masking remediation lands on the same chain
//! linked back to the violation.
//!
//! Pipeline walk-through for the demo run:
//!   1. Mock scanner sweeps the gateway log and Luhn-checks digit runs
//!   2. Violation captured: regulation PCI DSS Req 3.4, confidence 0.94
//!   3. Masking remediation captured, linked to the violation record
//!   4. Hash chain verified end to end

use std::sync::Arc;

use serde_json::{json, Value};

use evidentia_chain::{ChainEngine, MemoryLedger};
use evidentia_contracts::{
    error::EvidentiaResult,
    evidence::{CaptureRequest, EventType, TenantId},
};
use evidentia_core::{traits::AuditTrail, EvidenceStore};
use evidentia_validate::SectionValidator;

use crate::mock_data::{get_transaction_log, scan_for_pan};

// ── Scenario runner ───────────────────────────────────────────────────────────

/// Run Scenario 1: PAN Exposure.
///
/// Sweeps the mock gateway log for merchant `merch_4471`, captures the
/// violation and its remediation for tenant `org_123`, and verifies the
/// chain at the end.
pub fn run_scenario() -> EvidentiaResult<()> {
    println!("=== Scenario 1: PAN Exposure (PCI DSS Req 3.4) ===");
    println!();

    // ── Wire up the evidence components ───────────────────────────────────────

    let ledger = Arc::new(MemoryLedger::new());
    let engine = Arc::new(ChainEngine::open(ledger.clone())?);
    let store = EvidenceStore::new(
        Box::new(SectionValidator::with_defaults()),
        engine.clone(),
        ledger.clone(),
    );

    // ── Sweep the mock gateway log ────────────────────────────────────────────

    let log = get_transaction_log("merch_4471");
    let source = log["source"].as_str().unwrap_or("unknown").to_string();

    let mut detection = Value::Null;
    for line in log["lines"].as_array().cloned().unwrap_or_default() {
        let scan = scan_for_pan(&source, line.as_str().unwrap_or(""));
        if scan["confidence"].as_f64().unwrap_or(0.0) > 0.5 {
            detection = scan;
            break;
        }
    }

    println!("  Source:      {}", source);
    println!(
        "  Match:       {} digits, Luhn {}",
        detection["matched_digits"],
        if detection["luhn_valid"] == json!(true) { "PASS" } else { "FAIL" }
    );
    println!("  Confidence:  {}", detection["confidence"]);
    println!();

    // ── Capture the violation ─────────────────────────────────────────────────

    let violation = store.capture(
        CaptureRequest::new(
            EventType::Violation,
            json!({"framework": "PCI-DSS", "version": "3.2.1", "clause": "Req 3.4"}),
            detection.clone(),
        )
        .with_tenant(TenantId::new("org_123"))
        .with_violation_state(json!({
            "before": {"card_number": "4111 1111 1111 1111", "masked": false},
            "after": {"card_number": "**** **** **** 1111", "masked": true}
        }))
        .with_reasoning_chain(json!({
            "steps": [
                "Gateway log line contained a 16-digit sequence",
                "Digit run passed the Luhn check (confidence 0.94)",
                "PCI DSS Req 3.4 requires the PAN to be unreadable at rest",
                "The line was written without masking, which is a violation",
                "Masking remediation queued for the logging pipeline"
            ]
        })),
    )?;

    println!("  Violation captured:    {}", violation.evidence_id);

    // ── Capture the remediation, linked back ──────────────────────────────────

    let remediation = store.capture(
        CaptureRequest::new(
            EventType::Remediation,
            json!({"framework": "PCI-DSS", "version": "3.2.1", "clause": "Req 3.4"}),
            json!({
                "detected_by": "pan_scanner",
                "detection_method": "pattern_match",
                "confidence": 0.94
            }),
        )
        .with_tenant(TenantId::new("org_123"))
        .with_remediation(json!({
            "agent_id": "masking-agent-01",
            "action_type": "mask_field",
            "target": "payment-gateway.log"
        }))
        .with_linkages(json!({"remediates": violation.evidence_id.as_str()})),
    )?;

    println!("  Remediation captured:  {}", remediation.evidence_id);
    println!();

    // ── Show the linkage between the two nodes ────────────────────────────────

    let violation_node = store.node_for(&violation.evidence_id)?;
    let remediation_node = store.node_for(&remediation.evidence_id)?;

    println!(
        "  seq {}  node_hash      {}...",
        violation_node.sequence_number,
        &violation_node.node_hash[..16]
    );
    println!(
        "  seq {}  previous_hash  {}...  ({})",
        remediation_node.sequence_number,
        &remediation_node.previous_hash[..16],
        if remediation_node.previous_hash == violation_node.node_hash {
            "links to seq 0"
        } else {
            "LINK BROKEN"
        }
    );
    println!();

    // ── Verify chain integrity ────────────────────────────────────────────────

    let report = engine.verify()?;
    println!(
        "  Chain integrity:  {} ({} node(s) checked)",
        if report.valid { "VERIFIED" } else { "BROKEN" },
        report.nodes_checked
    );
    println!();
    println!("  Scenario 1 complete.");
    println!();

    Ok(())
}
