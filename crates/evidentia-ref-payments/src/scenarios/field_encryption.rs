//! Scenario 2: Field Encryption (GDPR Art. 32)
//!
//! A customer profile stores its IBAN in plaintext. The field auditor flags
//! it, a remediation agent reasons its way to envelope encryption, and the
//! encryption outcome is captured. Three event types land on one chain and
//! each record is cross-referenced to the node that commits to it.
//!
//! Pipeline walk-through for the demo run:
//!   1. Field auditor scans the profile's encryption map → iban is "none"
//!   2. Detection captured: GDPR Art. 32(1)(a), confidence 1.0
//!   3. Agent decision captured with the five-step reasoning chain
//!   4. encrypt_field remediation captured with the KMS key id
//!   5. Every record cross-referenced to its chain node
//!   6. Tenant list and get round trip; chain verified

use std::sync::Arc;

use serde_json::json;

use evidentia_chain::{ChainEngine, MemoryLedger};
use evidentia_contracts::{
    error::EvidentiaResult,
    evidence::{CaptureRequest, EventType, TenantId},
    filter::EvidenceFilter,
};
use evidentia_core::{traits::AuditTrail, EvidenceStore};
use evidentia_validate::SectionValidator;

use crate::mock_data::{encrypt_profile_field, get_customer_profile};

// ── Scenario runner ───────────────────────────────────────────────────────────

/// Run Scenario 2: Field Encryption.
///
/// Walks customer `cust_8817` through detection, decision, and remediation
/// for tenant `org_123`.
pub fn run_scenario() -> EvidentiaResult<()> {
    println!("=== Scenario 2: Field Encryption (GDPR Art. 32) ===");
    println!();

    // ── Wire up the evidence components ───────────────────────────────────────

    let ledger = Arc::new(MemoryLedger::new());
    let engine = Arc::new(ChainEngine::open(ledger.clone())?);
    let store = EvidenceStore::new(
        Box::new(SectionValidator::with_defaults()),
        engine.clone(),
        ledger.clone(),
    );

    // ── Audit the mock profile ────────────────────────────────────────────────

    let profile = get_customer_profile("cust_8817");
    let iban_mode = profile["encryption"]["iban"].as_str().unwrap_or("unknown");

    println!("  Customer:         cust_8817");
    println!("  iban encryption:  {} (policy requires aes256-gcm)", iban_mode);
    println!();

    let regulation = json!({
        "framework": "GDPR",
        "version": "2016/679",
        "clause": "Art. 32(1)(a)"
    });
    let audit_finding = json!({
        "detected_by": "field_auditor",
        "detection_method": "schema_scan",
        "confidence": 1.0,
        "field": "iban",
        "encryption": iban_mode
    });

    // ── Capture detection, decision, remediation ──────────────────────────────

    let detection = store.capture(
        CaptureRequest::new(EventType::Detection, regulation.clone(), audit_finding.clone())
            .with_tenant(TenantId::new("org_123")),
    )?;

    let decision = store.capture(
        CaptureRequest::new(
            EventType::AgentDecision,
            regulation.clone(),
            audit_finding.clone(),
        )
        .with_tenant(TenantId::new("org_123"))
        .with_reasoning_chain(json!({
            "steps": [
                "Profile schema marks iban as personal data",
                "Art. 32(1)(a) calls for encryption of personal data at rest",
                "Stored encryption mode for iban is none",
                "Envelope encryption with the tenant key is available",
                "Decision: encrypt the field in place"
            ]
        }))
        .with_linkages(json!({"follows": detection.evidence_id.as_str()})),
    )?;

    let outcome = encrypt_profile_field("cust_8817", "iban");
    let remediation = store.capture(
        CaptureRequest::new(EventType::Remediation, regulation, audit_finding)
            .with_tenant(TenantId::new("org_123"))
            .with_remediation(json!({
                "agent_id": "encryption-agent-02",
                "action_type": "encrypt_field",
                "field": "iban",
                "key_id": outcome["key_id"].clone()
            }))
            .with_linkages(json!({
                "remediates": detection.evidence_id.as_str(),
                "decided_by": decision.evidence_id.as_str()
            })),
    )?;

    // ── Cross-reference records to chain nodes ────────────────────────────────

    for record in [&detection, &decision, &remediation] {
        let node = store.node_for(&record.evidence_id)?;
        println!(
            "  seq {}  {}  {}...",
            node.sequence_number,
            record.event_type,
            &node.node_hash[..12]
        );
    }
    println!();

    // ── List and get round trip ───────────────────────────────────────────────

    let listed = store.list(&EvidenceFilter::all().tenant(TenantId::new("org_123")))?;
    let fetched = store.get(&remediation.evidence_id)?;

    println!("  Listed for tenant:  {} record(s)", listed.len());
    println!(
        "  Get round trip:     {}",
        if fetched == remediation { "identical record" } else { "MISMATCH" }
    );

    let report = engine.verify()?;
    let agent_id = remediation
        .remediation
        .as_ref()
        .and_then(|r| r["agent_id"].as_str())
        .unwrap_or("?");
    println!("  Remediation agent:  {}", agent_id);
    println!(
        "  Chain integrity:    {} ({} node(s) checked)",
        if report.valid { "VERIFIED" } else { "BROKEN" },
        report.nodes_checked
    );
    println!();
    println!("  Scenario 2 complete.");
    println!();

    Ok(())
}
