//! Scenario 4: Bundle Export
//!
//! A tenant's evidence is exported as a deterministic, self-verifying ZIP
//! bundle: manifest, per-record evidence files, the windowed chain segment,
//! a full-chain verification report, the agent decision log, and a summary.
//!
//! Pipeline walk-through for the demo run:
//!   1. Four events captured for tenant org_123 (violation through decision)
//!   2. Bundle generated for a window covering the captures
//!   3. Bundle regenerated → byte-identical to the first export
//!   4. Archive written next to the system temp directory

use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;

use evidentia_bundle::{BundleExporter, BundleRequest};
use evidentia_chain::{ChainEngine, MemoryLedger};
use evidentia_contracts::{
    error::EvidentiaResult,
    evidence::{CaptureRequest, EventType, TenantId},
};
use evidentia_core::EvidenceStore;
use evidentia_validate::SectionValidator;

// ── Scenario runner ───────────────────────────────────────────────────────────

/// Run Scenario 4: Bundle Export.
///
/// Seeds four org_123 records, exports them twice to show reproducibility,
/// and writes the archive under the system temp directory.
pub fn run_scenario() -> EvidentiaResult<()> {
    println!("=== Scenario 4: Bundle Export ===");
    println!();

    // ── Wire up and seed the chain ────────────────────────────────────────────

    let ledger = Arc::new(MemoryLedger::new());
    let engine = Arc::new(ChainEngine::open(ledger.clone())?);
    let store = EvidenceStore::new(
        Box::new(SectionValidator::with_defaults()),
        engine.clone(),
        ledger.clone(),
    );

    let regulation = json!({"framework": "PCI-DSS", "version": "3.2.1", "clause": "Req 3.4"});
    let detection = json!({
        "detected_by": "pan_scanner",
        "detection_method": "pattern_match",
        "confidence": 0.94
    });

    store.capture(
        CaptureRequest::new(EventType::Violation, regulation.clone(), detection.clone())
            .with_tenant(TenantId::new("org_123"))
            .with_violation_state(json!({
                "before": {"masked": false},
                "after": {"masked": true}
            })),
    )?;
    store.capture(
        CaptureRequest::new(EventType::Remediation, regulation.clone(), detection.clone())
            .with_tenant(TenantId::new("org_123"))
            .with_remediation(json!({
                "agent_id": "masking-agent-01",
                "action_type": "mask_field"
            })),
    )?;
    store.capture(
        CaptureRequest::new(EventType::PolicyCheck, regulation.clone(), detection.clone())
            .with_tenant(TenantId::new("org_123")),
    )?;
    store.capture(
        CaptureRequest::new(EventType::AgentDecision, regulation, detection)
            .with_tenant(TenantId::new("org_123"))
            .with_reasoning_chain(json!({
                "steps": ["Violation remediated", "Policy re-checked", "Case closed"]
            })),
    )?;

    // ── Export twice and compare ──────────────────────────────────────────────

    let exporter = BundleExporter::new(engine.clone());
    let now = Utc::now();
    let request = BundleRequest::new(
        TenantId::new("org_123"),
        now - Duration::hours(1),
        now + Duration::hours(1),
    );

    let bytes = exporter.generate(&request)?;
    let again = exporter.generate(&request)?;

    println!("  Tenant:        org_123");
    println!("  Records:       4");
    println!("  Bundle size:   {} bytes", bytes.len());
    println!(
        "  Reproducible:  {}",
        if bytes == again { "byte-identical on re-export" } else { "MISMATCH" }
    );

    // ── Write the archive to disk ─────────────────────────────────────────────

    let path = std::env::temp_dir().join("evidentia_bundle_org_123.zip");
    exporter.generate_to_file(&request, &path)?;
    println!("  Written to:    {}", path.display());
    println!();
    println!("  Scenario 4 complete.");
    println!();

    Ok(())
}
