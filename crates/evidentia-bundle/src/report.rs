//! Human-readable and line-oriented renderings for bundle entries.
//!
//! Everything here is a pure string builder over already-computed inputs.
//! None of the renderings include a generation timestamp: the same inputs
//! always produce the same bytes.

use std::fmt::Write;

use evidentia_contracts::{
    chain::VerificationReport,
    error::{EvidentiaError, EvidentiaResult},
    evidence::{EvidenceRecord, EventType},
};

use crate::exporter::BundleRequest;

/// Render `AUDIT_TRAIL/chain_verification_report.txt`.
///
/// One status line, the node count, then one block per break with the
/// conflicting hash pair.
pub fn render_verification_text(report: &VerificationReport) -> String {
    let mut out = String::new();
    out.push_str("CHAIN VERIFICATION REPORT\n");
    out.push_str("=========================\n\n");

    let status = if report.valid { "VALID" } else { "BROKEN" };
    let _ = writeln!(out, "Status:        {}", status);
    let _ = writeln!(out, "Nodes checked: {}", report.nodes_checked);
    let _ = writeln!(out, "Breaks found:  {}", report.breaks.len());

    if !report.breaks.is_empty() {
        out.push('\n');
        for b in &report.breaks {
            let _ = writeln!(
                out,
                "[seq {}] {} evidence={}",
                b.sequence_number, b.kind, b.evidence_id
            );
            let _ = writeln!(out, "    expected: {}", b.expected);
            let _ = writeln!(out, "    actual:   {}", b.actual);
        }
    }

    out
}

/// Render `DECISION_LOGS/agent_decisions.jsonl`.
///
/// One compact JSON object per record in capture order: the identifying
/// fields an auditor cross-references first, extracted from the structured
/// payload. Records are not narrated, only extracted.
pub fn render_decision_log(records: &[EvidenceRecord]) -> EvidentiaResult<String> {
    let mut out = String::new();
    for record in records {
        let entry = serde_json::json!({
            "evidence_id": record.evidence_id,
            "captured_at": record.captured_at,
            "event_type": record.event_type,
            "clause": record.regulation.get("clause").cloned()
                .unwrap_or(serde_json::Value::Null),
            "detected_by": record.detection.get("detected_by").cloned()
                .unwrap_or(serde_json::Value::Null),
            "action_type": record.remediation.as_ref()
                .and_then(|r| r.get("action_type")).cloned()
                .unwrap_or(serde_json::Value::Null),
        });
        let line = serde_json::to_string(&entry).map_err(|e| EvidentiaError::Bundle {
            reason: format!("failed to serialize decision log entry: {}", e),
        })?;
        out.push_str(&line);
        out.push('\n');
    }
    Ok(out)
}

/// Render `SUMMARY.md`.
///
/// Counts and chain state only; the prose an executive summary would add
/// is out of scope for the exporter.
pub fn render_summary(
    request: &BundleRequest,
    records: &[EvidenceRecord],
    total_nodes: u64,
    tail_hash: &str,
    report: &VerificationReport,
) -> String {
    let mut out = String::new();
    out.push_str("# Compliance Evidence Bundle\n\n");
    let _ = writeln!(out, "- Tenant: {}", request.tenant);
    let _ = writeln!(
        out,
        "- Window: {} to {} (inclusive)",
        request.start.to_rfc3339(),
        request.end.to_rfc3339()
    );
    let _ = writeln!(out, "- Evidence records: {}", records.len());

    out.push_str("\n## Event breakdown\n\n");
    for event_type in EventType::ALL {
        let count = records.iter().filter(|r| r.event_type == event_type).count();
        let _ = writeln!(out, "- {}: {}", event_type, count);
    }

    out.push_str("\n## Chain\n\n");
    let _ = writeln!(out, "- Nodes in chain: {}", total_nodes);
    let _ = writeln!(out, "- Tail hash: `{}`", tail_hash);
    let status = if report.valid { "VALID" } else { "BROKEN" };
    let _ = writeln!(
        out,
        "- Verification: {} ({} breaks)",
        status,
        report.breaks.len()
    );

    out
}
