//! Bundle assembly and export.
//!
//! `build_bundle` is the pure core: snapshot in, archive bytes out. Two
//! calls over the same snapshot and request produce byte-identical output —
//! entries are Stored (no compression state to vary), entry timestamps are
//! pinned to the DOS epoch, the entry order is fixed, and nothing in any
//! entry reads the wall clock. `BundleExporter` is the thin stateful front
//! that snapshots a live trail first.

use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

use evidentia_contracts::{
    chain::{ChainNode, LedgerSnapshot},
    error::{EvidentiaError, EvidentiaResult},
    evidence::{EvidenceRecord, TenantId},
    filter::EvidenceFilter,
};
use evidentia_core::traits::AuditTrail;

use evidentia_chain::verify_chain;

use crate::manifest::BundleManifest;
use crate::report::{render_decision_log, render_summary, render_verification_text};

/// What to export: one tenant's evidence inside an inclusive capture-time
/// window.
#[derive(Debug, Clone, PartialEq)]
pub struct BundleRequest {
    /// Tenant whose records the bundle collects.
    pub tenant: TenantId,

    /// Earliest `captured_at` to include.
    pub start: DateTime<Utc>,

    /// Latest `captured_at` to include.
    pub end: DateTime<Utc>,
}

impl BundleRequest {
    /// Build a request for the given tenant and window.
    pub fn new(tenant: TenantId, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { tenant, start, end }
    }
}

/// Build the archive bytes from a snapshot.
///
/// # Archive layout
///
/// Entries are written in this exact order:
///
/// 1. `MANIFEST.json`
/// 2. `EVIDENCE/evidence_{id}.json` — one per windowed record, capture order
/// 3. `EVIDENCE/evidence_index.json`
/// 4. `AUDIT_TRAIL/hash_chain.json` — nodes inside the time window
/// 5. `AUDIT_TRAIL/verification_report.json` — full-chain walk result
/// 6. `AUDIT_TRAIL/chain_verification_report.txt`
/// 7. `DECISION_LOGS/agent_decisions.jsonl`
/// 8. `SUMMARY.md`
///
/// Verification always covers the FULL chain, not just the window: a break
/// anywhere in the ledger belongs in every bundle cut from it.
///
/// # Errors
///
/// `EmptyRange` when no record matches the tenant and window — an empty
/// window never yields a misleading archive. `Bundle` when serialization or
/// archive writing fails.
pub fn build_bundle(
    snapshot: &LedgerSnapshot,
    request: &BundleRequest,
) -> EvidentiaResult<Vec<u8>> {
    let filter = EvidenceFilter::all()
        .from(request.start)
        .to(request.end)
        .tenant(request.tenant.clone());

    let records: Vec<EvidenceRecord> = snapshot
        .records
        .iter()
        .filter(|r| filter.matches_record(r))
        .cloned()
        .collect();

    if records.is_empty() {
        return Err(EvidentiaError::EmptyRange {
            tenant: request.tenant.as_str().to_string(),
            start: request.start,
            end: request.end,
        });
    }

    let nodes: Vec<ChainNode> = snapshot
        .nodes
        .iter()
        .filter(|n| filter.matches_node(n))
        .cloned()
        .collect();

    let report = verify_chain(snapshot);
    let manifest = BundleManifest::build(snapshot, request, &records, &report);

    debug!(
        tenant = %request.tenant,
        evidence_count = records.len(),
        windowed_nodes = nodes.len(),
        chain_valid = report.valid,
        "assembling bundle"
    );

    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Stored)
        .last_modified_time(zip::DateTime::default());

    let mut archive = ZipWriter::new(Cursor::new(Vec::new()));

    add_entry(&mut archive, options, "MANIFEST.json", &pretty(&manifest)?)?;

    for record in &records {
        let name = format!("EVIDENCE/evidence_{}.json", record.evidence_id);
        add_entry(&mut archive, options, &name, &pretty(record)?)?;
    }

    let index: Vec<&str> = records.iter().map(|r| r.evidence_id.as_str()).collect();
    add_entry(
        &mut archive,
        options,
        "EVIDENCE/evidence_index.json",
        &pretty(&index)?,
    )?;

    add_entry(
        &mut archive,
        options,
        "AUDIT_TRAIL/hash_chain.json",
        &pretty(&nodes)?,
    )?;
    add_entry(
        &mut archive,
        options,
        "AUDIT_TRAIL/verification_report.json",
        &pretty(&report)?,
    )?;
    add_entry(
        &mut archive,
        options,
        "AUDIT_TRAIL/chain_verification_report.txt",
        render_verification_text(&report).as_bytes(),
    )?;

    add_entry(
        &mut archive,
        options,
        "DECISION_LOGS/agent_decisions.jsonl",
        render_decision_log(&records)?.as_bytes(),
    )?;

    let summary = render_summary(
        request,
        &records,
        manifest.chain.total_nodes,
        &manifest.chain.tail_hash,
        &report,
    );
    add_entry(&mut archive, options, "SUMMARY.md", summary.as_bytes())?;

    let cursor = archive.finish().map_err(|e| EvidentiaError::Bundle {
        reason: format!("failed to finish archive: {}", e),
    })?;
    Ok(cursor.into_inner())
}

/// The bundle export front over a live trail.
pub struct BundleExporter {
    trail: Arc<dyn AuditTrail>,
}

impl BundleExporter {
    /// Create an exporter over the given trail.
    pub fn new(trail: Arc<dyn AuditTrail>) -> Self {
        Self { trail }
    }

    /// Snapshot the trail and build the archive.
    ///
    /// One snapshot feeds everything, so evidence, chain, and verification
    /// inside the bundle always agree even while appends continue.
    pub fn generate(&self, request: &BundleRequest) -> EvidentiaResult<Vec<u8>> {
        let snapshot = self.trail.snapshot()?;
        let bytes = build_bundle(&snapshot, request)?;

        info!(
            tenant = %request.tenant,
            size_bytes = bytes.len(),
            "bundle generated"
        );

        Ok(bytes)
    }

    /// Generate and write the archive to `path`.
    ///
    /// # Errors
    ///
    /// Everything `generate` returns, plus `Bundle` when the file write
    /// fails.
    pub fn generate_to_file(&self, request: &BundleRequest, path: &Path) -> EvidentiaResult<()> {
        let bytes = self.generate(request)?;
        std::fs::write(path, &bytes).map_err(|e| EvidentiaError::Bundle {
            reason: format!("failed to write bundle to '{}': {}", path.display(), e),
        })?;

        info!(path = %path.display(), "bundle written");
        Ok(())
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Pretty-printed JSON bytes for an archive entry.
fn pretty<T: Serialize>(value: &T) -> EvidentiaResult<Vec<u8>> {
    serde_json::to_vec_pretty(value).map_err(|e| EvidentiaError::Bundle {
        reason: format!("failed to serialize bundle entry: {}", e),
    })
}

/// Start one Stored entry and write its bytes.
fn add_entry(
    archive: &mut ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    name: &str,
    bytes: &[u8],
) -> EvidentiaResult<()> {
    archive
        .start_file(name, options)
        .map_err(|e| EvidentiaError::Bundle {
            reason: format!("failed to start entry '{}': {}", name, e),
        })?;
    archive.write_all(bytes).map_err(|e| EvidentiaError::Bundle {
        reason: format!("failed to write entry '{}': {}", name, e),
    })?;
    Ok(())
}
