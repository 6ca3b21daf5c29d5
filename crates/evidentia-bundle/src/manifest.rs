//! Bundle manifest types.
//!
//! The manifest is the first entry in every bundle and summarizes what the
//! archive contains and what state the chain was in when it was cut. It is
//! derived entirely from the snapshot and the request — no wall-clock field
//! exists anywhere in it, so regenerating a bundle over identical ledger
//! state produces identical manifest bytes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use evidentia_contracts::{
    chain::{LedgerSnapshot, VerificationReport},
    evidence::EvidenceRecord,
};

use crate::exporter::BundleRequest;

/// Manifest format version. Bump on any layout change.
pub const BUNDLE_VERSION: &str = "1.0";

/// The inclusive capture-time window the bundle covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Chain state at the moment the bundle was cut.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainSummary {
    /// Number of nodes in the full chain, not just the window.
    pub total_nodes: u64,

    /// `node_hash` of the chain tail. Empty string for an empty chain.
    pub tail_hash: String,
}

/// Verification outcome over the full chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationSummary {
    /// True when the full-chain walk found zero breaks.
    pub valid: bool,

    /// Number of breaks found. The full list lives in
    /// `AUDIT_TRAIL/verification_report.json`.
    pub breaks: u64,
}

/// The `MANIFEST.json` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BundleManifest {
    pub bundle_version: String,
    pub tenant_id: String,
    pub date_range: DateRange,

    /// Number of evidence records inside the window.
    pub evidence_count: u64,

    pub chain: ChainSummary,
    pub verification: VerificationSummary,
}

impl BundleManifest {
    /// Assemble the manifest from the bundle's inputs.
    pub fn build(
        snapshot: &LedgerSnapshot,
        request: &BundleRequest,
        windowed_records: &[EvidenceRecord],
        report: &VerificationReport,
    ) -> Self {
        Self {
            bundle_version: BUNDLE_VERSION.to_string(),
            tenant_id: request.tenant.as_str().to_string(),
            date_range: DateRange {
                start: request.start,
                end: request.end,
            },
            evidence_count: windowed_records.len() as u64,
            chain: ChainSummary {
                total_nodes: snapshot.nodes.len() as u64,
                tail_hash: snapshot
                    .tail()
                    .map(|n| n.node_hash.clone())
                    .unwrap_or_default(),
            },
            verification: VerificationSummary {
                valid: report.valid,
                breaks: report.breaks.len() as u64,
            },
        }
    }
}
