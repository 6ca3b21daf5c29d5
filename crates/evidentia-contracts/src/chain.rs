//! Hash chain node and verification report types.
//!
//! A `ChainNode` is the tamper-evidence wrapper around one evidence record:
//! it commits to the record's canonical bytes and to the previous node's
//! hash. `VerificationReport` and `ChainBreak` carry the outcome of a full
//! chain walk.

use crate::evidence::{EvidenceId, EvidenceRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel predecessor hash for the first node in a chain.
///
/// Sixty-four ASCII zeros, the width of a SHA-256 hex digest.
pub const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// One link in the hash chain.
///
/// Nodes are append-only. `node_hash` commits to the sequence number, the
/// evidence id, `previous_hash`, the record's canonical JSON bytes, and the
/// capture timestamp; any edit to the node or its record is detectable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainNode {
    /// Zero-based position in the chain, dense and gapless.
    pub sequence_number: u64,

    /// The evidence record this node commits to.
    pub evidence_id: EvidenceId,

    /// Hash of the previous node, or `GENESIS_HASH` at sequence zero.
    pub previous_hash: String,

    /// SHA-256 over this node's canonical byte layout, lowercase hex.
    pub node_hash: String,

    /// When the node was appended. Equals the record's `captured_at`.
    pub created_at: DateTime<Utc>,
}

/// Which chain invariant a break violates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakKind {
    /// The stored `node_hash` does not match the hash recomputed from the
    /// node's stored fields and its record's canonical bytes.
    HashMismatch,
    /// The stored `previous_hash` does not match what the predecessor link
    /// should be.
    LinkMismatch,
}

impl BreakKind {
    /// The snake_case name used in serialization and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            BreakKind::HashMismatch => "hash_mismatch",
            BreakKind::LinkMismatch => "link_mismatch",
        }
    }
}

impl fmt::Display for BreakKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected integrity violation at a specific chain position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainBreak {
    /// Where in the chain the break sits.
    pub sequence_number: u64,

    /// The evidence id recorded at that position.
    pub evidence_id: EvidenceId,

    /// Which invariant failed.
    pub kind: BreakKind,

    /// The hash the verifier expected at this position.
    pub expected: String,

    /// The hash actually stored.
    pub actual: String,
}

/// Outcome of walking the full chain.
///
/// Verification never short-circuits: every node is checked and every break
/// is enumerated, so a report over a damaged chain shows the full extent of
/// the damage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    /// True when no breaks were found.
    pub valid: bool,

    /// How many nodes the walk covered.
    pub nodes_checked: u64,

    /// Every violation found, in chain order.
    pub breaks: Vec<ChainBreak>,
}

impl VerificationReport {
    /// A report over an empty chain: trivially valid, zero nodes.
    pub fn empty() -> Self {
        Self {
            valid: true,
            nodes_checked: 0,
            breaks: Vec::new(),
        }
    }
}

/// A point-in-time copy of the ledger: the chain and the records it commits
/// to, both in sequence order.
///
/// Snapshots feed verification and bundle export so neither holds locks
/// while hashing or serializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    /// Chain nodes in ascending sequence order.
    pub nodes: Vec<ChainNode>,

    /// Evidence records in the same order as `nodes`.
    pub records: Vec<EvidenceRecord>,
}

impl LedgerSnapshot {
    /// Look up the record for an evidence id, if the snapshot holds it.
    pub fn record(&self, id: &EvidenceId) -> Option<&EvidenceRecord> {
        self.records.iter().find(|r| &r.evidence_id == id)
    }

    /// The highest-sequence node, if any.
    pub fn tail(&self) -> Option<&ChainNode> {
        self.nodes.last()
    }

    /// True when the snapshot holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
