//! # evidentia-chain
//!
//! Append-only, SHA-256 hash-chained tamper evidence for the Evidentia
//! ledger.
//!
//! ## Overview
//!
//! Every captured evidence record is wrapped in a `ChainNode` that links to
//! the previous node via its SHA-256 hash. Tampering with any node or any
//! record — even a single byte — breaks the chain, and `verify_chain`
//! reports every break with its position and kind rather than stopping at
//! the first.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use evidentia_chain::{ChainEngine, MemoryLedger};
//! use evidentia_core::traits::AuditTrail;
//!
//! let ledger = Arc::new(MemoryLedger::new());
//! let engine = ChainEngine::open(ledger)?;
//! let node = engine.append(&record)?;
//!
//! let report = engine.verify()?;
//! assert!(report.valid);
//! ```

pub mod engine;
pub mod hash;
pub mod memory;
pub mod verify;

pub use engine::ChainEngine;
pub use hash::hash_node;
pub use memory::MemoryLedger;
pub use verify::verify_chain;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use evidentia_contracts::{
        chain::{BreakKind, GENESIS_HASH},
        evidence::{CaptureRequest, EvidenceId, EvidenceRecord, EventType},
        filter::EvidenceFilter,
    };
    use evidentia_core::traits::AuditTrail;

    use super::{ChainEngine, MemoryLedger};

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// Build a record with a distinguishable payload.
    fn make_record(tag: &str) -> EvidenceRecord {
        let at = chrono::Utc::now();
        CaptureRequest::new(
            EventType::Violation,
            json!({ "framework": "PCI-DSS", "version": "3.2.1", "clause": "3.4" }),
            json!({
                "detected_by": "pan_scanner",
                "detection_method": "pattern_match",
                "tag": tag,
            }),
        )
        .with_violation_state(json!({ "before": { "masked": false }, "after": { "masked": true } }))
        .into_record(EvidenceId::generate(at), at)
    }

    /// An engine over a fresh in-memory ledger, with the ledger handle kept
    /// so tests can corrupt stored state directly.
    fn make_engine() -> (ChainEngine, Arc<MemoryLedger>) {
        let ledger = Arc::new(MemoryLedger::new());
        let engine = ChainEngine::open(ledger.clone()).expect("open over empty ledger");
        (engine, ledger)
    }

    // ── Tests ─────────────────────────────────────────────────────────────────

    /// Sequence numbers are dense from 0 and every node links to its
    /// predecessor's hash.
    #[test]
    fn test_chain_links_consecutive_appends() {
        let (engine, _ledger) = make_engine();

        let a = engine.append(&make_record("first")).unwrap();
        let b = engine.append(&make_record("second")).unwrap();
        let c = engine.append(&make_record("third")).unwrap();

        assert_eq!(a.sequence_number, 0);
        assert_eq!(b.sequence_number, 1);
        assert_eq!(c.sequence_number, 2);

        assert_eq!(a.previous_hash, GENESIS_HASH, "first node must link to the genesis sentinel");
        assert_eq!(b.previous_hash, a.node_hash);
        assert_eq!(c.previous_hash, b.node_hash);
    }

    /// An untampered chain verifies valid with an empty break list.
    #[test]
    fn test_verify_valid_chain() {
        let (engine, _ledger) = make_engine();
        engine.append(&make_record("a")).unwrap();
        engine.append(&make_record("b")).unwrap();
        engine.append(&make_record("c")).unwrap();

        let report = engine.verify().unwrap();
        assert!(report.valid, "untampered chain must verify: {:?}", report.breaks);
        assert_eq!(report.nodes_checked, 3);
        assert!(report.breaks.is_empty());
    }

    /// An empty chain is trivially valid — there is nothing to verify.
    #[test]
    fn test_verify_empty_chain() {
        let (engine, _ledger) = make_engine();

        let report = engine.verify().unwrap();
        assert!(report.valid);
        assert_eq!(report.nodes_checked, 0);
        assert!(report.breaks.is_empty());
    }

    /// Overwriting one stored node_hash yields exactly two breaks: the
    /// overwritten node no longer matches its recomputed hash, and the next
    /// node's stored link disagrees with the ledger's record of its
    /// predecessor. Nodes further on are clean.
    #[test]
    fn test_overwritten_node_hash_reports_two_breaks() {
        let (engine, ledger) = make_engine();
        engine.append(&make_record("a")).unwrap();
        engine.append(&make_record("b")).unwrap();
        engine.append(&make_record("c")).unwrap();

        // Directly overwrite node 1's stored hash to simulate tampering.
        {
            let mut state = ledger.state.lock().unwrap();
            state.nodes[1].node_hash = "f".repeat(64);
        }

        let report = engine.verify().unwrap();
        assert!(!report.valid);
        assert_eq!(report.nodes_checked, 3);
        assert_eq!(
            report.breaks.len(),
            2,
            "expected exactly two breaks, got {:?}",
            report.breaks
        );

        assert_eq!(report.breaks[0].sequence_number, 1);
        assert_eq!(report.breaks[0].kind, BreakKind::HashMismatch);
        assert_eq!(report.breaks[0].actual, "f".repeat(64));

        assert_eq!(report.breaks[1].sequence_number, 2);
        assert_eq!(report.breaks[1].kind, BreakKind::LinkMismatch);
    }

    /// Mutating a stored record's payload breaks its node's hash and every
    /// downstream link: the chained expectation diverges at the mutation
    /// and never re-converges.
    #[test]
    fn test_payload_mutation_propagates_downstream() {
        let (engine, ledger) = make_engine();
        engine.append(&make_record("a")).unwrap();
        engine.append(&make_record("b")).unwrap();
        engine.append(&make_record("c")).unwrap();
        engine.append(&make_record("d")).unwrap();

        // Mutate the payload of the record committed at sequence 1.
        {
            let mut state = ledger.state.lock().unwrap();
            state.records[1].detection = json!({ "detected_by": "TAMPERED" });
        }

        let report = engine.verify().unwrap();
        assert!(!report.valid);

        let kinds: Vec<(u64, BreakKind)> = report
            .breaks
            .iter()
            .map(|b| (b.sequence_number, b.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (1, BreakKind::HashMismatch),
                (2, BreakKind::LinkMismatch),
                (3, BreakKind::LinkMismatch),
            ],
            "mutation at node 1 must break node 1 and every link after it"
        );
    }

    /// Editing a single node's previous_hash is localized: it breaks that
    /// node's link and its own hash (the link is part of the hashed
    /// content), and nothing downstream.
    #[test]
    fn test_previous_hash_edit_is_localized() {
        let (engine, ledger) = make_engine();
        engine.append(&make_record("a")).unwrap();
        engine.append(&make_record("b")).unwrap();
        engine.append(&make_record("c")).unwrap();
        engine.append(&make_record("d")).unwrap();

        {
            let mut state = ledger.state.lock().unwrap();
            state.nodes[2].previous_hash = "e".repeat(64);
        }

        let report = engine.verify().unwrap();
        assert!(!report.valid);

        let kinds: Vec<(u64, BreakKind)> = report
            .breaks
            .iter()
            .map(|b| (b.sequence_number, b.kind))
            .collect();
        assert_eq!(
            kinds,
            vec![(2, BreakKind::LinkMismatch), (2, BreakKind::HashMismatch)],
            "a lone previous_hash edit must not cascade past its own node"
        );
    }

    /// A node whose record has vanished reports a hash mismatch at that
    /// position only.
    #[test]
    fn test_missing_record_reports_hash_mismatch() {
        let (engine, ledger) = make_engine();
        engine.append(&make_record("a")).unwrap();
        engine.append(&make_record("b")).unwrap();
        engine.append(&make_record("c")).unwrap();

        {
            let mut state = ledger.state.lock().unwrap();
            state.records.remove(1);
        }

        let report = engine.verify().unwrap();
        assert!(!report.valid);
        assert_eq!(report.breaks.len(), 1, "breaks: {:?}", report.breaks);
        assert_eq!(report.breaks[0].sequence_number, 1);
        assert_eq!(report.breaks[0].kind, BreakKind::HashMismatch);
        assert!(report.breaks[0].expected.is_empty());
    }

    /// Two reads with no intervening append return identical chains.
    #[test]
    fn test_get_chain_read_idempotent() {
        let (engine, _ledger) = make_engine();
        engine.append(&make_record("a")).unwrap();
        engine.append(&make_record("b")).unwrap();

        let first = engine.get_chain(&EvidenceFilter::all()).unwrap();
        let second = engine.get_chain(&EvidenceFilter::all()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    /// The tail is the most recently appended node.
    #[test]
    fn test_tail_tracks_latest_append() {
        let (engine, _ledger) = make_engine();
        assert!(engine.tail().unwrap().is_none());

        engine.append(&make_record("a")).unwrap();
        let b = engine.append(&make_record("b")).unwrap();

        let tail = engine.tail().unwrap().expect("tail after two appends");
        assert_eq!(tail.sequence_number, 1);
        assert_eq!(tail.node_hash, b.node_hash);
    }

    /// Two records with identical payloads still hash differently: the
    /// evidence id, sequence, and capture time all feed the hash.
    #[test]
    fn test_identical_payloads_distinct_hashes() {
        let (engine, _ledger) = make_engine();
        let a = engine.append(&make_record("same")).unwrap();
        let b = engine.append(&make_record("same")).unwrap();

        assert_ne!(a.node_hash, b.node_hash);
    }
}
