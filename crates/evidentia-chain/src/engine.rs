//! The chain engine: the single writer of the hash chain.
//!
//! `ChainEngine` owns the append-side state (next sequence number, hash of
//! the tail) behind a `Mutex`, so concurrent appends serialize and every
//! node links to the true predecessor. The engine advances its state only
//! after the backend commit succeeds, which keeps the chain and the engine
//! agreed even across storage failures.

use std::sync::{Arc, Mutex};

use tracing::debug;

use evidentia_contracts::{
    chain::{ChainNode, LedgerSnapshot, VerificationReport, GENESIS_HASH},
    error::{EvidentiaError, EvidentiaResult},
    evidence::EvidenceRecord,
    filter::EvidenceFilter,
};
use evidentia_core::traits::{AuditTrail, LedgerBackend};

use crate::{hash::hash_node, verify::verify_chain};

// ── Internal mutable state ────────────────────────────────────────────────────

/// The append-side state of the chain.
struct EngineState {
    /// The next sequence number to assign (starts at 0).
    sequence: u64,

    /// The `node_hash` of the last committed node, or `GENESIS_HASH` before
    /// any node has been committed.
    last_hash: String,
}

// ── Public engine ─────────────────────────────────────────────────────────────

/// The append-only hash chain over a `LedgerBackend`.
///
/// # Thread safety
///
/// `append()` acquires a `Mutex` internally; read paths go straight to the
/// backend and take no engine lock, so reads and verification proceed
/// concurrently with appends.
pub struct ChainEngine {
    backend: Arc<dyn LedgerBackend>,
    state: Mutex<EngineState>,
}

impl ChainEngine {
    /// Open the chain over a backend, resuming from its existing tail.
    ///
    /// A fresh backend starts the chain at sequence 0 with the genesis
    /// sentinel; a populated one continues where it left off, so re-opening
    /// a ledger never forks the chain.
    ///
    /// # Errors
    ///
    /// `Storage` when the backend cannot report its tail.
    pub fn open(backend: Arc<dyn LedgerBackend>) -> EvidentiaResult<Self> {
        let (sequence, last_hash) = match backend.tail()? {
            Some(tail) => (tail.sequence_number + 1, tail.node_hash),
            None => (0, GENESIS_HASH.to_string()),
        };

        debug!(sequence, last_hash = %last_hash, "chain engine opened");

        Ok(Self {
            backend,
            state: Mutex::new(EngineState {
                sequence,
                last_hash,
            }),
        })
    }

    fn lock_state(&self) -> EvidentiaResult<std::sync::MutexGuard<'_, EngineState>> {
        self.state.lock().map_err(|e| EvidentiaError::Storage {
            reason: format!("chain state lock poisoned: {}", e),
        })
    }
}

// ── AuditTrail impl ───────────────────────────────────────────────────────────

impl AuditTrail for ChainEngine {
    /// Bind one record into the chain.
    ///
    /// Builds the node from the current engine state, hands record and node
    /// to the backend as one atomic commit, and only then advances the
    /// sequence counter and `last_hash`. A failed commit leaves the engine
    /// state untouched: the next append reuses the same sequence number and
    /// links exactly as if the failure never happened.
    fn append(&self, record: &EvidenceRecord) -> EvidentiaResult<ChainNode> {
        let mut state = self.lock_state()?;

        let previous_hash = state.last_hash.clone();
        let sequence = state.sequence;
        let node_hash = hash_node(
            sequence,
            record.evidence_id.as_str(),
            &previous_hash,
            record,
        );

        let node = ChainNode {
            sequence_number: sequence,
            evidence_id: record.evidence_id.clone(),
            previous_hash,
            node_hash: node_hash.clone(),
            created_at: record.captured_at,
        };

        self.backend.commit(record, &node)?;

        state.sequence += 1;
        state.last_hash = node_hash;

        debug!(
            sequence = node.sequence_number,
            evidence_id = %node.evidence_id,
            node_hash = %node.node_hash,
            "node appended to chain"
        );

        Ok(node)
    }

    /// Nodes inside the filter's time window, ascending by sequence.
    fn get_chain(&self, filter: &EvidenceFilter) -> EvidentiaResult<Vec<ChainNode>> {
        let nodes = self.backend.nodes()?;
        Ok(nodes.into_iter().filter(|n| filter.matches_node(n)).collect())
    }

    /// The most recently committed node.
    fn tail(&self) -> EvidentiaResult<Option<ChainNode>> {
        self.backend.tail()
    }

    /// Snapshot the ledger and run the full verification walk.
    fn verify(&self) -> EvidentiaResult<VerificationReport> {
        let snapshot = self.backend.snapshot()?;
        Ok(verify_chain(&snapshot))
    }

    /// A consistent point-in-time copy of the ledger.
    fn snapshot(&self) -> EvidentiaResult<LedgerSnapshot> {
        self.backend.snapshot()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use serde_json::json;

    use evidentia_contracts::{
        chain::{ChainNode, LedgerSnapshot, GENESIS_HASH},
        error::{EvidentiaError, EvidentiaResult},
        evidence::{CaptureRequest, EvidenceId, EvidenceRecord, EventType},
    };
    use evidentia_core::traits::{AuditTrail, LedgerBackend};

    use crate::memory::MemoryLedger;

    use super::ChainEngine;

    // ── Mock helpers ─────────────────────────────────────────────────────────

    fn make_record(tag: &str) -> EvidenceRecord {
        let at = chrono::Utc::now();
        CaptureRequest::new(
            EventType::Detection,
            json!({ "framework": "PCI-DSS", "clause": "3.4" }),
            json!({ "detected_by": "scanner", "detection_method": "pattern_match", "tag": tag }),
        )
        .into_record(EvidenceId::generate(at), at)
    }

    /// A backend that delegates to a real `MemoryLedger` but fails the next
    /// commit when armed.
    struct FaultyBackend {
        inner: MemoryLedger,
        fail_next: Arc<Mutex<bool>>,
    }

    impl FaultyBackend {
        fn new() -> Self {
            Self {
                inner: MemoryLedger::new(),
                fail_next: Arc::new(Mutex::new(false)),
            }
        }

        fn arm(&self) {
            *self.fail_next.lock().unwrap() = true;
        }
    }

    impl LedgerBackend for FaultyBackend {
        fn commit(&self, record: &EvidenceRecord, node: &ChainNode) -> EvidentiaResult<()> {
            let mut fail = self.fail_next.lock().unwrap();
            if *fail {
                *fail = false;
                return Err(EvidentiaError::Storage {
                    reason: "simulated commit failure".to_string(),
                });
            }
            self.inner.commit(record, node)
        }

        fn record(&self, id: &EvidenceId) -> EvidentiaResult<Option<EvidenceRecord>> {
            self.inner.record(id)
        }

        fn records(&self) -> EvidentiaResult<Vec<EvidenceRecord>> {
            self.inner.records()
        }

        fn node(&self, sequence: u64) -> EvidentiaResult<Option<ChainNode>> {
            self.inner.node(sequence)
        }

        fn nodes(&self) -> EvidentiaResult<Vec<ChainNode>> {
            self.inner.nodes()
        }

        fn sequence_for(&self, id: &EvidenceId) -> EvidentiaResult<Option<u64>> {
            self.inner.sequence_for(id)
        }

        fn chain_len(&self) -> EvidentiaResult<u64> {
            self.inner.chain_len()
        }

        fn tail(&self) -> EvidentiaResult<Option<ChainNode>> {
            self.inner.tail()
        }

        fn snapshot(&self) -> EvidentiaResult<LedgerSnapshot> {
            self.inner.snapshot()
        }
    }

    // ── Test cases ────────────────────────────────────────────────────────────

    /// A failed commit must leave no record, no node, and an unchanged
    /// sequence; the next append succeeds and links as if the failure
    /// never happened.
    #[test]
    fn test_commit_failure_leaves_engine_unchanged() {
        let backend = Arc::new(FaultyBackend::new());
        let engine = ChainEngine::open(backend.clone()).unwrap();

        backend.arm();
        let result = engine.append(&make_record("doomed"));
        assert!(matches!(result, Err(EvidentiaError::Storage { .. })));

        // Nothing persisted.
        assert_eq!(backend.chain_len().unwrap(), 0);
        assert!(backend.records().unwrap().is_empty());

        // The next append takes sequence 0 and links to genesis.
        let node = engine.append(&make_record("survivor")).unwrap();
        assert_eq!(node.sequence_number, 0);
        assert_eq!(node.previous_hash, GENESIS_HASH);
        assert_eq!(backend.chain_len().unwrap(), 1);

        let report = engine.verify().unwrap();
        assert!(report.valid, "chain must be valid after recovery: {:?}", report.breaks);
    }

    /// An engine opened over a populated ledger resumes the chain instead
    /// of forking it.
    #[test]
    fn test_open_resumes_existing_chain() {
        let backend = Arc::new(MemoryLedger::new());

        let first = ChainEngine::open(backend.clone() as Arc<dyn LedgerBackend>).unwrap();
        let node_a = first.append(&make_record("a")).unwrap();
        let node_b = first.append(&make_record("b")).unwrap();
        drop(first);

        let second = ChainEngine::open(backend.clone() as Arc<dyn LedgerBackend>).unwrap();
        let node_c = second.append(&make_record("c")).unwrap();

        assert_eq!(node_a.sequence_number, 0);
        assert_eq!(node_b.sequence_number, 1);
        assert_eq!(node_c.sequence_number, 2);
        assert_eq!(node_c.previous_hash, node_b.node_hash);

        let report = second.verify().unwrap();
        assert!(report.valid, "resumed chain must verify: {:?}", report.breaks);
        assert_eq!(report.nodes_checked, 3);
    }

    /// created_at on the node equals captured_at on the record.
    #[test]
    fn test_node_created_at_mirrors_capture_time() {
        let backend = Arc::new(MemoryLedger::new());
        let engine = ChainEngine::open(backend as Arc<dyn LedgerBackend>).unwrap();

        let record = make_record("timing");
        let node = engine.append(&record).unwrap();
        assert_eq!(node.created_at, record.captured_at);
    }
}
