//! In-memory implementation of `LedgerBackend`.
//!
//! `MemoryLedger` is the reference backend: both tables and the derived
//! id index live behind a single `Mutex`, so a commit lands whole and a
//! snapshot can never observe half an append.
//!
//! Durable backends would implement `LedgerBackend` over real storage with
//! a transactional commit; everything above the trait is unchanged.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use evidentia_contracts::{
    chain::{ChainNode, LedgerSnapshot},
    error::{EvidentiaError, EvidentiaResult},
    evidence::{EvidenceId, EvidenceRecord},
};
use evidentia_core::traits::LedgerBackend;

// ── Internal mutable state ────────────────────────────────────────────────────

/// The mutable interior of a `MemoryLedger`.
///
/// Kept behind `Arc<Mutex<_>>` so tests can reach in and corrupt stored
/// state to exercise tamper detection.
pub(crate) struct LedgerState {
    /// All records in capture order.
    pub(crate) records: Vec<EvidenceRecord>,

    /// All chain nodes in sequence order. `nodes[i].sequence_number == i`.
    pub(crate) nodes: Vec<ChainNode>,

    /// Derived index: evidence id → sequence number.
    pub(crate) index: HashMap<String, u64>,
}

// ── Public backend ────────────────────────────────────────────────────────────

/// An in-memory, append-only ledger guarded by a single `Mutex`.
///
/// # Thread safety
///
/// Every method acquires the one internal lock, so reads see the ledger
/// either before or fully after any concurrent commit, never in between.
pub struct MemoryLedger {
    pub(crate) state: Arc<Mutex<LedgerState>>,
}

impl MemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(LedgerState {
                records: Vec::new(),
                nodes: Vec::new(),
                index: HashMap::new(),
            })),
        }
    }

    fn lock(&self) -> EvidentiaResult<MutexGuard<'_, LedgerState>> {
        self.state.lock().map_err(|e| EvidentiaError::Storage {
            reason: format!("ledger lock poisoned: {}", e),
        })
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

// ── LedgerBackend impl ────────────────────────────────────────────────────────

impl LedgerBackend for MemoryLedger {
    /// Insert the record, its node, and the index entry under one guard.
    ///
    /// All three writes happen while the lock is held and none of them can
    /// fail, so the commit is all-or-nothing by construction.
    fn commit(&self, record: &EvidenceRecord, node: &ChainNode) -> EvidentiaResult<()> {
        let mut state = self.lock()?;
        state
            .index
            .insert(record.evidence_id.as_str().to_string(), node.sequence_number);
        state.records.push(record.clone());
        state.nodes.push(node.clone());
        Ok(())
    }

    fn record(&self, id: &EvidenceId) -> EvidentiaResult<Option<EvidenceRecord>> {
        let state = self.lock()?;
        Ok(state
            .records
            .iter()
            .find(|r| &r.evidence_id == id)
            .cloned())
    }

    fn records(&self) -> EvidentiaResult<Vec<EvidenceRecord>> {
        Ok(self.lock()?.records.clone())
    }

    fn node(&self, sequence: u64) -> EvidentiaResult<Option<ChainNode>> {
        let state = self.lock()?;
        Ok(state.nodes.get(sequence as usize).cloned())
    }

    fn nodes(&self) -> EvidentiaResult<Vec<ChainNode>> {
        Ok(self.lock()?.nodes.clone())
    }

    fn sequence_for(&self, id: &EvidenceId) -> EvidentiaResult<Option<u64>> {
        Ok(self.lock()?.index.get(id.as_str()).copied())
    }

    fn chain_len(&self) -> EvidentiaResult<u64> {
        Ok(self.lock()?.nodes.len() as u64)
    }

    fn tail(&self) -> EvidentiaResult<Option<ChainNode>> {
        Ok(self.lock()?.nodes.last().cloned())
    }

    fn snapshot(&self) -> EvidentiaResult<LedgerSnapshot> {
        let state = self.lock()?;
        Ok(LedgerSnapshot {
            nodes: state.nodes.clone(),
            records: state.records.clone(),
        })
    }
}
