//! The evidence store: the capture orchestrator.
//!
//! The store enforces the Evidentia capture model:
//!
//!   Validate → [capture lock: timestamp → identity → freeze → chain append]
//!
//! The ordering invariant is absolute: capture order equals chain order.
//! The capture lock is held from timestamp assignment through the trail
//! append, so no two captures can swap places between receiving their
//! `captured_at` and landing in the chain, and `captured_at` never moves
//! backwards even when the wall clock does.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use evidentia_contracts::{
    chain::ChainNode,
    error::{EvidentiaError, EvidentiaResult},
    evidence::{CaptureRequest, EvidenceId, EvidenceRecord},
    filter::EvidenceFilter,
};

use crate::traits::{AuditTrail, CaptureValidator, LedgerBackend};

// ── Internal capture state ────────────────────────────────────────────────────

/// Mutable state guarded by the capture lock.
struct CaptureState {
    /// `captured_at` of the most recent successful capture. New captures
    /// are clamped to be >= this value.
    last_captured_at: Option<DateTime<Utc>>,
}

// ── Public store ──────────────────────────────────────────────────────────────

/// The capture/read front of the evidence ledger.
///
/// Owns the trusted collaborators: the validator gates input, the trail
/// chains accepted records, and the backend serves the read paths. One
/// store instance is shared across threads; `capture()` serializes
/// internally.
pub struct EvidenceStore {
    validator: Box<dyn CaptureValidator>,
    trail: Arc<dyn AuditTrail>,
    backend: Arc<dyn LedgerBackend>,
    capture: Mutex<CaptureState>,
}

impl EvidenceStore {
    /// Create a store over the given collaborators.
    ///
    /// `trail` and `backend` are expected to view the same ledger; the
    /// store appends through the trail and reads through the backend.
    pub fn new(
        validator: Box<dyn CaptureValidator>,
        trail: Arc<dyn AuditTrail>,
        backend: Arc<dyn LedgerBackend>,
    ) -> Self {
        Self {
            validator,
            trail,
            backend,
            capture: Mutex::new(CaptureState {
                last_captured_at: None,
            }),
        }
    }

    /// Capture one evidence record and bind it into the chain.
    ///
    /// # Pipeline
    ///
    /// 1. `validator.validate()` — a rejected request leaves no trace.
    /// 2. Under the capture lock:
    ///    a. take `Utc::now()`, clamped to be >= the previous capture's
    ///       timestamp
    ///    b. generate the `EvidenceId`
    ///    c. freeze the request into an immutable `EvidenceRecord`
    ///    d. `trail.append()` — record and node land in one atomic commit
    ///
    /// Returns the frozen record. The chain node is retrievable afterwards
    /// via `node_for()`.
    ///
    /// # Errors
    ///
    /// Returns `Validation` when the request fails the configured checks
    /// (all problems joined into one message) and `Storage` when the
    /// backend commit fails. On `Storage`, nothing was persisted: the next
    /// capture proceeds as if this one never happened.
    pub fn capture(&self, request: CaptureRequest) -> EvidentiaResult<EvidenceRecord> {
        if let Err(err) = self.validator.validate(&request) {
            warn!(event_type = %request.event_type, error = %err, "capture rejected");
            return Err(err);
        }

        // Held across the append so capture order equals chain order.
        let mut state = self.capture.lock().map_err(|e| EvidentiaError::Storage {
            reason: format!("capture lock poisoned: {}", e),
        })?;

        let mut captured_at = Utc::now();
        if let Some(last) = state.last_captured_at {
            if captured_at < last {
                captured_at = last;
            }
        }

        let evidence_id = EvidenceId::generate(captured_at);
        let record = request.into_record(evidence_id, captured_at);

        debug!(
            evidence_id = %record.evidence_id,
            event_type = %record.event_type,
            "evidence validated, appending to chain"
        );

        let node = self.trail.append(&record)?;
        state.last_captured_at = Some(captured_at);

        info!(
            evidence_id = %record.evidence_id,
            sequence = node.sequence_number,
            node_hash = %node.node_hash,
            "evidence captured"
        );

        Ok(record)
    }

    /// Fetch one record by id.
    ///
    /// # Errors
    ///
    /// `NotFound` when no record carries the id.
    pub fn get(&self, id: &EvidenceId) -> EvidentiaResult<EvidenceRecord> {
        self.backend
            .record(id)?
            .ok_or_else(|| EvidentiaError::NotFound {
                evidence_id: id.to_string(),
            })
    }

    /// List records matching the filter, ascending by capture time.
    ///
    /// Records are stored in capture order and `captured_at` is
    /// non-decreasing in that order, so no sort is needed. An empty filter
    /// returns everything.
    pub fn list(&self, filter: &EvidenceFilter) -> EvidentiaResult<Vec<EvidenceRecord>> {
        let records = self.backend.records()?;
        Ok(records
            .into_iter()
            .filter(|r| filter.matches_record(r))
            .collect())
    }

    /// Cross-reference: the chain node that commits to a record.
    ///
    /// # Errors
    ///
    /// `NotFound` when the id is unknown; `Storage` when the index maps the
    /// id to a sequence number with no stored node, which indicates a
    /// violated backend invariant.
    pub fn node_for(&self, id: &EvidenceId) -> EvidentiaResult<ChainNode> {
        let sequence =
            self.backend
                .sequence_for(id)?
                .ok_or_else(|| EvidentiaError::NotFound {
                    evidence_id: id.to_string(),
                })?;

        self.backend
            .node(sequence)?
            .ok_or_else(|| EvidentiaError::Storage {
                reason: format!(
                    "index maps '{}' to sequence {} but no node is stored there",
                    id, sequence
                ),
            })
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
