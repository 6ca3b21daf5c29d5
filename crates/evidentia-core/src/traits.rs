//! Core trait definitions for the Evidentia evidence ledger.
//!
//! These three traits define the complete trust boundary:
//!
//! - `CaptureValidator` — trusted gate (rejects malformed evidence before
//!   anything is persisted)
//! - `AuditTrail`       — trusted chain (binds accepted evidence into the
//!   tamper-evident sequence)
//! - `LedgerBackend`    — trusted sink (durable, append-only storage for
//!   records and chain nodes)
//!
//! The `EvidenceStore` wires them together in the correct order. No record
//! reaches the trail unless the validator first accepts it, and no record
//! becomes visible unless its chain node landed in the same commit.

use evidentia_contracts::{
    chain::{ChainNode, LedgerSnapshot, VerificationReport},
    error::EvidentiaResult,
    evidence::{CaptureRequest, EvidenceId, EvidenceRecord},
    filter::EvidenceFilter,
};

/// Durable, append-only storage for evidence records and chain nodes.
///
/// Implementations are **trusted** and must be atomic at the `commit`
/// boundary: either both the record and its node become visible, or
/// neither does. There is deliberately no update or delete operation —
/// the ledger only ever grows.
pub trait LedgerBackend: Send + Sync {
    /// Persist one record and its chain node as a single unit.
    ///
    /// Implementations MUST be all-or-nothing: on `Err`, neither the record
    /// nor the node may be observable through any read method, and derived
    /// state (the id index, chain length) must be unchanged.
    fn commit(&self, record: &EvidenceRecord, node: &ChainNode) -> EvidentiaResult<()>;

    /// Fetch one record by id, or `None` if the id is unknown.
    fn record(&self, id: &EvidenceId) -> EvidentiaResult<Option<EvidenceRecord>>;

    /// All records in capture order.
    fn records(&self) -> EvidentiaResult<Vec<EvidenceRecord>>;

    /// Fetch one node by sequence number, or `None` past the tail.
    fn node(&self, sequence: u64) -> EvidentiaResult<Option<ChainNode>>;

    /// All nodes in ascending sequence order.
    fn nodes(&self) -> EvidentiaResult<Vec<ChainNode>>;

    /// Resolve an evidence id to its chain position via the derived index.
    fn sequence_for(&self, id: &EvidenceId) -> EvidentiaResult<Option<u64>>;

    /// Number of nodes in the chain.
    fn chain_len(&self) -> EvidentiaResult<u64>;

    /// The highest-sequence node, or `None` for an empty ledger.
    fn tail(&self) -> EvidentiaResult<Option<ChainNode>>;

    /// A consistent point-in-time copy of both tables.
    ///
    /// Implementations must not interleave with a concurrent `commit`: the
    /// snapshot reflects the ledger either before or after any given
    /// append, never mid-commit.
    fn snapshot(&self) -> EvidentiaResult<LedgerSnapshot>;
}

/// The hash chain seam consumed by the store and the bundle exporter.
///
/// Implementations are **trusted** and must serialize appends internally:
/// two concurrent `append` calls may interleave in either order, but both
/// nodes must link correctly and receive distinct consecutive sequence
/// numbers.
pub trait AuditTrail: Send + Sync {
    /// Bind one record into the chain and return its node.
    ///
    /// On `Err` the chain is unchanged: no node exists for the record and
    /// the next append links exactly as if this call never happened.
    fn append(&self, record: &EvidenceRecord) -> EvidentiaResult<ChainNode>;

    /// Nodes whose `created_at` falls inside the filter's time bounds,
    /// ascending by sequence. The tenant bound does not apply to nodes.
    fn get_chain(&self, filter: &EvidenceFilter) -> EvidentiaResult<Vec<ChainNode>>;

    /// The most recently appended node, or `None` for an empty chain.
    fn tail(&self) -> EvidentiaResult<Option<ChainNode>>;

    /// Walk the entire chain and report every integrity break.
    ///
    /// A damaged chain is a successful verification with findings, not an
    /// error. Runs against a snapshot, so it may proceed concurrently with
    /// appends.
    fn verify(&self) -> EvidentiaResult<VerificationReport>;

    /// A consistent point-in-time copy of the ledger.
    fn snapshot(&self) -> EvidentiaResult<LedgerSnapshot>;
}

/// The capture gate: the first check in the capture pipeline.
///
/// Implementations are **trusted** and must be deterministic. Validation
/// runs before identity assignment, so a rejected request leaves no trace
/// anywhere in the system.
pub trait CaptureValidator: Send + Sync {
    /// Check a capture request against the configured requirements.
    ///
    /// Implementations must collect every problem and report them together
    /// in one `Validation` error rather than failing at the first.
    fn validate(&self, request: &CaptureRequest) -> EvidentiaResult<()>;
}
