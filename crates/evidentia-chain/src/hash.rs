//! Canonical node hashing.
//!
//! Every field that contributes to a node's hash is listed explicitly so
//! nothing is accidentally omitted. The same function serves both append
//! and verification; there is no second implementation to drift.
//!
//! Hash input layout (bytes, in order):
//!   1. sequence_number as 8-byte little-endian
//!   2. evidence_id as UTF-8 bytes
//!   3. previous_hash as UTF-8 bytes (64 ASCII hex chars)
//!   4. canonical JSON of the full evidence record (serde_json with no
//!      pretty-printing; map keys in sorted order, struct fields in
//!      declaration order)
//!   5. captured_at as microseconds since epoch, 8-byte little-endian

use sha2::{Digest, Sha256};

use evidentia_contracts::evidence::EvidenceRecord;

/// Compute the SHA-256 hash for a single chain node.
///
/// The hash commits to the node's position (`sequence_number`), the record
/// it wraps (`evidence_id` and the record's full canonical JSON), its link
/// to the predecessor (`previous_hash`), and the capture time. Changing any
/// byte of any of these produces a different hash.
///
/// Returns a lowercase 64-character hex string.
///
/// # Panics
///
/// Panics if `record` cannot be serialized to JSON — which cannot happen
/// for the well-formed `EvidenceRecord` type.
pub fn hash_node(
    sequence_number: u64,
    evidence_id: &str,
    previous_hash: &str,
    record: &EvidenceRecord,
) -> String {
    // serde_json::to_vec produces canonical, deterministic JSON without
    // trailing whitespace or key reordering across calls on the same value.
    let record_json =
        serde_json::to_vec(record).expect("EvidenceRecord must always be serializable to JSON");

    let mut hasher = Sha256::new();
    hasher.update(sequence_number.to_le_bytes());
    hasher.update(evidence_id.as_bytes());
    hasher.update(previous_hash.as_bytes());
    hasher.update(&record_json);
    hasher.update(record.captured_at.timestamp_micros().to_le_bytes());

    hex::encode(hasher.finalize())
}
