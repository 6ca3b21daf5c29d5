//! Full-chain integrity verification.
//!
//! The walk is pure: it takes a `LedgerSnapshot` and returns a
//! `VerificationReport`, touching no locks and no live state. It never
//! stops at the first problem — every node is checked and every break is
//! enumerated, so one report shows the full extent of any damage.
//!
//! Two expectations are carried forward through the walk:
//!
//! - the **stored** expectation: the predecessor's `node_hash` exactly as
//!   it sits in the ledger
//! - the **chained** expectation: the predecessor's hash recomputed from
//!   its current content, linked through recomputed values all the way
//!   from genesis
//!
//! A node's stored `previous_hash` must agree with both. Carrying both is
//! what makes the two tampering shapes distinguishable: overwriting a
//! stored `node_hash` breaks the stored expectation at the next node,
//! while mutating a record's payload breaks the chained expectation at
//! every node after it.

use evidentia_contracts::chain::{
    BreakKind, ChainBreak, LedgerSnapshot, VerificationReport, GENESIS_HASH,
};

use crate::hash::hash_node;

/// Walk the whole snapshot and report every integrity break.
///
/// Per node, in order:
///
/// 1. **Linkage** — the stored `previous_hash` must equal both running
///    expectations (or `GENESIS_HASH` at sequence 0). Any disagreement is
///    a `LinkMismatch`; `expected` carries whichever expectation the
///    stored value contradicts, preferring the chained one.
/// 2. **Hash correctness** — the stored `node_hash` must match the value
///    recomputed from the node's stored fields and its record's canonical
///    JSON. A mismatch is a `HashMismatch`. A node whose record is missing
///    from the snapshot is reported as a `HashMismatch` with an empty
///    `expected` (nothing can be recomputed), and the chained expectation
///    falls back to the stored hash so one missing record does not cascade
///    into link noise downstream.
///
/// An empty snapshot verifies valid with zero nodes checked.
pub fn verify_chain(snapshot: &LedgerSnapshot) -> VerificationReport {
    let mut breaks = Vec::new();
    let mut expected_stored = GENESIS_HASH.to_string();
    let mut expected_chained = GENESIS_HASH.to_string();

    for node in &snapshot.nodes {
        // Rule 1: the stored previous_hash must satisfy both expectations.
        if node.previous_hash != expected_stored || node.previous_hash != expected_chained {
            let expected = if node.previous_hash != expected_chained {
                expected_chained.clone()
            } else {
                expected_stored.clone()
            };
            breaks.push(ChainBreak {
                sequence_number: node.sequence_number,
                evidence_id: node.evidence_id.clone(),
                kind: BreakKind::LinkMismatch,
                expected,
                actual: node.previous_hash.clone(),
            });
        }

        // Rule 2: recompute node_hash from the stored fields and compare.
        match snapshot.record(&node.evidence_id) {
            Some(record) => {
                let recomputed = hash_node(
                    node.sequence_number,
                    node.evidence_id.as_str(),
                    &node.previous_hash,
                    record,
                );
                if recomputed != node.node_hash {
                    breaks.push(ChainBreak {
                        sequence_number: node.sequence_number,
                        evidence_id: node.evidence_id.clone(),
                        kind: BreakKind::HashMismatch,
                        expected: recomputed.clone(),
                        actual: node.node_hash.clone(),
                    });
                }

                // Advance the chained expectation: same inputs when the
                // stored link already agrees, otherwise rehash with the
                // chained predecessor substituted in.
                expected_chained = if node.previous_hash == expected_chained {
                    recomputed
                } else {
                    hash_node(
                        node.sequence_number,
                        node.evidence_id.as_str(),
                        &expected_chained,
                        record,
                    )
                };
            }
            None => {
                breaks.push(ChainBreak {
                    sequence_number: node.sequence_number,
                    evidence_id: node.evidence_id.clone(),
                    kind: BreakKind::HashMismatch,
                    expected: String::new(),
                    actual: node.node_hash.clone(),
                });
                expected_chained = node.node_hash.clone();
            }
        }

        expected_stored = node.node_hash.clone();
    }

    VerificationReport {
        valid: breaks.is_empty(),
        nodes_checked: snapshot.nodes.len() as u64,
        breaks,
    }
}
