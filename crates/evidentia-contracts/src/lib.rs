//! # evidentia-contracts
//!
//! Shared types and contracts for the Evidentia evidence ledger.
//!
//! All crates in the workspace import from here. No business logic lives in
//! this crate — only data definitions and error types.

pub mod chain;
pub mod error;
pub mod evidence;
pub mod filter;

pub use chain::{
    BreakKind, ChainBreak, ChainNode, LedgerSnapshot, VerificationReport, GENESIS_HASH,
};
pub use error::{EvidentiaError, EvidentiaResult};
pub use evidence::{CaptureRequest, EvidenceId, EvidenceRecord, EventType, TenantId};
pub use filter::EvidenceFilter;
