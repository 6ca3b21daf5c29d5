//! # evidentia-core
//!
//! The capture orchestrator and trust-boundary traits for the Evidentia
//! evidence ledger.
//!
//! This crate provides:
//! - The three core traits (`CaptureValidator`, `AuditTrail`, `LedgerBackend`)
//! - The `EvidenceStore` that wires them together in the correct order
//!
//! ## Usage
//!
//! ```rust,ignore
//! use evidentia_core::{EvidenceStore, traits::{AuditTrail, CaptureValidator, LedgerBackend}};
//! ```

pub mod store;
pub mod traits;

pub use store::EvidenceStore;
