//! Deterministic compliance bundle export.
//!
//! ## Overview
//!
//! Turns a ledger snapshot into a self-verifying ZIP archive: the evidence
//! records for one tenant and time window, the hash-chain segment covering
//! that window, a full-chain verification report, a machine-readable
//! decision log, and a human-readable summary. The same snapshot and
//! request always produce the same bytes, so an auditor can re-export and
//! diff against a bundle received earlier.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use evidentia_bundle::{BundleExporter, BundleRequest};
//!
//! let exporter = BundleExporter::new(trail);
//! let request = BundleRequest::new(TenantId::new("org_123"), start, end);
//! let bytes = exporter.generate(&request)?;
//! std::fs::write("evidence_bundle.zip", &bytes)?;
//! ```

pub mod exporter;
pub mod manifest;
pub mod report;

pub use exporter::{build_bundle, BundleExporter, BundleRequest};
pub use manifest::{BundleManifest, ChainSummary, DateRange, VerificationSummary, BUNDLE_VERSION};
pub use report::{render_decision_log, render_summary, render_verification_text};

// ── Tests ─────────────────────────────────────────────────────────────────────
