//! Runtime error types for the Evidentia evidence ledger.
//!
//! All fallible operations across the Evidentia crates return
//! `EvidentiaResult<T>`. Error variants carry enough context for an operator
//! to act on without consulting logs.
//!
//! Integrity breaks found during chain verification are deliberately NOT an
//! error variant: a damaged chain verifies successfully and reports its
//! damage via `VerificationReport`.

use chrono::{DateTime, Utc};
use thiserror::Error;

/// The unified error type for the Evidentia runtime.
#[derive(Debug, Error)]
pub enum EvidentiaError {
    /// A capture request failed validation before anything was persisted.
    #[error("capture validation failed: {reason}")]
    Validation { reason: String },

    /// No evidence record exists with the requested id.
    #[error("evidence '{evidence_id}' not found")]
    NotFound { evidence_id: String },

    /// The ledger backend could not persist or read data.
    ///
    /// This is treated as fatal for the operation in flight — a capture whose
    /// record and node cannot both land is rejected whole.
    #[error("storage error: {reason}")]
    Storage { reason: String },

    /// A bundle was requested over a window that matched no evidence.
    #[error("no evidence in range {start}..={end} for tenant '{tenant}'")]
    EmptyRange {
        tenant: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    Config { reason: String },

    /// Bundle assembly failed after the evidence window was resolved.
    #[error("bundle export failed: {reason}")]
    Bundle { reason: String },
}

/// Convenience alias used throughout the Evidentia crates.
pub type EvidentiaResult<T> = Result<T, EvidentiaError>;
