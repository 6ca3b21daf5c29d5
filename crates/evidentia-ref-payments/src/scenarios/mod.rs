//! Payments reference runtime demo scenarios.
//!
//! Each scenario is a self-contained module that wires up real Evidentia
//! components (section validator, in-memory ledger, chain engine, evidence
//! store, bundle exporter) with mock payments data and demonstrates a
//! distinct part of the evidence lifecycle.

pub mod bundle_export;
pub mod field_encryption;
pub mod pan_exposure;
pub mod tamper_detection;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    /// Every scenario runs to completion on its own fresh chain.
    #[test]
    fn test_pan_exposure_runs_clean() {
        super::pan_exposure::run_scenario().expect("scenario 1");
    }

    #[test]
    fn test_field_encryption_runs_clean() {
        super::field_encryption::run_scenario().expect("scenario 2");
    }

    #[test]
    fn test_tamper_detection_runs_clean() {
        super::tamper_detection::run_scenario().expect("scenario 3");
    }

    #[test]
    fn test_bundle_export_runs_clean() {
        super::bundle_export::run_scenario().expect("scenario 4");
    }
}
