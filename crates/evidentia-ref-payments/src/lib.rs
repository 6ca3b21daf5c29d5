//! # evidentia-ref-payments
//!
//! Payments reference runtime for the Evidentia compliance evidence system.
//!
//! Demonstrates four compliance scenarios using mock data:
//!
//! 1. **PAN Exposure** — a primary account number leaks into a gateway log;
//!    the violation and its masking remediation land on the hash chain.
//! 2. **Field Encryption** — a plaintext IBAN flagged under GDPR Art. 32
//!    moves through detection, agent decision, and encryption remediation.
//! 3. **Tamper Detection** — a copied ledger snapshot is altered and the
//!    verification walk pinpoints every resulting break.
//! 4. **Bundle Export** — one tenant's evidence is exported twice as a
//!    deterministic, self-verifying ZIP bundle.
//!
//! All data is hardcoded and fictional. No external systems are contacted.

pub mod mock_data;
pub mod scenarios;
