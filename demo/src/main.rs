//! Evidentia Payments Reference Runtime — Demo CLI
//!
//! Runs one or all of the four payments demo scenarios.  Each scenario uses
//! real Evidentia components (section validator, chain engine, evidence
//! store, bundle exporter) wired together with mock payments data.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- pan-exposure
//!   cargo run -p demo -- field-encryption
//!   cargo run -p demo -- tamper-detection
//!   cargo run -p demo -- bundle-export

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use evidentia_ref_payments::scenarios::{
    bundle_export, field_encryption, pan_exposure, tamper_detection,
};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Evidentia — Compliance evidence payments demo.
///
/// Each subcommand runs one or all of the four payments scenarios,
/// demonstrating evidence capture, hash chaining, tamper detection, and
/// deterministic bundle export.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "Evidentia payments reference runtime demo",
    long_about = "Runs Evidentia payments demo scenarios showing validated evidence capture,\n\
                  hash-chain integrity, tamper detection, and audit bundle export."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all four payments scenarios in sequence.
    RunAll,
    /// Scenario 1: PAN Exposure (PCI DSS Req 3.4 violation + remediation).
    PanExposure,
    /// Scenario 2: Field Encryption (GDPR Art. 32 detection → remediation).
    FieldEncryption,
    /// Scenario 3: Tamper Detection (break enumeration on an altered copy).
    TamperDetection,
    /// Scenario 4: Bundle Export (deterministic self-verifying ZIP).
    BundleExport,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::RunAll => run_all(),
        Command::PanExposure => pan_exposure::run_scenario(),
        Command::FieldEncryption => field_encryption::run_scenario(),
        Command::TamperDetection => tamper_detection::run_scenario(),
        Command::BundleExport => bundle_export::run_scenario(),
    };

    match result {
        Ok(()) => {
            println!("All selected scenarios completed successfully.");
        }
        Err(e) => {
            eprintln!("Demo error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

fn run_all() -> evidentia_contracts::error::EvidentiaResult<()> {
    pan_exposure::run_scenario()?;
    field_encryption::run_scenario()?;
    tamper_detection::run_scenario()?;
    bundle_export::run_scenario()?;
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("Evidentia — Compliance Evidence Infrastructure");
    println!("Payments Reference Demo");
    println!("==============================================");
    println!();
    println!("Evidence lifecycle per capture:");
    println!("  [1] Section validator checks the capture against event-type requirements");
    println!("  [2] Evidence id and a monotonic capture timestamp are assigned");
    println!("  [3] Chain node built: SHA-256 over sequence, id, previous hash, record");
    println!("  [4] Record and node committed atomically to the ledger");
    println!("  [5] Verification walks the full chain and enumerates every break");
    println!();
}
