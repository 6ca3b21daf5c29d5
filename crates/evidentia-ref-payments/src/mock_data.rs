//! Simulated payments data for the Evidentia reference runtime.
//!
//! All data in this module is hardcoded and fictional. No external systems
//! are contacted. This module stands in for the log pipelines, customer
//! databases, and key-management services a production deployment would
//! integrate with.

use serde_json::{json, Value};

// ── Transaction Logs (mock) ───────────────────────────────────────────────────

/// Return mock payment-gateway log lines for the given merchant.
///
/// The third line leaks a full primary account number (the standard
/// "4111 1111 1111 1111" Visa test card) in cleartext, which is the
/// violation Scenario 1 detects.
pub fn get_transaction_log(merchant_id: &str) -> Value {
    json!({
        "merchant_id": merchant_id,
        "source": format!("app/logs/{}/payment-gateway.log", merchant_id),
        "lines": [
            "2026-03-14T09:12:44Z INFO  gateway settled batch 7741 (112 captures)",
            "2026-03-14T09:13:02Z WARN  retry scheduled for auth 9982 after timeout",
            "2026-03-14T09:13:05Z ERROR auth declined for card 4111 1111 1111 1111 (insufficient funds)",
            "2026-03-14T09:13:18Z INFO  refund 4420 issued to customer cust_8817"
        ]
    })
}

// ── PAN Scanner (mock) ────────────────────────────────────────────────────────

/// Scan one log line for an exposed primary account number.
///
/// Runs of digits (spaces and dashes allowed inside the run) with 13 to 19
/// digits are candidate PANs. A candidate that passes the Luhn check is
/// reported with confidence 0.94; a failing candidate drops to 0.40. Lines
/// without a candidate report confidence 0.0.
///
/// The returned value is shaped as a capture `detection` section.
pub fn scan_for_pan(source: &str, line: &str) -> Value {
    let mut candidates: Vec<String> = Vec::new();
    let mut run = String::new();

    // The trailing newline flushes a run that reaches the end of the line.
    for ch in line.chars().chain(std::iter::once('\n')) {
        if ch.is_ascii_digit() || ch == ' ' || ch == '-' {
            run.push(ch);
        } else {
            let digits: String = run.chars().filter(|c| c.is_ascii_digit()).collect();
            if (13..=19).contains(&digits.len()) {
                candidates.push(digits);
            }
            run.clear();
        }
    }

    match candidates.first() {
        Some(pan) => {
            let digits: Vec<u32> = pan.chars().filter_map(|c| c.to_digit(10)).collect();
            let luhn = luhn_valid(&digits);
            let confidence = if luhn { 0.94 } else { 0.40 };
            let masked = format!("{}{}", "*".repeat(pan.len() - 4), &pan[pan.len() - 4..]);

            json!({
                "detected_by": "pan_scanner",
                "detection_method": "pattern_match",
                "confidence": confidence,
                "source": source,
                "matched_digits": pan.len(),
                "luhn_valid": luhn,
                "masked_sample": masked
            })
        }
        None => json!({
            "detected_by": "pan_scanner",
            "detection_method": "pattern_match",
            "confidence": 0.0,
            "source": source,
            "matched_digits": 0,
            "luhn_valid": false
        }),
    }
}

/// Luhn checksum over the digit sequence, most significant first.
fn luhn_valid(digits: &[u32]) -> bool {
    if digits.is_empty() {
        return false;
    }

    let sum: u32 = digits
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| {
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();

    sum % 10 == 0
}

// ── Customer Profiles (mock) ──────────────────────────────────────────────────

/// Return a mock customer profile for the given customer ID.
///
/// The `encryption` map records the at-rest encryption mode per field. The
/// `iban` field is stored in plaintext, which Scenario 2 flags against
/// GDPR Art. 32.
pub fn get_customer_profile(customer_id: &str) -> Value {
    json!({
        "customer_id": customer_id,
        "email": "j.doe@example.com",
        "iban": "DE89 3704 0044 0532 0130 00",
        "encryption": {
            "email": "aes256-gcm",
            "iban": "none"
        },
        "last_updated": "2026-03-10"
    })
}

// ── Field Encryption (mock) ───────────────────────────────────────────────────

/// Simulate envelope encryption of one profile field.
///
/// In a production system this would call the key-management service and
/// rewrite the stored row. Here it returns the outcome a remediation agent
/// would record.
pub fn encrypt_profile_field(customer_id: &str, field: &str) -> Value {
    json!({
        "customer_id": customer_id,
        "field": field,
        "algorithm": "aes256-gcm",
        "key_id": "kms/tenant-keys/org_123/2026-q1",
        "ciphertext_preview": "b64:kf3Qw9xP(truncated)",
        "completed": true
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// The leaked test card in the mock gateway log passes the Luhn check.
    #[test]
    fn test_scanner_finds_leaked_pan() {
        let log = get_transaction_log("merch_4471");
        let line = log["lines"][2].as_str().expect("log line");

        let scan = scan_for_pan("payment-gateway.log", line);

        assert_eq!(scan["matched_digits"], json!(16));
        assert_eq!(scan["luhn_valid"], json!(true));
        assert_eq!(scan["confidence"], json!(0.94));
        assert_eq!(scan["masked_sample"], json!("************1111"));
    }

    /// Lines without a 13-to-19 digit run report zero confidence.
    #[test]
    fn test_scanner_ignores_short_digit_runs() {
        let log = get_transaction_log("merch_4471");
        let line = log["lines"][0].as_str().expect("log line");

        let scan = scan_for_pan("payment-gateway.log", line);

        assert_eq!(scan["matched_digits"], json!(0));
        assert_eq!(scan["confidence"], json!(0.0));
    }

    /// A digit swap breaks the checksum and drops the confidence.
    #[test]
    fn test_luhn_failure_lowers_confidence() {
        let scan = scan_for_pan("test.log", "card 4111 1111 1111 1112 seen");

        assert_eq!(scan["matched_digits"], json!(16));
        assert_eq!(scan["luhn_valid"], json!(false));
        assert_eq!(scan["confidence"], json!(0.40));
    }

    /// The mock profile stores the IBAN unencrypted.
    #[test]
    fn test_profile_iban_is_plaintext() {
        let profile = get_customer_profile("cust_8817");
        assert_eq!(profile["encryption"]["iban"], json!("none"));
        assert_eq!(profile["encryption"]["email"], json!("aes256-gcm"));
    }
}
