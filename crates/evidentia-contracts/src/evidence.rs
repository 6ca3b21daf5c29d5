//! Evidence record types.
//!
//! `EvidenceRecord` is the immutable value at the center of the system: one
//! captured compliance event with its structured payload sections. Records
//! are frozen at capture time — their canonical JSON form is the input to
//! the hash chain, so nothing here is ever mutated after construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Globally unique identifier for one evidence record.
///
/// String form: `EVID-{unix_seconds}-{SUFFIX}` where SUFFIX is the first six
/// hex characters of a v4 UUID, uppercased. Assigned once at capture time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvidenceId(pub String);

impl EvidenceId {
    /// Mint a fresh identifier stamped with the capture time.
    ///
    /// The UUID suffix keeps ids unique even when two captures land in the
    /// same second.
    pub fn generate(captured_at: DateTime<Utc>) -> Self {
        let uuid_hex = uuid::Uuid::new_v4().simple().to_string();
        let suffix = uuid_hex[..6].to_uppercase();
        Self(format!("EVID-{}-{}", captured_at.timestamp(), suffix))
    }

    /// View the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EvidenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque tenant identifier, used only for filtering.
///
/// The core does not partition storage by tenant; this tag is matched
/// verbatim by `EvidenceFilter` and the bundle exporter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TenantId(pub String);

impl TenantId {
    /// Construct a tenant id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// View the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The closed set of compliance event kinds a record can describe.
///
/// Serialized snake_case; the same strings key the required-section table in
/// the capture validation config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A regulation violation was observed.
    Violation,
    /// A remediation action was executed.
    Remediation,
    /// A detector flagged something without a confirmed violation.
    Detection,
    /// A scheduled or on-demand policy check ran.
    PolicyCheck,
    /// An autonomous agent made a compliance-relevant decision.
    AgentDecision,
}

impl EventType {
    /// Every event type, in declaration order.
    pub const ALL: [EventType; 5] = [
        EventType::Violation,
        EventType::Remediation,
        EventType::Detection,
        EventType::PolicyCheck,
        EventType::AgentDecision,
    ];

    /// The snake_case name used in serialization, config, and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Violation => "violation",
            EventType::Remediation => "remediation",
            EventType::Detection => "detection",
            EventType::PolicyCheck => "policy_check",
            EventType::AgentDecision => "agent_decision",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One captured compliance event.
///
/// Payload sections are structured JSON maps validated at capture time
/// against the per-event-type requirements config. Field declaration order
/// here IS the canonical serialization order the chain hashes — do not
/// reorder fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    /// Unique identifier, assigned at capture.
    pub evidence_id: EvidenceId,

    /// What kind of event this record describes.
    pub event_type: EventType,

    /// Opaque tenant tag for filtering, if the caller supplied one.
    pub tenant_id: Option<TenantId>,

    /// Capture time (UTC). Non-decreasing across records in capture order.
    pub captured_at: DateTime<Utc>,

    /// Regulation framework and clause details. Always required.
    pub regulation: Value,

    /// How the event was detected (detector, method, confidence). Always required.
    pub detection: Value,

    /// Before/after violation snapshots. Required for `Violation` events.
    pub violation_state: Option<Value>,

    /// Remediation action details. Required for `Remediation` events.
    pub remediation: Option<Value>,

    /// Agent reasoning and decision path.
    pub reasoning_chain: Option<Value>,

    /// Links to related evidence, policies, or controls.
    pub linkages: Option<Value>,

    /// Additional free-form metadata.
    pub metadata: Option<Value>,
}

/// A capture request: everything the caller provides, before the store
/// assigns identity and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureRequest {
    /// What kind of event is being captured.
    pub event_type: EventType,

    /// Opaque tenant tag, if any.
    pub tenant_id: Option<TenantId>,

    /// Regulation framework and clause details.
    pub regulation: Value,

    /// Detection information.
    pub detection: Value,

    /// Before/after violation snapshots.
    pub violation_state: Option<Value>,

    /// Remediation action details.
    pub remediation: Option<Value>,

    /// Agent reasoning and decision path.
    pub reasoning_chain: Option<Value>,

    /// Links to related evidence, policies, or controls.
    pub linkages: Option<Value>,

    /// Additional free-form metadata.
    pub metadata: Option<Value>,
}

impl CaptureRequest {
    /// The payload section names, in record field order.
    pub const SECTION_NAMES: [&'static str; 7] = [
        "regulation",
        "detection",
        "violation_state",
        "remediation",
        "reasoning_chain",
        "linkages",
        "metadata",
    ];

    /// Look up a payload section by name.
    ///
    /// Returns `None` for an unknown name or an absent optional section.
    /// `regulation` and `detection` always return `Some` (the fields exist
    /// even when their value is null).
    pub fn section(&self, name: &str) -> Option<&Value> {
        match name {
            "regulation" => Some(&self.regulation),
            "detection" => Some(&self.detection),
            "violation_state" => self.violation_state.as_ref(),
            "remediation" => self.remediation.as_ref(),
            "reasoning_chain" => self.reasoning_chain.as_ref(),
            "linkages" => self.linkages.as_ref(),
            "metadata" => self.metadata.as_ref(),
            _ => None,
        }
    }

    /// Start a request with the two always-required sections.
    pub fn new(event_type: EventType, regulation: Value, detection: Value) -> Self {
        Self {
            event_type,
            tenant_id: None,
            regulation,
            detection,
            violation_state: None,
            remediation: None,
            reasoning_chain: None,
            linkages: None,
            metadata: None,
        }
    }

    /// Attach a tenant tag.
    pub fn with_tenant(mut self, tenant: TenantId) -> Self {
        self.tenant_id = Some(tenant);
        self
    }

    /// Attach before/after violation snapshots.
    pub fn with_violation_state(mut self, state: Value) -> Self {
        self.violation_state = Some(state);
        self
    }

    /// Attach remediation action details.
    pub fn with_remediation(mut self, remediation: Value) -> Self {
        self.remediation = Some(remediation);
        self
    }

    /// Attach the agent reasoning chain.
    pub fn with_reasoning_chain(mut self, reasoning: Value) -> Self {
        self.reasoning_chain = Some(reasoning);
        self
    }

    /// Attach linkage references.
    pub fn with_linkages(mut self, linkages: Value) -> Self {
        self.linkages = Some(linkages);
        self
    }

    /// Attach free-form metadata.
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Freeze this request into a record with the assigned identity.
    ///
    /// Called by the evidence store under its capture lock; nothing else
    /// constructs records.
    pub fn into_record(self, evidence_id: EvidenceId, captured_at: DateTime<Utc>) -> EvidenceRecord {
        EvidenceRecord {
            evidence_id,
            event_type: self.event_type,
            tenant_id: self.tenant_id,
            captured_at,
            regulation: self.regulation,
            detection: self.detection,
            violation_state: self.violation_state,
            remediation: self.remediation,
            reasoning_chain: self.reasoning_chain,
            linkages: self.linkages,
            metadata: self.metadata,
        }
    }
}
