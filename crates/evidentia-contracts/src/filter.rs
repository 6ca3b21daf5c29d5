//! Evidence listing filter.

use crate::chain::ChainNode;
use crate::evidence::{EvidenceRecord, TenantId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Criteria for listing evidence or slicing the chain.
///
/// All bounds are optional and inclusive; an empty filter matches
/// everything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvidenceFilter {
    /// Earliest `captured_at` to include.
    pub from: Option<DateTime<Utc>>,

    /// Latest `captured_at` to include.
    pub to: Option<DateTime<Utc>>,

    /// Tenant tag to match exactly. Records without a tenant never match a
    /// tenant-bearing filter.
    pub tenant: Option<TenantId>,
}

impl EvidenceFilter {
    /// A filter that matches everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to records captured at or after `from`.
    pub fn from(mut self, from: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self
    }

    /// Restrict to records captured at or before `to`.
    pub fn to(mut self, to: DateTime<Utc>) -> Self {
        self.to = Some(to);
        self
    }

    /// Restrict to records carrying this tenant tag.
    pub fn tenant(mut self, tenant: TenantId) -> Self {
        self.tenant = Some(tenant);
        self
    }

    /// Whether a record satisfies every bound in this filter.
    pub fn matches_record(&self, record: &EvidenceRecord) -> bool {
        if let Some(from) = self.from {
            if record.captured_at < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if record.captured_at > to {
                return false;
            }
        }
        if let Some(tenant) = &self.tenant {
            match &record.tenant_id {
                Some(t) if t == tenant => {}
                _ => return false,
            }
        }
        true
    }

    /// Whether a chain node falls inside the time bounds.
    ///
    /// Nodes carry no tenant tag, so only the date bounds apply here; tenant
    /// filtering happens on the records.
    pub fn matches_node(&self, node: &ChainNode) -> bool {
        if let Some(from) = self.from {
            if node.created_at < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if node.created_at > to {
                return false;
            }
        }
        true
    }
}
