//! Audit trail entries appended as a side effect of pool actions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Action label recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditAction {
    #[serde(rename = "Lead Reassigned")]
    LeadReassigned,
    #[serde(rename = "Lead Released")]
    LeadReleased,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::LeadReassigned => "Lead Reassigned",
            AuditAction::LeadReleased => "Lead Released",
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One append-only audit entry. Never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: String,
    pub action: AuditAction,
    pub entity_type: String,
    pub entity_id: String,
    pub entity_name: String,
    pub user_id: String,
    pub user_name: String,
    pub details: String,
    pub department: String,
    pub timestamp: DateTime<Utc>,
}

/// Options for listing audit entries (filter + pagination).
#[derive(Debug, Clone, Default)]
pub struct AuditListOptions {
    pub user_id: Option<String>,
    pub entity_id: Option<String>,
    pub action: Option<AuditAction>,
    /// Return entries with timestamp >= since.
    pub since: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl AuditListOptions {
    /// Filter in place, then order newest first and paginate (default limit 100).
    pub fn apply(&self, out: &mut Vec<AuditLogEntry>) {
        if let Some(ref uid) = self.user_id {
            out.retain(|e| &e.user_id == uid);
        }
        if let Some(ref eid) = self.entity_id {
            out.retain(|e| &e.entity_id == eid);
        }
        if let Some(action) = self.action {
            out.retain(|e| e.action == action);
        }
        if let Some(since) = self.since {
            out.retain(|e| e.timestamp >= since);
        }
        out.reverse();
        let offset = self.offset.unwrap_or(0) as usize;
        let limit = self.limit.unwrap_or(100) as usize;
        let taken: Vec<AuditLogEntry> = std::mem::take(out)
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect();
        *out = taken;
    }
}
