//! Request and response DTOs for the pool API.

use crate::{Actor, Lead};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Base response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseResponse<T> {
    #[serde(default = "default_code")]
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

fn default_code() -> i32 {
    200
}

impl<T> BaseResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 200,
            message: "Success".to_string(),
            data: Some(data),
        }
    }

    pub fn error(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }
}

/// Grab or release request: one lead, one acting user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadActionRequest {
    pub lead_id: String,
    pub actor_id: String,
    #[serde(default)]
    pub actor_name: String,
}

impl LeadActionRequest {
    /// Acting user; a blank `actor_name` falls back to `actor_id` for display.
    pub fn actor(&self) -> Actor {
        Actor::display_or_id(&self.actor_id, &self.actor_name)
    }
}

/// Contact activity logged against a held lead. `contacted_at` defaults to now.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordContactRequest {
    pub lead_id: String,
    #[serde(default)]
    pub contacted_at: Option<DateTime<Utc>>,
}

/// Result of the cooldown gate for one actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Eligibility {
    Eligible,
    Blocked {
        lead_id: String,
        lead_name: String,
        remaining_minutes: i64,
    },
}

impl Eligibility {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible)
    }

    pub fn remaining_minutes(&self) -> i64 {
        match self {
            Eligibility::Eligible => 0,
            Eligibility::Blocked {
                remaining_minutes, ..
            } => *remaining_minutes,
        }
    }
}

/// Informational hold window for a held lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldWindow {
    pub days_remaining: i64,
    pub urgent: bool,
}

/// A lead in the actor's "mine" view with its hold window (absent without a grab date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeldLead {
    #[serde(flatten)]
    pub lead: Lead,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hold: Option<HoldWindow>,
}

/// Pool view for one actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub available: Vec<Lead>,
    pub mine: Vec<HeldLead>,
    pub others: Vec<Lead>,
    pub eligibility: Eligibility,
}

/// Result of a grab or release: the updated lead and whether its audit entry landed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub lead: Lead,
    pub audit_recorded: bool,
}

pub type PoolResponse = BaseResponse<PoolSnapshot>;
pub type EligibilityResponse = BaseResponse<Eligibility>;
pub type ActionResponse = BaseResponse<ActionOutcome>;
pub type LeadResponse = BaseResponse<Lead>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_request_without_name_uses_id_for_display() {
        let req: LeadActionRequest =
            serde_json::from_str(r#"{"lead_id":"l1","actor_id":"u7"}"#).unwrap();
        assert_eq!(req.actor(), Actor::new("u7", "u7"));

        let req: LeadActionRequest =
            serde_json::from_str(r#"{"lead_id":"l1","actor_id":"u7","actor_name":"  "}"#).unwrap();
        assert_eq!(req.actor().name, "u7");
    }

    #[test]
    fn action_request_keeps_given_name() {
        let req: LeadActionRequest =
            serde_json::from_str(r#"{"lead_id":"l1","actor_id":"u7","actor_name":"Uma"}"#)
                .unwrap();
        assert_eq!(req.actor(), Actor::new("u7", "Uma"));
    }
}
