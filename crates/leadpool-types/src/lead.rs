//! Lead record, acting user, and the filter/patch shapes the store accepts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lead as stored by the backing entity service (pool-relevant subset).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_open_for_reassignment: bool,
    #[serde(default)]
    pub exclude_from_reassignment: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reassigned_owner_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reassigned_owner_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reassigned_grab_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reassignment_contact_date: Option<DateTime<Utc>>,
    /// Display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_permanent_owner_name: Option<String>,
    /// Display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
}

impl Lead {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Flagged open and not excluded.
    pub fn is_in_pool(&self) -> bool {
        self.is_open_for_reassignment && !self.exclude_from_reassignment
    }

    /// Current holder id. An empty string counts as unclaimed.
    pub fn holder(&self) -> Option<&str> {
        self.reassigned_owner_id
            .as_deref()
            .filter(|id| !id.is_empty())
    }

    pub fn is_available(&self) -> bool {
        self.is_in_pool() && self.holder().is_none()
    }

    pub fn is_held_by(&self, actor_id: &str) -> bool {
        self.holder() == Some(actor_id)
    }
}

/// Identity of the user performing a pool action, supplied by the session layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub name: String,
}

impl Actor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Actor whose display name is `name`, or `id` when `name` is blank.
    pub fn display_or_id(id: &str, name: &str) -> Self {
        let name = name.trim();
        Self::new(id, if name.is_empty() { id } else { name })
    }
}

/// Equality filter over lead flags. `None` fields match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadFilter {
    pub is_open_for_reassignment: Option<bool>,
    pub exclude_from_reassignment: Option<bool>,
    pub reassigned_owner_id: Option<String>,
}

impl LeadFilter {
    /// Leads flagged open and not excluded.
    pub fn open_pool() -> Self {
        Self {
            is_open_for_reassignment: Some(true),
            exclude_from_reassignment: Some(false),
            reassigned_owner_id: None,
        }
    }

    pub fn matches(&self, lead: &Lead) -> bool {
        if let Some(open) = self.is_open_for_reassignment {
            if lead.is_open_for_reassignment != open {
                return false;
            }
        }
        if let Some(excluded) = self.exclude_from_reassignment {
            if lead.exclude_from_reassignment != excluded {
                return false;
            }
        }
        if let Some(ref owner) = self.reassigned_owner_id {
            if lead.holder() != Some(owner.as_str()) {
                return false;
            }
        }
        true
    }
}

/// One field of a partial update: leave it, null it, or overwrite it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    Keep,
    Clear,
    Set(T),
}

impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        FieldUpdate::Keep
    }
}

impl<T> FieldUpdate<T> {
    pub fn apply(self, slot: &mut Option<T>) {
        match self {
            FieldUpdate::Keep => {}
            FieldUpdate::Clear => *slot = None,
            FieldUpdate::Set(v) => *slot = Some(v),
        }
    }
}

/// Partial-field merge update for a lead. No concurrency token: last write wins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LeadPatch {
    pub reassigned_owner_id: FieldUpdate<String>,
    pub reassigned_owner_name: FieldUpdate<String>,
    pub reassigned_grab_date: FieldUpdate<DateTime<Utc>>,
    pub last_reassignment_contact_date: FieldUpdate<DateTime<Utc>>,
    pub is_open_for_reassignment: Option<bool>,
    pub exclude_from_reassignment: Option<bool>,
}

impl LeadPatch {
    /// Claim for `actor` at `now`; always clears the contact timestamp.
    pub fn grab(actor: &Actor, now: DateTime<Utc>) -> Self {
        Self {
            reassigned_owner_id: FieldUpdate::Set(actor.id.clone()),
            reassigned_owner_name: FieldUpdate::Set(actor.name.clone()),
            reassigned_grab_date: FieldUpdate::Set(now),
            last_reassignment_contact_date: FieldUpdate::Clear,
            ..Default::default()
        }
    }

    /// Clear all four ownership fields.
    pub fn release() -> Self {
        Self {
            reassigned_owner_id: FieldUpdate::Clear,
            reassigned_owner_name: FieldUpdate::Clear,
            reassigned_grab_date: FieldUpdate::Clear,
            last_reassignment_contact_date: FieldUpdate::Clear,
            ..Default::default()
        }
    }

    pub fn contact(at: DateTime<Utc>) -> Self {
        Self {
            last_reassignment_contact_date: FieldUpdate::Set(at),
            ..Default::default()
        }
    }

    pub fn apply_to(self, lead: &mut Lead) {
        self.reassigned_owner_id.apply(&mut lead.reassigned_owner_id);
        self.reassigned_owner_name
            .apply(&mut lead.reassigned_owner_name);
        self.reassigned_grab_date
            .apply(&mut lead.reassigned_grab_date);
        self.last_reassignment_contact_date
            .apply(&mut lead.last_reassignment_contact_date);
        if let Some(open) = self.is_open_for_reassignment {
            lead.is_open_for_reassignment = open;
        }
        if let Some(excluded) = self.exclude_from_reassignment {
            lead.exclude_from_reassignment = excluded;
        }
    }
}
