//! Traits for the lead store, audit store, and clock, plus their error types.

use crate::{AuditListOptions, AuditLogEntry, Lead, LeadFilter, LeadPatch};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Entity store holding lead records (subset of the backing service's generic CRUD).
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// All leads matching the flag filter, in store order.
    async fn filter(&self, filter: &LeadFilter) -> Result<Vec<Lead>, LeadStoreError>;

    /// Get one lead by id.
    async fn get(&self, id: &str) -> Result<Option<Lead>, LeadStoreError>;

    /// Merge `patch` into the stored lead and return the result.
    /// Returns `NotFound` when the id is unknown.
    async fn update(&self, id: &str, patch: LeadPatch) -> Result<Lead, LeadStoreError>;

    /// Insert or replace a lead.
    async fn insert(&self, lead: Lead) -> Result<(), LeadStoreError>;
}

/// Append-only audit trail.
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn append(&self, entry: AuditLogEntry) -> Result<(), AuditStoreError>;

    /// List entries, newest first, filtered and paginated by `opts`.
    async fn list(&self, opts: &AuditListOptions) -> Result<Vec<AuditLogEntry>, AuditStoreError>;
}

/// Source of "now" for grab timestamps and cooldown math.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LeadStoreError {
    #[error("lead not found: {0}")]
    NotFound(String),
    #[error("lead store error: {0}")]
    Other(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AuditStoreError {
    #[error("audit store error: {0}")]
    Other(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("lead not found: {0}")]
    LeadNotFound(String),
    #[error("lead {0} is not available for grabbing")]
    NotAvailable(String),
    #[error("still working {lead_name}: {remaining_minutes} minute(s) left before another grab")]
    CooldownActive {
        lead_name: String,
        remaining_minutes: i64,
    },
    #[error("store: {0}")]
    Store(#[from] LeadStoreError),
}
