//! Lead store and audit store implementations.

mod audit;
mod memory;

pub use audit::{InMemoryAuditStore, JsonlAuditStore};
pub use leadpool_types::{
    AuditListOptions, AuditLogEntry, AuditStore, AuditStoreError, Lead, LeadFilter, LeadPatch,
    LeadStore, LeadStoreError,
};
pub use memory::InMemoryLeadStore;
