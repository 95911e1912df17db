//! In-memory lead store.

use leadpool_types::{Lead, LeadFilter, LeadPatch, LeadStore, LeadStoreError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Records {
    /// lead_id -> lead.
    leads: HashMap<String, Lead>,
    /// Insertion order, so `filter` output is stable.
    order: Vec<String>,
}

/// In-memory implementation of LeadStore.
/// Updates merge field by field with no version check, so the last writer wins.
#[derive(Clone)]
pub struct InMemoryLeadStore {
    records: Arc<RwLock<Records>>,
}

impl InMemoryLeadStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Records::default())),
        }
    }

    /// Store seeded with `leads`, in the given order.
    pub fn with_leads(leads: impl IntoIterator<Item = Lead>) -> Self {
        let mut records = Records::default();
        for lead in leads {
            if !records.leads.contains_key(&lead.id) {
                records.order.push(lead.id.clone());
            }
            records.leads.insert(lead.id.clone(), lead);
        }
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.leads.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryLeadStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl LeadStore for InMemoryLeadStore {
    async fn filter(&self, filter: &LeadFilter) -> Result<Vec<Lead>, LeadStoreError> {
        let guard = self.records.read().await;
        Ok(guard
            .order
            .iter()
            .filter_map(|id| guard.leads.get(id))
            .filter(|lead| filter.matches(lead))
            .cloned()
            .collect())
    }

    async fn get(&self, id: &str) -> Result<Option<Lead>, LeadStoreError> {
        Ok(self.records.read().await.leads.get(id).cloned())
    }

    async fn update(&self, id: &str, patch: LeadPatch) -> Result<Lead, LeadStoreError> {
        let mut guard = self.records.write().await;
        let lead = guard
            .leads
            .get_mut(id)
            .ok_or_else(|| LeadStoreError::NotFound(id.to_string()))?;
        patch.apply_to(lead);
        Ok(lead.clone())
    }

    async fn insert(&self, lead: Lead) -> Result<(), LeadStoreError> {
        let mut guard = self.records.write().await;
        if !guard.leads.contains_key(&lead.id) {
            guard.order.push(lead.id.clone());
        }
        guard.leads.insert(lead.id.clone(), lead);
        Ok(())
    }
}
