//! ReassignmentPool: grab/release workflow over a lead store and an audit trail.

use crate::gate::{check_cooldown, days_remaining, partition, CooldownConfig, PoolPartition};
use chrono::{DateTime, Utc};
use leadpool_types::*;
use std::sync::Arc;
use uuid::Uuid;

/// Grab/release service for the open leads pool.
///
/// Each action is two independent store calls: the lead update, then the audit append.
/// An audit failure is logged and reported in the outcome; the update is not rolled back.
/// There is no version check on the lead, so concurrent grabs resolve by last write.
pub struct ReassignmentPool {
    leads: Arc<dyn LeadStore>,
    audit: Arc<dyn AuditStore>,
    clock: Arc<dyn Clock>,
    config: CooldownConfig,
}

fn store_err(id: &str, e: LeadStoreError) -> PoolError {
    match e {
        LeadStoreError::NotFound(_) => PoolError::LeadNotFound(id.to_string()),
        other => PoolError::Store(other),
    }
}

impl ReassignmentPool {
    pub fn new(leads: Arc<dyn LeadStore>, audit: Arc<dyn AuditStore>) -> Self {
        Self {
            leads,
            audit,
            clock: Arc::new(SystemClock),
            config: CooldownConfig::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_config(mut self, config: CooldownConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CooldownConfig {
        &self.config
    }

    /// Partition the current pool for `actor`.
    pub async fn partition_for(&self, actor: &Actor) -> Result<PoolPartition, PoolError> {
        let leads = self.leads.filter(&LeadFilter::open_pool()).await?;
        Ok(partition(leads, &actor.id))
    }

    /// Pool view for `actor`: the three partitions, the gate, and hold windows on held leads.
    pub async fn snapshot(&self, actor: &Actor) -> Result<PoolSnapshot, PoolError> {
        let now = self.clock.now();
        let parts = self.partition_for(actor).await?;
        let eligibility = check_cooldown(&parts.mine, now, &self.config);
        let mine = parts
            .mine
            .into_iter()
            .map(|lead| HeldLead {
                hold: lead
                    .reassigned_grab_date
                    .map(|grabbed| days_remaining(grabbed, now, &self.config)),
                lead,
            })
            .collect();
        Ok(PoolSnapshot {
            available: parts.available,
            mine,
            others: parts.others,
            eligibility,
        })
    }

    pub async fn eligibility(&self, actor: &Actor) -> Result<Eligibility, PoolError> {
        let parts = self.partition_for(actor).await?;
        Ok(check_cooldown(&parts.mine, self.clock.now(), &self.config))
    }

    /// Claim `lead` for `actor`. Does not re-check availability or cooldown.
    pub async fn grab(&self, lead: &Lead, actor: &Actor) -> Result<ActionOutcome, PoolError> {
        let now = self.clock.now();
        let updated = self
            .leads
            .update(&lead.id, LeadPatch::grab(actor, now))
            .await
            .map_err(|e| store_err(&lead.id, e))?;
        tracing::info!(lead_id = %updated.id, actor_id = %actor.id, "lead grabbed");

        let mut details = format!(
            "{} grabbed lead \"{}\" from the open leads pool",
            actor.name, updated.name
        );
        if let Some(prev) = updated
            .last_permanent_owner_name
            .as_deref()
            .or(updated.owner_name.as_deref())
        {
            details.push_str(&format!(" (previous owner: {})", prev));
        }
        let audit_recorded = self
            .append_audit(AuditAction::LeadReassigned, &updated, actor, details, now)
            .await;
        Ok(ActionOutcome {
            lead: updated,
            audit_recorded,
        })
    }

    /// Grab by id after the caller-side checks: the lead must be available and the
    /// actor's cooldown must have lapsed.
    pub async fn try_grab(&self, lead_id: &str, actor: &Actor) -> Result<ActionOutcome, PoolError> {
        let parts = self.partition_for(actor).await?;
        let Some(lead) = parts.available.iter().find(|l| l.id == lead_id) else {
            return match self.leads.get(lead_id).await? {
                Some(_) => Err(PoolError::NotAvailable(lead_id.to_string())),
                None => Err(PoolError::LeadNotFound(lead_id.to_string())),
            };
        };
        if let Eligibility::Blocked {
            lead_name,
            remaining_minutes,
            ..
        } = check_cooldown(&parts.mine, self.clock.now(), &self.config)
        {
            tracing::debug!(actor_id = %actor.id, remaining_minutes, "grab blocked by cooldown");
            return Err(PoolError::CooldownActive {
                lead_name,
                remaining_minutes,
            });
        }
        self.grab(lead, actor).await
    }

    /// Return `lead` to the pool. Does not verify that `actor` holds it.
    pub async fn release(&self, lead: &Lead, actor: &Actor) -> Result<ActionOutcome, PoolError> {
        let now = self.clock.now();
        let updated = self
            .leads
            .update(&lead.id, LeadPatch::release())
            .await
            .map_err(|e| store_err(&lead.id, e))?;
        tracing::info!(lead_id = %updated.id, actor_id = %actor.id, "lead released");

        let details = format!(
            "{} released lead \"{}\" back to the open leads pool",
            actor.name, updated.name
        );
        let audit_recorded = self
            .append_audit(AuditAction::LeadReleased, &updated, actor, details, now)
            .await;
        Ok(ActionOutcome {
            lead: updated,
            audit_recorded,
        })
    }

    pub async fn release_by_id(
        &self,
        lead_id: &str,
        actor: &Actor,
    ) -> Result<ActionOutcome, PoolError> {
        let lead = self
            .leads
            .get(lead_id)
            .await?
            .ok_or_else(|| PoolError::LeadNotFound(lead_id.to_string()))?;
        self.release(&lead, actor).await
    }

    /// Log a contact activity on a lead; a contact after the grab lifts the holder's cooldown.
    pub async fn record_contact(
        &self,
        lead_id: &str,
        at: Option<DateTime<Utc>>,
    ) -> Result<Lead, PoolError> {
        let at = at.unwrap_or_else(|| self.clock.now());
        let updated = self
            .leads
            .update(lead_id, LeadPatch::contact(at))
            .await
            .map_err(|e| store_err(lead_id, e))?;
        tracing::info!(lead_id = %lead_id, contacted_at = %at, "contact recorded");
        Ok(updated)
    }

    async fn append_audit(
        &self,
        action: AuditAction,
        lead: &Lead,
        actor: &Actor,
        details: String,
        at: DateTime<Utc>,
    ) -> bool {
        let entry = AuditLogEntry {
            id: Uuid::new_v4().to_string(),
            action,
            entity_type: "Lead".to_string(),
            entity_id: lead.id.clone(),
            entity_name: lead.name.clone(),
            user_id: actor.id.clone(),
            user_name: actor.name.clone(),
            details,
            department: self.config.department.clone(),
            timestamp: at,
        };
        match self.audit.append(entry).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(lead_id = %lead.id, action = %action, error = %e, "audit append failed; lead update kept");
                false
            }
        }
    }
}
