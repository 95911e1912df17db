//! Pure pool logic: partition by holder, cooldown gate, and hold window.

use chrono::{DateTime, Utc};
use leadpool_types::{Eligibility, HoldWindow, Lead};
use std::str::FromStr;

const MS_PER_MINUTE: i64 = 60_000;

/// Which held leads the cooldown gate inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeldLeadPolicy {
    /// Only the first held lead in pool order gates a new grab.
    #[default]
    FirstHeld,
    /// Every held lead must be past its cooldown; the first blocker is reported.
    AllHeld,
}

impl FromStr for HeldLeadPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "first_held" => Ok(HeldLeadPolicy::FirstHeld),
            "all" | "all_held" => Ok(HeldLeadPolicy::AllHeld),
            other => Err(format!("unknown held lead policy: {}", other)),
        }
    }
}

/// Thresholds for the pool. The cooldown (minutes) and hold window (days) are unrelated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CooldownConfig {
    pub cooldown_minutes: i64,
    pub hold_days: i64,
    /// Hold windows at or below this many days are flagged urgent.
    pub urgent_days: i64,
    pub policy: HeldLeadPolicy,
    /// Department tag written on audit entries.
    pub department: String,
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            cooldown_minutes: 10,
            hold_days: 10,
            urgent_days: 3,
            policy: HeldLeadPolicy::FirstHeld,
            department: "Sales".to_string(),
        }
    }
}

/// Disjoint views of the pool for one actor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoolPartition {
    pub available: Vec<Lead>,
    pub mine: Vec<Lead>,
    pub others: Vec<Lead>,
}

impl PoolPartition {
    pub fn len(&self) -> usize {
        self.available.len() + self.mine.len() + self.others.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split pool leads into available / mine / others' by `reassigned_owner_id`.
/// Relative order within each view follows the input.
pub fn partition(leads: impl IntoIterator<Item = Lead>, actor_id: &str) -> PoolPartition {
    let mut out = PoolPartition::default();
    for lead in leads {
        match lead.holder() {
            None => out.available.push(lead),
            Some(holder) if holder == actor_id => out.mine.push(lead),
            Some(_) => out.others.push(lead),
        }
    }
    out
}

/// Whole minutes between two instants, floored.
fn elapsed_minutes(from: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - from).num_milliseconds().div_euclid(MS_PER_MINUTE)
}

/// Remaining cooldown on one held lead, or `None` if it no longer blocks.
fn blocking_minutes(lead: &Lead, now: DateTime<Utc>, cooldown_minutes: i64) -> Option<i64> {
    // No grab date: nothing to time against.
    let grabbed = lead.reassigned_grab_date?;
    let elapsed = elapsed_minutes(grabbed, now);
    if elapsed >= cooldown_minutes {
        return None;
    }
    if matches!(lead.last_reassignment_contact_date, Some(contact) if contact > grabbed) {
        return None;
    }
    Some((cooldown_minutes - elapsed).max(0))
}

/// Decide whether the holder of `mine` may grab another lead at `now`.
pub fn check_cooldown(mine: &[Lead], now: DateTime<Utc>, config: &CooldownConfig) -> Eligibility {
    let inspected = match config.policy {
        HeldLeadPolicy::FirstHeld => &mine[..mine.len().min(1)],
        HeldLeadPolicy::AllHeld => mine,
    };
    for lead in inspected {
        if let Some(remaining_minutes) = blocking_minutes(lead, now, config.cooldown_minutes) {
            return Eligibility::Blocked {
                lead_id: lead.id.clone(),
                lead_name: lead.name.clone(),
                remaining_minutes,
            };
        }
    }
    Eligibility::Eligible
}

/// Days left in the hold window for a lead grabbed at `grab_date`. Informational only.
pub fn days_remaining(grab_date: DateTime<Utc>, now: DateTime<Utc>, config: &CooldownConfig) -> HoldWindow {
    let held_days = (now - grab_date).num_days();
    let days_remaining = (config.hold_days - held_days).max(0);
    HoldWindow {
        days_remaining,
        urgent: days_remaining <= config.urgent_days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 8, 10, 0, 0).unwrap()
    }

    fn pooled(id: &str, holder: Option<&str>) -> Lead {
        Lead {
            is_open_for_reassignment: true,
            reassigned_owner_id: holder.map(str::to_string),
            ..Lead::new(id, format!("Lead {}", id))
        }
    }

    fn held(id: &str, grabbed: DateTime<Utc>, contact: Option<DateTime<Utc>>) -> Lead {
        Lead {
            reassigned_grab_date: Some(grabbed),
            last_reassignment_contact_date: contact,
            ..pooled(id, Some("a"))
        }
    }

    #[test]
    fn partition_is_complete_and_disjoint() {
        let leads = vec![
            pooled("1", None),
            pooled("2", Some("a")),
            pooled("3", Some("b")),
            pooled("4", Some("")),
            pooled("5", Some("a")),
        ];
        let p = partition(leads.clone(), "a");
        assert_eq!(p.len(), leads.len());
        let ids = |v: &[Lead]| v.iter().map(|l| l.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&p.available), vec!["1", "4"]);
        assert_eq!(ids(&p.mine), vec!["2", "5"]);
        assert_eq!(ids(&p.others), vec!["3"]);
    }

    #[test]
    fn no_held_lead_is_eligible() {
        assert!(check_cooldown(&[], t0(), &CooldownConfig::default()).is_eligible());
    }

    #[test]
    fn exactly_ten_minutes_is_eligible() {
        let mine = [held("1", t0(), None)];
        let now = t0() + Duration::minutes(10);
        assert!(check_cooldown(&mine, now, &CooldownConfig::default()).is_eligible());
    }

    #[test]
    fn just_under_ten_minutes_blocks_with_one_minute_left() {
        let mine = [held("1", t0(), None)];
        let now = t0() + Duration::minutes(9) + Duration::seconds(59);
        let gate = check_cooldown(&mine, now, &CooldownConfig::default());
        assert_eq!(
            gate,
            Eligibility::Blocked {
                lead_id: "1".to_string(),
                lead_name: "Lead 1".to_string(),
                remaining_minutes: 1,
            }
        );
    }

    #[test]
    fn contact_after_grab_lifts_cooldown() {
        let mine = [held("1", t0(), Some(t0() + Duration::minutes(1)))];
        let now = t0() + Duration::minutes(2);
        assert!(check_cooldown(&mine, now, &CooldownConfig::default()).is_eligible());
    }

    #[test]
    fn contact_before_or_at_grab_does_not_count() {
        let now = t0() + Duration::minutes(3);
        let before = [held("1", t0(), Some(t0() - Duration::milliseconds(1)))];
        assert_eq!(check_cooldown(&before, now, &CooldownConfig::default()).remaining_minutes(), 7);
        let same = [held("1", t0(), Some(t0()))];
        assert!(!check_cooldown(&same, now, &CooldownConfig::default()).is_eligible());
    }

    #[test]
    fn held_lead_without_grab_date_does_not_block() {
        let mine = [pooled("1", Some("a"))];
        assert!(check_cooldown(&mine, t0(), &CooldownConfig::default()).is_eligible());
    }

    #[test]
    fn grab_date_in_future_reports_full_wait() {
        let mine = [held("1", t0() + Duration::seconds(30), None)];
        assert_eq!(check_cooldown(&mine, t0(), &CooldownConfig::default()).remaining_minutes(), 11);
    }

    #[test]
    fn first_held_policy_ignores_later_leads() {
        let now = t0() + Duration::minutes(20);
        let mine = [
            held("old", t0(), None),
            held("fresh", now - Duration::minutes(1), None),
        ];
        assert!(check_cooldown(&mine, now, &CooldownConfig::default()).is_eligible());

        let all = CooldownConfig {
            policy: HeldLeadPolicy::AllHeld,
            ..Default::default()
        };
        match check_cooldown(&mine, now, &all) {
            Eligibility::Blocked { lead_id, remaining_minutes, .. } => {
                assert_eq!(lead_id, "fresh");
                assert_eq!(remaining_minutes, 9);
            }
            other => panic!("expected blocked, got {:?}", other),
        }
    }

    #[test]
    fn hold_window_counts_whole_days() {
        let cfg = CooldownConfig::default();
        let w = days_remaining(t0(), t0() + Duration::days(2) + Duration::hours(23), &cfg);
        assert_eq!(w, HoldWindow { days_remaining: 8, urgent: false });
        let w = days_remaining(t0(), t0() + Duration::days(7), &cfg);
        assert_eq!(w, HoldWindow { days_remaining: 3, urgent: true });
        let w = days_remaining(t0(), t0() + Duration::days(12), &cfg);
        assert_eq!(w, HoldWindow { days_remaining: 0, urgent: true });
    }

    #[test]
    fn policy_parses_from_env_values() {
        assert_eq!("first".parse::<HeldLeadPolicy>(), Ok(HeldLeadPolicy::FirstHeld));
        assert_eq!(" ALL ".parse::<HeldLeadPolicy>(), Ok(HeldLeadPolicy::AllHeld));
        assert!("some".parse::<HeldLeadPolicy>().is_err());
    }
}
