//! Startup configuration read from environment variables.

use leadpool_engine::{CooldownConfig, HeldLeadPolicy};
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_LISTEN: &str = "0.0.0.0:8002";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {var}: {message}")]
    Invalid { var: &'static str, message: String },
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub listen_addr: SocketAddr,
    /// JSONL audit file; in-memory audit when unset.
    pub audit_log_path: Option<PathBuf>,
    /// JSON array of leads loaded into the store at startup.
    pub seed_path: Option<PathBuf>,
    pub pool: CooldownConfig,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = CooldownConfig::default();

        let listen_addr: SocketAddr = get("LEADPOOL_LISTEN")
            .unwrap_or_else(|| DEFAULT_LISTEN.to_string())
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                var: "LEADPOOL_LISTEN",
                message: e.to_string(),
            })?;

        let non_negative = |var: &'static str, default: i64| -> Result<i64, ConfigError> {
            match get(var) {
                None => Ok(default),
                Some(raw) => match raw.trim().parse::<i64>() {
                    Ok(n) if n >= 0 => Ok(n),
                    Ok(n) => Err(ConfigError::Invalid {
                        var,
                        message: format!("must not be negative, got {}", n),
                    }),
                    Err(e) => Err(ConfigError::Invalid {
                        var,
                        message: e.to_string(),
                    }),
                },
            }
        };

        let policy = match get("LEADPOOL_HELD_LEAD_POLICY") {
            None => defaults.policy,
            Some(raw) => raw
                .parse::<HeldLeadPolicy>()
                .map_err(|message| ConfigError::Invalid {
                    var: "LEADPOOL_HELD_LEAD_POLICY",
                    message,
                })?,
        };

        Ok(Self {
            listen_addr,
            audit_log_path: get("LEADPOOL_AUDIT_LOG").map(PathBuf::from),
            seed_path: get("LEADPOOL_SEED").map(PathBuf::from),
            pool: CooldownConfig {
                cooldown_minutes: non_negative("LEADPOOL_COOLDOWN_MINUTES", defaults.cooldown_minutes)?,
                hold_days: non_negative("LEADPOOL_HOLD_DAYS", defaults.hold_days)?,
                urgent_days: non_negative("LEADPOOL_URGENT_DAYS", defaults.urgent_days)?,
                policy,
                department: get("LEADPOOL_DEPARTMENT").unwrap_or(defaults.department),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = ApiConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.listen_addr.to_string(), DEFAULT_LISTEN);
        assert!(cfg.audit_log_path.is_none());
        assert_eq!(cfg.pool, CooldownConfig::default());
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = ApiConfig::from_lookup(lookup(&[
            ("LEADPOOL_LISTEN", "127.0.0.1:9000"),
            ("LEADPOOL_AUDIT_LOG", "/tmp/audit.jsonl"),
            ("LEADPOOL_COOLDOWN_MINUTES", "15"),
            ("LEADPOOL_HELD_LEAD_POLICY", "all"),
            ("LEADPOOL_DEPARTMENT", "Customer Service"),
            ("LEADPOOL_HOLD_DAYS", " "),
        ]))
        .unwrap();
        assert_eq!(cfg.listen_addr.port(), 9000);
        assert_eq!(cfg.audit_log_path, Some(PathBuf::from("/tmp/audit.jsonl")));
        assert_eq!(cfg.pool.cooldown_minutes, 15);
        assert_eq!(cfg.pool.hold_days, 10);
        assert_eq!(cfg.pool.policy, HeldLeadPolicy::AllHeld);
        assert_eq!(cfg.pool.department, "Customer Service");
    }

    #[test]
    fn rejects_bad_values() {
        let err = ApiConfig::from_lookup(lookup(&[("LEADPOOL_COOLDOWN_MINUTES", "-1")])).unwrap_err();
        assert!(err.to_string().contains("LEADPOOL_COOLDOWN_MINUTES"));
        assert!(ApiConfig::from_lookup(lookup(&[("LEADPOOL_LISTEN", "nowhere")])).is_err());
        assert!(ApiConfig::from_lookup(lookup(&[("LEADPOOL_HELD_LEAD_POLICY", "some")])).is_err());
    }
}
