//! Harness configuration: connection targets, port assignments, run knobs
//!
//! Ports are assigned statically, one per strategy, so that the same
//! strategy-specific client code finds its database deterministically across
//! runs. The defaults mirror the 55000-range used by the original suite.
//! `DB_HOST` / `DB_PORT` / `DB_USER` / `DB_PASSWORD` / `DB_NAME` environment
//! variables override the defaults for runs against a pre-existing database.

use crate::error::{BenchError, BenchResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// First host port handed out by [`PortMap::default`]
pub const DEFAULT_PORT_BASE: u16 = 55000;

/// Connection coordinates for one database instance.
///
/// A plain structured value passed from provisioner output to the dataset
/// loader and on to each operation's closed-over client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionTarget {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub dbname: String,
}

impl ConnectionTarget {
    /// Target for a locally provisioned instance on `port` with the
    /// stock postgres/postgres credentials.
    pub fn local(port: u16) -> Self {
        Self {
            host: "localhost".to_string(),
            port,
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            dbname: "postgres".to_string(),
        }
    }

    /// Target built from `DB_*` environment overrides, falling back to
    /// [`ConnectionTarget::local`] on `port` for anything unset.
    pub fn from_env(port: u16) -> Self {
        let mut target = Self::local(port);
        if let Ok(host) = env::var("DB_HOST") {
            target.host = host;
        }
        if let Some(p) = env::var("DB_PORT").ok().and_then(|p| p.parse().ok()) {
            target.port = p;
        }
        if let Ok(user) = env::var("DB_USER") {
            target.user = user;
        }
        if let Ok(password) = env::var("DB_PASSWORD") {
            target.password = password;
        }
        if let Ok(dbname) = env::var("DB_NAME") {
            target.dbname = dbname;
        }
        target
    }

    /// Key-value connection string in the form `tokio_postgres` accepts.
    pub fn config_string(&self) -> String {
        format!(
            "host={} port={} user={} password={} dbname={}",
            self.host, self.port, self.user, self.password, self.dbname
        )
    }
}

/// Mapping from logical strategy name to reserved host port.
///
/// Insertion order is preserved; it drives provisioning order and report
/// order. Assignment is immutable once an instance has been created from it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortMap {
    entries: Vec<(String, u16)>,
}

impl PortMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign consecutive ports starting at `base` to `strategies`,
    /// preserving order.
    pub fn consecutive(base: u16, strategies: &[&str]) -> Self {
        let entries = strategies
            .iter()
            .enumerate()
            .map(|(i, s)| (s.to_string(), base + i as u16))
            .collect();
        Self { entries }
    }

    pub fn insert(&mut self, strategy: impl Into<String>, port: u16) {
        self.entries.push((strategy.into(), port));
    }

    pub fn get(&self, strategy: &str) -> Option<u16> {
        self.entries
            .iter()
            .find(|(s, _)| s == strategy)
            .map(|(_, p)| *p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u16)> {
        self.entries.iter().map(|(s, p)| (s.as_str(), *p))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reject duplicate strategy names and duplicate ports.
    ///
    /// Uniqueness across all concurrently provisioned instances is the
    /// invariant that keeps parallel `docker run` calls from fighting over
    /// the same host port.
    pub fn validate(&self) -> BenchResult<()> {
        let mut names = HashSet::new();
        let mut ports = HashSet::new();
        for (strategy, port) in self.iter() {
            if !names.insert(strategy) {
                return Err(BenchError::Config(format!(
                    "strategy '{strategy}' assigned more than once"
                )));
            }
            if !ports.insert(port) {
                return Err(BenchError::Config(format!(
                    "port {port} assigned to more than one strategy"
                )));
            }
        }
        Ok(())
    }
}

/// Run-level knobs for the harness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Docker image the provisioner starts, e.g. `postgres:alpine`
    pub image: String,
    /// Superuser name passed as `POSTGRES_USER`
    pub db_user: String,
    /// Password passed as `POSTGRES_PASSWORD`
    pub db_password: String,
    /// Database name passed as `POSTGRES_DB`
    pub db_name: String,
    /// Unmeasured invocations per case before sampling starts
    pub warmup: u32,
    /// Measured invocations per case
    pub iterations: u32,
    /// Total readiness polling budget in milliseconds
    pub readiness_budget_ms: u64,
    /// Fixed interval between readiness attempts in milliseconds
    pub readiness_interval_ms: u64,
    /// Path to the DDL + seed fixture applied to every instance
    pub seed_script: PathBuf,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            image: "postgres:alpine".to_string(),
            db_user: "postgres".to_string(),
            db_password: "postgres".to_string(),
            db_name: "postgres".to_string(),
            warmup: 10,
            iterations: 100,
            readiness_budget_ms: 5000,
            readiness_interval_ms: 250,
            seed_script: PathBuf::from("data/init-db.sql"),
        }
    }
}

impl HarnessConfig {
    pub fn readiness_budget(&self) -> Duration {
        Duration::from_millis(self.readiness_budget_ms)
    }

    pub fn readiness_interval(&self) -> Duration {
        Duration::from_millis(self.readiness_interval_ms)
    }

    /// Sanity checks applied once, before any provisioning.
    pub fn validate(&self) -> BenchResult<()> {
        if self.iterations == 0 {
            return Err(BenchError::Config(
                "iterations must be at least 1".to_string(),
            ));
        }
        if self.readiness_interval_ms == 0 {
            return Err(BenchError::Config(
                "readiness interval must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_string_shape() {
        let target = ConnectionTarget::local(55004);
        assert_eq!(
            target.config_string(),
            "host=localhost port=55004 user=postgres password=postgres dbname=postgres"
        );
    }

    #[test]
    fn port_map_consecutive_preserves_order() {
        let ports = PortMap::consecutive(55000, &["simple", "extended", "prepared"]);
        let collected: Vec<_> = ports.iter().collect();
        assert_eq!(
            collected,
            vec![("simple", 55000), ("extended", 55001), ("prepared", 55002)]
        );
        assert_eq!(ports.get("extended"), Some(55001));
        assert_eq!(ports.get("unknown"), None);
    }

    #[test]
    fn port_map_rejects_duplicate_port() {
        let mut ports = PortMap::new();
        ports.insert("simple", 55000);
        ports.insert("prepared", 55000);
        let err = ports.validate().unwrap_err();
        assert!(matches!(err, BenchError::Config(_)));
        assert!(err.to_string().contains("55000"));
    }

    #[test]
    fn port_map_rejects_duplicate_strategy() {
        let mut ports = PortMap::new();
        ports.insert("simple", 55000);
        ports.insert("simple", 55001);
        assert!(ports.validate().is_err());
    }

    #[test]
    fn port_map_accepts_unique_assignments() {
        let ports = PortMap::consecutive(55000, &["a", "b", "c", "d"]);
        assert!(ports.validate().is_ok());
        assert_eq!(ports.len(), 4);
    }

    #[test]
    fn harness_config_defaults_are_valid() {
        let config = HarnessConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.readiness_interval(), Duration::from_millis(250));
        assert_eq!(config.readiness_budget(), Duration::from_millis(5000));
    }

    #[test]
    fn harness_config_rejects_zero_iterations() {
        let config = HarnessConfig {
            iterations: 0,
            ..HarnessConfig::default()
        };
        assert!(matches!(
            config.validate().unwrap_err(),
            BenchError::Config(_)
        ));
    }
}
