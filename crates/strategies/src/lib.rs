//! Catalog content: the per-strategy Northwind query bodies
//!
//! Three data-access strategies issue the same logical queries against the
//! same dataset, each through its own connection to its own database
//! instance:
//!
//! - `simple` - text protocol (`simple_query`), literals inlined
//! - `extended` - parameterized extended protocol, statement prepared per call
//! - `prepared` - named prepared statements, prepared once and cached
//!
//! Everything in this crate is deliberately repetitive glue; the
//! orchestration engine never looks inside it.

pub mod client;
pub mod extended;
pub mod groups;
pub mod meta;
pub mod prepared;
pub mod simple;

use client::PgSession;
use ormbench_core::{BenchError, BenchResult, Catalog, ConnectionTarget, PortMap};
use std::sync::Arc;

/// Strategy names in registration (and therefore report) order.
pub const STRATEGIES: &[&str] = &["simple", "extended", "prepared"];

/// Port map with the default 55000-range assignment, one port per strategy.
pub fn default_ports() -> PortMap {
    PortMap::consecutive(ormbench_core::config::DEFAULT_PORT_BASE, STRATEGIES)
}

/// Register every strategy's cases into `catalog`.
///
/// Each strategy gets a lazily-connecting session bound to its assigned
/// port (with `DB_*` environment overrides applied), so registration works
/// before any database exists.
pub fn register_all(catalog: &mut Catalog, ports: &PortMap) -> BenchResult<()> {
    for &strategy in STRATEGIES {
        let port = ports.get(strategy).ok_or_else(|| {
            BenchError::Config(format!("no port assigned to strategy '{strategy}'"))
        })?;
        let session = Arc::new(PgSession::new(ConnectionTarget::from_env(port)));
        match strategy {
            "simple" => simple::register(catalog, session)?,
            "extended" => extended::register(catalog, session)?,
            "prepared" => prepared::register(catalog, session)?,
            _ => unreachable!("STRATEGIES is the source of truth"),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ports_cover_every_strategy() {
        let ports = default_ports();
        assert!(ports.validate().is_ok());
        for &strategy in STRATEGIES {
            assert!(ports.get(strategy).is_some(), "missing port for {strategy}");
        }
    }

    #[test]
    fn register_all_has_no_duplicates_and_covers_all_groups() {
        let mut catalog = Catalog::new();
        register_all(&mut catalog, &default_ports()).unwrap();

        // Every group appears once per strategy.
        assert_eq!(catalog.len(), groups::ALL.len() * STRATEGIES.len());

        let grouped = catalog.grouped();
        assert_eq!(grouped.len(), groups::ALL.len());
        for (group, cases) in grouped {
            let labels: Vec<_> = cases.iter().map(|c| c.label()).collect();
            assert_eq!(labels, STRATEGIES.to_vec(), "labels for group '{group}'");
        }
    }
}
