//! ormbench - Comparative latency benchmark for PostgreSQL data-access strategies
//!
//! ormbench provisions one ephemeral PostgreSQL instance per data-access
//! strategy under test, seeds each with the same fixed dataset, and measures
//! the latency of equivalent logical queries (point lookups, pattern search,
//! joins, aggregation, pagination) under a warm-up + sampling protocol.
//!
//! # Quick Start
//!
//! ```ignore
//! use ormbench::{Catalog, Coordinator, DockerProvisioner, HarnessConfig, PortMap};
//!
//! let config = HarnessConfig::default();
//! let ports = PortMap::consecutive(55000, &["simple", "extended", "prepared"]);
//! let mut catalog = Catalog::new();
//! // ... register cases ...
//!
//! let provisioner = DockerProvisioner::new(
//!     &config.image,
//!     &config.db_user,
//!     &config.db_password,
//!     &config.db_name,
//! );
//! let report = Coordinator::new(config, ports, provisioner).run(catalog).await?;
//! ```
//!
//! # Architecture
//!
//! The orchestration engine lives in `ormbench-harness`: provisioner,
//! readiness gate, dataset loader, timing engine, and lifecycle coordinator.
//! Shared types (errors, configuration, the operation catalog, samples and
//! summary statistics) live in `ormbench-core`. The per-strategy query
//! bodies are catalog content and are kept out of the engine crates.

pub use ormbench_core::*;
pub use ormbench_harness::*;
