//! Benchmark orchestration engine
//!
//! Everything between "a port map and a catalog" and "a finished report":
//!
//! - [`provision`] - ephemeral PostgreSQL instances via the Docker CLI
//! - [`retry`] / [`readiness`] - bounded fixed-interval readiness polling
//! - [`seed`] - DDL + fixture loading
//! - [`timing`] - the warm-up + sampling measurement protocol
//! - [`coordinator`] - parallel setup fan-out, serialized measurement,
//!   unconditional teardown
//! - [`reporter`] - console table plus JSON/CSV export
//!
//! Setup and teardown phases fan out across instances with `JoinSet`; the
//! measurement phase is strictly sequential so cases never contend with each
//! other for connections or CPU.

pub mod coordinator;
pub mod provision;
pub mod readiness;
pub mod reporter;
pub mod retry;
pub mod seed;
pub mod timing;

pub use coordinator::{Coordinator, Phase};
pub use provision::{DatabaseInstance, DbState, DockerProvisioner, Provisioner};
pub use readiness::await_ready;
pub use reporter::{export_csv, export_json, print_report};
pub use retry::{until_ready, RetryOutcome};
pub use seed::load;
pub use timing::{measure, run_catalog, TimingConfig};
