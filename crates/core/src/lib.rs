//! Core types for the ormbench harness
//!
//! Runtime-agnostic building blocks shared by the orchestration engine and
//! the strategy crates: the error taxonomy, harness configuration, the
//! operation catalog, and timing samples with their summary statistics.
//!
//! Nothing in this crate touches Docker, sockets, or the async runtime -
//! those concerns live in `ormbench-harness`.

pub mod catalog;
pub mod config;
pub mod error;
pub mod report;
pub mod sample;

pub use catalog::{boxed_case, BenchmarkCase, CaseError, CaseFn, CaseFuture, Catalog};
pub use config::{ConnectionTarget, HarnessConfig, PortMap};
pub use error::{BenchError, BenchResult};
pub use report::{CaseReport, CaseStatus, RunMeta, RunReport};
pub use sample::{SummaryStats, TimingSample};
