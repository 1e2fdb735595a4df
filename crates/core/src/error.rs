//! Error types for the ormbench harness
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Containment policy: errors local to one instance or one case are recorded
//! and never abort the run; only total setup failure (`SetupFailed`) or a
//! catalog registration error (`DuplicateCase`) escalate to the process level.

use std::io;
use thiserror::Error;

/// Result type alias for ormbench operations
pub type BenchResult<T> = std::result::Result<T, BenchError>;

/// Error types for the benchmark harness
#[derive(Debug, Error)]
pub enum BenchError {
    /// Database instance could not be created or started.
    /// Fatal to that instance only; the run continues with the remainder.
    #[error("provisioning failed for strategy '{strategy}': {reason}")]
    Provision {
        /// Strategy whose instance failed to come up
        strategy: String,
        /// Underlying runtime failure (image pull, port bind, ...)
        reason: String,
    },

    /// Instance never accepted connections within the readiness budget
    #[error("database on port {port} not ready after {waited_ms} ms: {last_error}")]
    ReadinessTimeout {
        /// Host port of the unreachable instance
        port: u16,
        /// Wall time spent polling before giving up
        waited_ms: u64,
        /// Last connection error observed, surfaced as the cause
        last_error: String,
    },

    /// Seed script failed to apply; partial application is not distinguished
    /// from total failure and the instance is excluded from the run
    #[error("seed script failed on port {port}: {reason}")]
    Load {
        /// Host port of the instance the script was applied to
        port: u16,
        /// Underlying execution error
        reason: String,
    },

    /// Programmer error in catalog registration; fails at startup,
    /// before any provisioning
    #[error("benchmark case '{group} / {label}' registered twice")]
    DuplicateCase {
        /// Group label of the offending registration
        group: String,
        /// Case label of the offending registration
        label: String,
    },

    /// A single timed operation raised during measurement.
    /// Recorded on that case's report; never propagated across cases.
    #[error("case execution failed: {0}")]
    CaseExecution(String),

    /// Best-effort teardown failure; logged, never aborts the sweep
    #[error("teardown failed for container '{container}': {reason}")]
    Teardown {
        /// Container the stop request was issued against
        container: String,
        /// Underlying failure
        reason: String,
    },

    /// Invalid harness configuration (duplicate port, zero iterations, ...)
    #[error("invalid configuration: {0}")]
    Config(String),

    /// No database instance survived provisioning, readiness, and seeding;
    /// nothing can be measured and the process exits non-zero
    #[error("setup failed: no database instance became usable")]
    SetupFailed,

    /// I/O error (seed fixture read, export write, ...)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_provision() {
        let err = BenchError::Provision {
            strategy: "prepared".to_string(),
            reason: "port already allocated".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("prepared"));
        assert!(msg.contains("port already allocated"));
    }

    #[test]
    fn display_readiness_timeout() {
        let err = BenchError::ReadinessTimeout {
            port: 55002,
            waited_ms: 5120,
            last_error: "connection refused".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("55002"));
        assert!(msg.contains("5120"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn display_duplicate_case() {
        let err = BenchError::DuplicateCase {
            group: "customers: getAll".to_string(),
            label: "simple".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("customers: getAll"));
        assert!(msg.contains("simple"));
        assert!(msg.contains("twice"));
    }

    #[test]
    fn from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "no such file");
        let err: BenchError = io_err.into();
        assert!(matches!(err, BenchError::Io(_)));
    }

    #[test]
    fn result_alias() {
        fn ok() -> BenchResult<u32> {
            Ok(7)
        }
        fn fail() -> BenchResult<u32> {
            Err(BenchError::SetupFailed)
        }
        assert_eq!(ok().unwrap(), 7);
        assert!(fail().is_err());
    }
}
