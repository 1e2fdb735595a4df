//! Run reports: per-case status plus run-level metadata
//!
//! The report always enumerates every registered case in catalog order,
//! each with either statistics (`Ok`) or the causing error message
//! (`Errored`). One errored case never hides the others.

use crate::sample::SummaryStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of measuring one case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CaseStatus {
    /// All configured iterations completed; statistics are present
    Ok { stats: SummaryStats },
    /// An invocation raised; remaining iterations were skipped
    Errored {
        /// Message of the causing error
        message: String,
        /// Measured iterations completed before the failure
        completed: usize,
    },
}

impl CaseStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, CaseStatus::Ok { .. })
    }

    pub fn stats(&self) -> Option<&SummaryStats> {
        match self {
            CaseStatus::Ok { stats } => Some(stats),
            CaseStatus::Errored { .. } => None,
        }
    }
}

/// Report entry for one benchmark case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseReport {
    pub group: String,
    pub label: String,
    #[serde(flatten)]
    pub status: CaseStatus,
}

/// Run-level metadata attached to the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMeta {
    pub started_at: DateTime<Utc>,
    pub warmup: u32,
    pub iterations: u32,
    pub os: String,
    pub arch: String,
    pub cpus: usize,
}

impl RunMeta {
    /// Capture run metadata for the current process.
    pub fn capture(warmup: u32, iterations: u32) -> Self {
        Self {
            started_at: Utc::now(),
            warmup,
            iterations,
            os: std::env::consts::OS.to_string(),
            arch: std::env::consts::ARCH.to_string(),
            cpus: std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(1),
        }
    }
}

/// Aggregated result of a whole run, handed to the reporter and discarded
/// at process exit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub meta: RunMeta,
    pub cases: Vec<CaseReport>,
}

impl RunReport {
    pub fn new(meta: RunMeta, cases: Vec<CaseReport>) -> Self {
        Self { meta, cases }
    }

    /// Number of cases that completed with statistics.
    pub fn ok_count(&self) -> usize {
        self.cases.iter().filter(|c| c.status.is_ok()).count()
    }

    /// Number of cases that errored.
    pub fn errored_count(&self) -> usize {
        self.cases.len() - self.ok_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn ok_report(group: &str, label: &str) -> CaseReport {
        let stats = SummaryStats::from_durations(&[Duration::from_millis(5)]).unwrap();
        CaseReport {
            group: group.to_string(),
            label: label.to_string(),
            status: CaseStatus::Ok { stats },
        }
    }

    #[test]
    fn counts_ok_and_errored() {
        let meta = RunMeta::capture(5, 20);
        let report = RunReport::new(
            meta,
            vec![
                ok_report("g", "a"),
                CaseReport {
                    group: "g".to_string(),
                    label: "b".to_string(),
                    status: CaseStatus::Errored {
                        message: "connection refused".to_string(),
                        completed: 3,
                    },
                },
                ok_report("g", "c"),
            ],
        );
        assert_eq!(report.ok_count(), 2);
        assert_eq!(report.errored_count(), 1);
    }

    #[test]
    fn status_accessors() {
        let errored = CaseStatus::Errored {
            message: "boom".to_string(),
            completed: 0,
        };
        assert!(!errored.is_ok());
        assert!(errored.stats().is_none());

        let ok = CaseStatus::Ok {
            stats: SummaryStats::from_durations(&[Duration::from_millis(1)]).unwrap(),
        };
        assert!(ok.is_ok());
        assert_eq!(ok.stats().unwrap().samples, 1);
    }

    #[test]
    fn case_report_serializes_with_flat_status() {
        let report = ok_report("customers: getAll", "simple");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["group"], "customers: getAll");
        assert!(json["stats"]["samples"].is_number());
    }
}
