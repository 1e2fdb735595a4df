//! Timing engine: warm-up + sampling under a monotonic clock
//!
//! Invocations within a case run strictly sequentially - concurrent calls
//! would contend for the case's connection and invalidate latency
//! comparisons. Cases themselves also run one after another, in catalog
//! order, so no case's measurement overlaps another's.
//!
//! The first error inside a case aborts that case's remaining iterations and
//! marks it `Errored`; it never propagates to sibling cases.

use ormbench_core::{BenchError, BenchmarkCase, CaseReport, CaseStatus, Catalog, TimingSample};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Warm-up and iteration counts for a run.
#[derive(Debug, Clone, Copy)]
pub struct TimingConfig {
    /// Invocations discarded before sampling starts
    pub warmup: u32,
    /// Measured invocations
    pub iterations: u32,
}

/// Measure one case: `warmup` unmeasured invocations, then `iterations`
/// measured ones, recorded in execution order.
pub async fn measure(case: &BenchmarkCase, config: TimingConfig) -> CaseReport {
    for i in 0..config.warmup {
        if let Err(e) = case.invoke().await {
            warn!(
                group = case.group(),
                label = case.label(),
                warmup_iteration = i,
                error = %e,
                "case failed during warm-up"
            );
            return errored(case, e.to_string(), 0);
        }
    }

    let mut sample = TimingSample::with_capacity(config.iterations as usize);
    for _ in 0..config.iterations {
        let started = Instant::now();
        match case.invoke().await {
            Ok(()) => sample.record(started.elapsed()),
            Err(e) => {
                warn!(
                    group = case.group(),
                    label = case.label(),
                    completed = sample.len(),
                    error = %e,
                    "case failed during measurement"
                );
                return errored(case, e.to_string(), sample.len());
            }
        }
    }

    // iterations >= 1 is enforced by config validation, so stats exist.
    let stats = sample
        .summarize()
        .expect("non-empty sample after successful measurement");
    debug!(
        group = case.group(),
        label = case.label(),
        samples = stats.samples,
        mean_us = stats.mean_us,
        "case measured"
    );
    CaseReport {
        group: case.group().to_string(),
        label: case.label().to_string(),
        status: CaseStatus::Ok { stats },
    }
}

/// Measure every case in the catalog, groups in declaration order, strictly
/// one case at a time. Produces one report entry per registered case.
pub async fn run_catalog(catalog: &Catalog, config: TimingConfig) -> Vec<CaseReport> {
    let mut reports = Vec::with_capacity(catalog.len());
    for (group, cases) in catalog.grouped() {
        info!(group, cases = cases.len(), "measuring group");
        for case in cases {
            reports.push(measure(case, config).await);
        }
    }
    reports
}

fn errored(case: &BenchmarkCase, cause: String, completed: usize) -> CaseReport {
    let message = BenchError::CaseExecution(cause).to_string();
    CaseReport {
        group: case.group().to_string(),
        label: case.label().to_string(),
        status: CaseStatus::Errored { message, completed },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ormbench_core::boxed_case;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_catalog(counter: Arc<AtomicUsize>) -> Catalog {
        let mut catalog = Catalog::new();
        catalog
            .register(
                "g",
                "counting",
                boxed_case(move || {
                    let counter = Arc::clone(&counter);
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    }
                }),
            )
            .unwrap();
        catalog
    }

    #[tokio::test]
    async fn sample_count_excludes_warmup() {
        let invocations = Arc::new(AtomicUsize::new(0));
        let catalog = counting_catalog(Arc::clone(&invocations));

        let report = measure(
            &catalog.cases()[0],
            TimingConfig {
                warmup: 5,
                iterations: 20,
            },
        )
        .await;

        // 25 invocations total, exactly 20 recorded.
        assert_eq!(invocations.load(Ordering::SeqCst), 25);
        match report.status {
            CaseStatus::Ok { stats } => assert_eq!(stats.samples, 20),
            CaseStatus::Errored { .. } => panic!("case never fails"),
        }
    }

    #[tokio::test]
    async fn failure_mid_measurement_aborts_that_case() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&calls);
        let mut catalog = Catalog::new();
        catalog
            .register(
                "g",
                "flaky",
                boxed_case(move || {
                    let seen = Arc::clone(&seen);
                    async move {
                        // Warm-up (2) plus 3 measured succeed, the 4th raises.
                        if seen.fetch_add(1, Ordering::SeqCst) == 5 {
                            Err("simulated failure".into())
                        } else {
                            Ok(())
                        }
                    }
                }),
            )
            .unwrap();

        let report = measure(
            &catalog.cases()[0],
            TimingConfig {
                warmup: 2,
                iterations: 10,
            },
        )
        .await;

        match report.status {
            CaseStatus::Errored { message, completed } => {
                assert!(message.contains("simulated failure"));
                assert_eq!(completed, 3);
            }
            CaseStatus::Ok { .. } => panic!("case must error"),
        }
        // No invocation after the failure.
        assert_eq!(calls.load(Ordering::SeqCst), 6);
    }

    #[tokio::test]
    async fn one_errored_case_does_not_stop_the_others() {
        let mut catalog = Catalog::new();
        catalog
            .register("g", "first", boxed_case(|| async { Ok(()) }))
            .unwrap();
        catalog
            .register(
                "g",
                "second",
                boxed_case(|| async { Err("always broken".into()) }),
            )
            .unwrap();
        catalog
            .register("g", "third", boxed_case(|| async { Ok(()) }))
            .unwrap();

        let reports = run_catalog(
            &catalog,
            TimingConfig {
                warmup: 1,
                iterations: 5,
            },
        )
        .await;

        assert_eq!(reports.len(), 3);
        assert!(reports[0].status.is_ok());
        assert!(!reports[1].status.is_ok());
        assert!(reports[2].status.is_ok());
        match &reports[1].status {
            CaseStatus::Errored { message, completed } => {
                assert!(message.contains("always broken"));
                assert_eq!(*completed, 0);
            }
            CaseStatus::Ok { .. } => unreachable!(),
        }
    }

    #[tokio::test]
    async fn report_order_matches_registration_order() {
        let mut catalog = Catalog::new();
        for (group, label) in [("g1", "a"), ("g2", "a"), ("g1", "b")] {
            catalog
                .register(group, label, boxed_case(|| async { Ok(()) }))
                .unwrap();
        }

        let reports = run_catalog(
            &catalog,
            TimingConfig {
                warmup: 0,
                iterations: 1,
            },
        )
        .await;

        let order: Vec<_> = reports
            .iter()
            .map(|r| (r.group.as_str(), r.label.as_str()))
            .collect();
        // Grouped execution: both g1 labels before g2.
        assert_eq!(order, vec![("g1", "a"), ("g1", "b"), ("g2", "a")]);
    }

    #[tokio::test]
    async fn all_measured_durations_are_positive() {
        let catalog = counting_catalog(Arc::new(AtomicUsize::new(0)));
        let report = measure(
            &catalog.cases()[0],
            TimingConfig {
                warmup: 0,
                iterations: 10,
            },
        )
        .await;
        let stats = report.status.stats().unwrap();
        assert!(stats.min_us >= 0.0);
        assert!(stats.max_us >= stats.min_us);
    }
}
