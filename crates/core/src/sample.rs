//! Timing samples and summary statistics
//!
//! A [`TimingSample`] holds per-invocation wall-clock durations in execution
//! order. Statistics are only computed once a case has finished; the sample
//! itself is never sorted in place.
//!
//! Percentiles use the nearest-rank method on the sorted sample: the p-th
//! percentile is the value at 1-based index `ceil(p/100 * n)`. For the sample
//! `[10, 20, ..., 100]` ms this puts p50 at 50 ms.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ordered per-invocation durations for one benchmark case.
///
/// Insertion order is execution order. Warm-up invocations are never pushed
/// here; the engine discards them before sampling starts.
#[derive(Debug, Clone, Default)]
pub struct TimingSample {
    durations: Vec<Duration>,
}

impl TimingSample {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            durations: Vec::with_capacity(capacity),
        }
    }

    pub fn record(&mut self, elapsed: Duration) {
        self.durations.push(elapsed);
    }

    pub fn len(&self) -> usize {
        self.durations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.durations.is_empty()
    }

    pub fn durations(&self) -> &[Duration] {
        &self.durations
    }

    /// Summary statistics over the recorded durations, `None` when no
    /// invocation was measured (a case that failed immediately).
    pub fn summarize(&self) -> Option<SummaryStats> {
        SummaryStats::from_durations(&self.durations)
    }
}

impl FromIterator<Duration> for TimingSample {
    fn from_iter<I: IntoIterator<Item = Duration>>(iter: I) -> Self {
        Self {
            durations: iter.into_iter().collect(),
        }
    }
}

/// Aggregated statistics for one case, all latencies in microseconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    /// Number of measured invocations
    pub samples: usize,
    pub min_us: f64,
    pub max_us: f64,
    pub mean_us: f64,
    pub p50_us: f64,
    pub p75_us: f64,
    pub p99_us: f64,
}

impl SummaryStats {
    /// Compute statistics from raw durations. Returns `None` on an empty
    /// sample; absent statistics are reported as absent, never as zero.
    pub fn from_durations(durations: &[Duration]) -> Option<Self> {
        if durations.is_empty() {
            return None;
        }

        let mut micros: Vec<f64> = durations
            .iter()
            .map(|d| d.as_secs_f64() * 1_000_000.0)
            .collect();
        micros.sort_by(f64::total_cmp);

        let n = micros.len();
        let sum: f64 = micros.iter().sum();

        Some(Self {
            samples: n,
            min_us: micros[0],
            max_us: micros[n - 1],
            mean_us: sum / n as f64,
            p50_us: nearest_rank(&micros, 50.0),
            p75_us: nearest_rank(&micros, 75.0),
            p99_us: nearest_rank(&micros, 99.0),
        })
    }
}

/// Nearest-rank percentile over an ascending-sorted slice:
/// 1-based rank `ceil(p/100 * n)`, clamped to the last element.
fn nearest_rank(sorted: &[f64], percentile: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let n = sorted.len();
    let rank = ((percentile / 100.0) * n as f64).ceil() as usize;
    sorted[rank.clamp(1, n) - 1]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn sample_preserves_execution_order() {
        let mut sample = TimingSample::new();
        sample.record(ms(30));
        sample.record(ms(10));
        sample.record(ms(20));
        let recorded: Vec<_> = sample.durations().to_vec();
        assert_eq!(recorded, vec![ms(30), ms(10), ms(20)]);
    }

    #[test]
    fn empty_sample_has_no_stats() {
        let sample = TimingSample::new();
        assert!(sample.summarize().is_none());
    }

    #[test]
    fn fixed_sample_statistics() {
        // 10..=100 ms in 10 ms steps.
        let sample: TimingSample = (1..=10).map(|i| ms(i * 10)).collect();
        let stats = sample.summarize().unwrap();

        assert_eq!(stats.samples, 10);
        assert!((stats.min_us - 10_000.0).abs() < 1e-6);
        assert!((stats.max_us - 100_000.0).abs() < 1e-6);
        assert!((stats.mean_us - 55_000.0).abs() < 1e-6);
        // Nearest rank: ceil(0.5 * 10) = 5th value = 50 ms.
        assert!((stats.p50_us - 50_000.0).abs() < 1e-6);
        // ceil(0.75 * 10) = 8th value = 80 ms.
        assert!((stats.p75_us - 80_000.0).abs() < 1e-6);
        // ceil(0.99 * 10) = 10th value = 100 ms.
        assert!((stats.p99_us - 100_000.0).abs() < 1e-6);
    }

    #[test]
    fn single_sample_statistics() {
        let stats = SummaryStats::from_durations(&[ms(42)]).unwrap();
        assert_eq!(stats.samples, 1);
        assert_eq!(stats.min_us, stats.max_us);
        assert_eq!(stats.p50_us, stats.p99_us);
        assert!((stats.mean_us - 42_000.0).abs() < 1e-6);
    }

    #[test]
    fn stats_do_not_depend_on_insertion_order() {
        let forward: TimingSample = (1..=10).map(|i| ms(i * 10)).collect();
        let reverse: TimingSample = (1..=10).rev().map(|i| ms(i * 10)).collect();
        assert_eq!(forward.summarize(), reverse.summarize());
    }
}
