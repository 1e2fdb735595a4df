//! Operation catalog: named, grouped benchmark cases
//!
//! A case is a `(group, label, operation)` triple: the group names the
//! logical query (entity + access pattern), the label names the strategy,
//! and the operation is a zero-argument async callable closing over whatever
//! client it needs. The catalog is built up-front, before any database
//! exists; operations are expected to establish their connections lazily on
//! first invocation so the warm-up phase absorbs that cost.
//!
//! Registering the same `(group, label)` pair twice is a programmer error
//! and fails immediately, before any provisioning happens.

use crate::error::{BenchError, BenchResult};
use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;

/// Error type produced by a timed operation
pub type CaseError = Box<dyn std::error::Error + Send + Sync>;

/// Boxed future of a single timed invocation
pub type CaseFuture = Pin<Box<dyn Future<Output = Result<(), CaseError>> + Send>>;

/// Zero-argument async callable; one invocation per call
pub type CaseFn = Box<dyn Fn() -> CaseFuture + Send + Sync>;

/// Wrap an async closure into a [`CaseFn`].
pub fn boxed_case<F, Fut>(f: F) -> CaseFn
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), CaseError>> + Send + 'static,
{
    Box::new(move || Box::pin(f()))
}

/// One named unit of work: a strategy-bound operation for a logical query.
///
/// Created once during catalog registration and never mutated. The operation
/// must be idempotent-enough to run thousands of times without accumulating
/// state that changes behavior.
pub struct BenchmarkCase {
    group: String,
    label: String,
    op: CaseFn,
}

impl BenchmarkCase {
    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Start one invocation of the operation.
    pub fn invoke(&self) -> CaseFuture {
        (self.op)()
    }
}

impl std::fmt::Debug for BenchmarkCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BenchmarkCase")
            .field("group", &self.group)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Registry of benchmark cases in declaration order.
#[derive(Debug, Default)]
pub struct Catalog {
    cases: Vec<BenchmarkCase>,
    seen: HashSet<(String, String)>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a case. Fails fast with [`BenchError::DuplicateCase`] when the
    /// `(group, label)` pair was already registered.
    pub fn register(
        &mut self,
        group: impl Into<String>,
        label: impl Into<String>,
        op: CaseFn,
    ) -> BenchResult<()> {
        let group = group.into();
        let label = label.into();
        if !self.seen.insert((group.clone(), label.clone())) {
            return Err(BenchError::DuplicateCase { group, label });
        }
        self.cases.push(BenchmarkCase { group, label, op });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// All cases in registration order.
    pub fn cases(&self) -> &[BenchmarkCase] {
        &self.cases
    }

    /// Cases grouped for execution: groups in first-appearance order, labels
    /// in registration order within each group.
    pub fn grouped(&self) -> Vec<(&str, Vec<&BenchmarkCase>)> {
        let mut order: Vec<&str> = Vec::new();
        for case in &self.cases {
            if !order.contains(&case.group.as_str()) {
                order.push(&case.group);
            }
        }
        order
            .into_iter()
            .map(|group| {
                let members = self
                    .cases
                    .iter()
                    .filter(|c| c.group == group)
                    .collect::<Vec<_>>();
                (group, members)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop() -> CaseFn {
        boxed_case(|| async { Ok(()) })
    }

    #[test]
    fn register_preserves_declaration_order() {
        let mut catalog = Catalog::new();
        catalog.register("g1", "simple", noop()).unwrap();
        catalog.register("g2", "simple", noop()).unwrap();
        catalog.register("g1", "prepared", noop()).unwrap();

        let labels: Vec<_> = catalog
            .cases()
            .iter()
            .map(|c| (c.group(), c.label()))
            .collect();
        assert_eq!(
            labels,
            vec![("g1", "simple"), ("g2", "simple"), ("g1", "prepared")]
        );
    }

    #[test]
    fn grouped_orders_by_first_appearance() {
        let mut catalog = Catalog::new();
        catalog.register("g1", "a", noop()).unwrap();
        catalog.register("g2", "a", noop()).unwrap();
        catalog.register("g1", "b", noop()).unwrap();
        catalog.register("g3", "a", noop()).unwrap();

        let grouped = catalog.grouped();
        let groups: Vec<_> = grouped.iter().map(|(g, _)| *g).collect();
        assert_eq!(groups, vec!["g1", "g2", "g3"]);

        let g1_labels: Vec<_> = grouped[0].1.iter().map(|c| c.label()).collect();
        assert_eq!(g1_labels, vec!["a", "b"]);
    }

    #[test]
    fn duplicate_registration_fails_fast() {
        let mut catalog = Catalog::new();
        catalog.register("g", "simple", noop()).unwrap();
        let err = catalog.register("g", "simple", noop()).unwrap_err();
        assert!(matches!(err, BenchError::DuplicateCase { .. }));
        // The failed registration must not have been appended.
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn same_label_in_other_group_is_fine() {
        let mut catalog = Catalog::new();
        catalog.register("g1", "simple", noop()).unwrap();
        catalog.register("g2", "simple", noop()).unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[tokio::test]
    async fn invoke_runs_the_operation() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::sync::Arc;

        let hits = Arc::new(AtomicUsize::new(0));
        let counted = Arc::clone(&hits);
        let mut catalog = Catalog::new();
        catalog
            .register(
                "g",
                "counting",
                boxed_case(move || {
                    let counted = Arc::clone(&counted);
                    async move {
                        counted.fetch_add(1, Ordering::SeqCst);
                        Ok(())
                    }
                }),
            )
            .unwrap();

        let case = &catalog.cases()[0];
        case.invoke().await.unwrap();
        case.invoke().await.unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
