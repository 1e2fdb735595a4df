//! Lifecycle coordinator: the top-level driver of a benchmark run
//!
//! Linear phase machine with no back-edges:
//!
//! ```text
//! Init -> Provisioning -> AwaitingReadiness -> Seeding -> Benchmarking
//!      -> Reporting -> TearingDown -> Done
//! ```
//!
//! Provisioning, readiness-waiting, and seeding fan out across all
//! configured strategies in parallel; measurement is strictly sequential.
//! `TearingDown` is reached from every path - whatever instances were
//! successfully created are released no matter where the run aborted.
//!
//! Partial-failure isolation: one strategy's instance failing to come up (or
//! to seed) marks that instance `Failed` and excludes it; its cases surface
//! as `Errored` when their connections fail. The run only aborts when zero
//! instances survive setup.

use crate::provision::{DatabaseInstance, DbState, Provisioner};
use crate::timing::{self, TimingConfig};
use ormbench_core::{
    BenchError, BenchResult, CaseReport, Catalog, ConnectionTarget, HarnessConfig, PortMap,
    RunMeta, RunReport,
};
use std::fmt;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// Phase of the run, for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Init,
    Provisioning,
    AwaitingReadiness,
    Seeding,
    Benchmarking,
    Reporting,
    TearingDown,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Init => "init",
            Phase::Provisioning => "provisioning",
            Phase::AwaitingReadiness => "awaiting-readiness",
            Phase::Seeding => "seeding",
            Phase::Benchmarking => "benchmarking",
            Phase::Reporting => "reporting",
            Phase::TearingDown => "tearing-down",
            Phase::Done => "done",
        };
        f.write_str(name)
    }
}

/// Top-level driver owning the instance registry.
pub struct Coordinator<P: Provisioner + 'static> {
    config: HarnessConfig,
    ports: PortMap,
    provisioner: Arc<P>,
}

impl<P: Provisioner + 'static> Coordinator<P> {
    pub fn new(config: HarnessConfig, ports: PortMap, provisioner: P) -> Self {
        Self {
            config,
            ports,
            provisioner: Arc::new(provisioner),
        }
    }

    /// Execute the full pipeline over `catalog`.
    ///
    /// Teardown of every provisioned instance is guaranteed regardless of
    /// which phase failed; the pipeline result is only inspected after the
    /// sweep has run.
    pub async fn run(&self, catalog: Catalog) -> BenchResult<RunReport> {
        self.config.validate()?;
        self.ports.validate()?;

        let meta = RunMeta::capture(self.config.warmup, self.config.iterations);
        let mut instances: Vec<DatabaseInstance> = Vec::new();

        let outcome = self.pipeline(&catalog, &mut instances).await;

        info!(phase = %Phase::TearingDown, instances = instances.len(), "releasing instances");
        self.teardown_all(&mut instances).await;
        info!(phase = %Phase::Done, "run finished");

        let cases = outcome?;
        Ok(RunReport::new(meta, cases))
    }

    /// Init through Reporting. Mutates `instances` in place so the caller
    /// can sweep them even when a phase fails.
    async fn pipeline(
        &self,
        catalog: &Catalog,
        instances: &mut Vec<DatabaseInstance>,
    ) -> BenchResult<Vec<CaseReport>> {
        info!(phase = %Phase::Provisioning, strategies = self.ports.len(), "starting instances");
        self.provision_all(instances).await;
        if instances.is_empty() {
            error!("no instance could be provisioned");
            return Err(BenchError::SetupFailed);
        }

        info!(phase = %Phase::AwaitingReadiness, "waiting for connections");
        self.for_each_in_state(
            instances,
            DbState::Starting,
            DbState::Starting,
            DbState::Ready,
            |p, target| {
                let budget = self.config.readiness_budget();
                let interval = self.config.readiness_interval();
                async move { p.await_ready(&target, budget, interval).await }
            },
        )
        .await;

        info!(phase = %Phase::Seeding, script = %self.config.seed_script.display(), "loading dataset");
        self.for_each_in_state(
            instances,
            DbState::Ready,
            DbState::Seeding,
            DbState::Seeded,
            |p, target| {
                let script = self.config.seed_script.clone();
                async move { p.seed(&target, &script).await }
            },
        )
        .await;

        let usable = instances
            .iter()
            .filter(|i| i.state == DbState::Seeded)
            .count();
        if usable == 0 {
            error!("no instance survived readiness and seeding");
            return Err(BenchError::SetupFailed);
        }

        info!(phase = %Phase::Benchmarking, usable, cases = catalog.len(), "measuring");
        let reports = timing::run_catalog(
            catalog,
            TimingConfig {
                warmup: self.config.warmup,
                iterations: self.config.iterations,
            },
        )
        .await;

        info!(phase = %Phase::Reporting, cases = reports.len(), "collecting report");
        Ok(reports)
    }

    /// Fan out provisioning across all port assignments; collect whatever
    /// succeeded into the registry and log the rest.
    async fn provision_all(&self, instances: &mut Vec<DatabaseInstance>) {
        let mut tasks = JoinSet::new();
        for (strategy, port) in self.ports.iter() {
            let provisioner = Arc::clone(&self.provisioner);
            let strategy = strategy.to_string();
            tasks.spawn(async move {
                let result = provisioner.provision(&strategy, port).await;
                (strategy, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(instance))) => instances.push(instance),
                Ok((strategy, Err(e))) => {
                    warn!(strategy, error = %e, "provisioning failed, continuing without it");
                }
                Err(e) => warn!(error = %e, "provisioning task panicked"),
            }
        }
    }

    /// Run `step` in parallel over every instance currently in `from`,
    /// holding it in `via` while the step runs, then advancing it to `to` on
    /// success and marking it `Failed` otherwise.
    async fn for_each_in_state<F, Fut>(
        &self,
        instances: &mut Vec<DatabaseInstance>,
        from: DbState,
        via: DbState,
        to: DbState,
        step: F,
    ) where
        F: Fn(Arc<P>, ConnectionTarget) -> Fut,
        Fut: std::future::Future<Output = BenchResult<()>> + Send + 'static,
    {
        let mut tasks = JoinSet::new();
        let mut kept = Vec::with_capacity(instances.len());

        for mut instance in std::mem::take(instances) {
            if instance.state != from {
                kept.push(instance);
                continue;
            }
            instance.state = via;
            let target = self.target_for(instance.port);
            let fut = step(Arc::clone(&self.provisioner), target);
            tasks.spawn(async move {
                let result = fut.await;
                (instance, result)
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((mut instance, Ok(()))) => {
                    instance.state = to;
                    kept.push(instance);
                }
                Ok((mut instance, Err(e))) => {
                    warn!(
                        strategy = %instance.strategy,
                        port = instance.port,
                        error = %e,
                        "instance excluded from this run"
                    );
                    instance.state = DbState::Failed;
                    kept.push(instance);
                }
                Err(e) => warn!(error = %e, "setup task panicked"),
            }
        }

        *instances = kept;
    }

    /// Best-effort teardown sweep: every instance gets exactly one stop
    /// attempt, failures are logged inside the provisioner and never block
    /// the rest.
    async fn teardown_all(&self, instances: &mut Vec<DatabaseInstance>) {
        let mut tasks = JoinSet::new();
        for mut instance in std::mem::take(instances) {
            let provisioner = Arc::clone(&self.provisioner);
            tasks.spawn(async move {
                provisioner.teardown(&mut instance).await;
                instance
            });
        }
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(instance) => instances.push(instance),
                Err(e) => warn!(error = %e, "teardown task panicked"),
            }
        }
    }

    fn target_for(&self, port: u16) -> ConnectionTarget {
        ConnectionTarget {
            host: "localhost".to_string(),
            port,
            user: self.config.db_user.clone(),
            password: self.config.db_password.clone(),
            dbname: self.config.db_name.clone(),
        }
    }
}
