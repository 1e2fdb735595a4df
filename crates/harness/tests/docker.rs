//! End-to-end run against a real Docker daemon.
//!
//! Ignored by default; run with `cargo test -p ormbench-harness -- --ignored`
//! on a machine with Docker and ports 50001/50002 free.

use ormbench_core::{boxed_case, Catalog, ConnectionTarget, HarnessConfig, PortMap};
use ormbench_harness::{Coordinator, DockerProvisioner};
use std::path::{Path, PathBuf};
use tokio_postgres::NoTls;

const SEED: &str = "create table probe (v integer); insert into probe values (1);";

fn write_seed(dir: &Path) -> PathBuf {
    let script = dir.join("seed.sql");
    std::fs::write(&script, SEED).expect("write seed script");
    script
}

fn config(seed_script: PathBuf) -> HarnessConfig {
    HarnessConfig {
        warmup: 1,
        iterations: 5,
        seed_script,
        ..HarnessConfig::default()
    }
}

fn probe_catalog(ports: &PortMap) -> Catalog {
    let mut catalog = Catalog::new();
    for (strategy, port) in ports.iter() {
        let op = boxed_case(move || async move {
            let target = ConnectionTarget::local(port);
            let (client, connection) =
                tokio_postgres::connect(&target.config_string(), NoTls).await?;
            let driver = tokio::spawn(connection);
            let rows = client.query("select v from probe", &[]).await?;
            driver.abort();
            if rows.is_empty() {
                return Err("probe table is empty".into());
            }
            Ok(())
        });
        catalog
            .register(strategy, "tokio-postgres", op)
            .expect("unique case");
    }
    catalog
}

fn provisioner(config: &HarnessConfig) -> DockerProvisioner {
    DockerProvisioner::new(
        &config.image,
        &config.db_user,
        &config.db_password,
        &config.db_name,
    )
}

#[tokio::test]
#[ignore = "requires a local Docker daemon"]
async fn full_run_measures_every_strategy_and_tears_down() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ports = PortMap::consecutive(50001, &["alpha", "beta"]);
    let config = config(write_seed(dir.path()));

    let coordinator = Coordinator::new(config.clone(), ports.clone(), provisioner(&config));
    let report = coordinator
        .run(probe_catalog(&ports))
        .await
        .expect("run completes");

    assert_eq!(report.cases.len(), 2);
    for case in &report.cases {
        assert!(case.status.is_ok(), "{}/{} errored", case.group, case.label);
        let stats = case.status.stats().expect("stats for ok case");
        assert_eq!(stats.samples, 5);
        assert!(stats.min_us > 0.0);
    }
}

#[tokio::test]
#[ignore = "requires a local Docker daemon"]
async fn back_to_back_runs_reuse_the_same_ports() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ports = PortMap::consecutive(50001, &["alpha", "beta"]);
    let config = config(write_seed(dir.path()));

    for _ in 0..2 {
        let coordinator = Coordinator::new(config.clone(), ports.clone(), provisioner(&config));
        let report = coordinator
            .run(probe_catalog(&ports))
            .await
            .expect("run completes");
        assert_eq!(report.ok_count(), 2);
    }
}
