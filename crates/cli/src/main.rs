//! ormbench - comparative PostgreSQL access-strategy benchmarks
//!
//! Provisions one throwaway database per strategy, seeds the shared
//! dataset, runs every catalog case sequentially, prints a per-group
//! comparison table, and tears everything down. `--no-provision` skips
//! Docker entirely and measures against databases the caller already
//! started on the expected ports.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use ormbench_core::{Catalog, HarnessConfig, RunMeta, RunReport};
use ormbench_harness::{
    export_csv, export_json, print_report, run_catalog, Coordinator, DockerProvisioner,
    TimingConfig,
};
use ormbench_strategies::{default_ports, register_all};

#[derive(Parser, Debug)]
#[command(
    name = "ormbench",
    version,
    about = "Compare PostgreSQL access strategies on a fixed dataset"
)]
struct Cli {
    /// Unmeasured invocations per case before sampling starts
    #[arg(long, default_value_t = 10)]
    warmup: u32,

    /// Measured invocations per case
    #[arg(long, default_value_t = 100)]
    iterations: u32,

    /// Docker image to provision
    #[arg(long, default_value = "postgres:alpine")]
    image: String,

    /// DDL + fixture script applied to every instance
    #[arg(long, default_value = "data/init-db.sql")]
    seed: PathBuf,

    /// Write the full report as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write per-case summary rows as CSV to this path
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Skip provisioning and measure against already-running databases
    /// listening on the assigned ports
    #[arg(long)]
    no_provision: bool,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let ports = default_ports();

    // Catalog problems (duplicate group/label pairs, unassigned ports) are
    // caller mistakes; surface them before any container is started.
    let mut catalog = Catalog::new();
    if let Err(e) = register_all(&mut catalog, &ports) {
        error!(error = %e, "failed to build the benchmark catalog");
        process::exit(2);
    }

    let config = HarnessConfig {
        image: cli.image.clone(),
        warmup: cli.warmup,
        iterations: cli.iterations,
        seed_script: cli.seed.clone(),
        ..HarnessConfig::default()
    };
    if let Err(e) = config.validate() {
        error!(error = %e, "invalid configuration");
        process::exit(2);
    }

    let report = if cli.no_provision {
        let timing = TimingConfig {
            warmup: config.warmup,
            iterations: config.iterations,
        };
        let meta = RunMeta::capture(config.warmup, config.iterations);
        let cases = run_catalog(&catalog, timing).await;
        RunReport::new(meta, cases)
    } else {
        let provisioner = DockerProvisioner::new(
            &config.image,
            &config.db_user,
            &config.db_password,
            &config.db_name,
        );
        match Coordinator::new(config, ports, provisioner).run(catalog).await {
            Ok(report) => report,
            Err(e) => {
                error!(error = %e, "benchmark run aborted");
                process::exit(1);
            }
        }
    };

    print_report(&report);

    if let Some(path) = &cli.json {
        if let Err(e) = export_json(&report, path) {
            error!(path = %path.display(), error = %e, "failed to write JSON report");
            process::exit(1);
        }
    }
    if let Some(path) = &cli.csv {
        if let Err(e) = export_csv(&report, path) {
            error!(path = %path.display(), error = %e, "failed to write CSV report");
            process::exit(1);
        }
    }
}
