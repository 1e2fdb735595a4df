//! Ephemeral database provisioning via the Docker CLI
//!
//! One single-use, auto-removing `postgres` container per strategy, each
//! bound to its reserved host port and isolated by a UUID-suffixed name so
//! concurrent runs never collide. The image pull happens at most once per
//! distinct image per run; parallel provisioning calls for the same image
//! wait for the completed pull instead of fetching it again.
//!
//! Teardown is best-effort by contract: a failed `docker stop` is logged and
//! swallowed so the sweep still reaches every other instance.

use async_trait::async_trait;
use ormbench_core::{BenchError, BenchResult, ConnectionTarget};
use std::collections::HashSet;
use std::path::Path;
use std::process::Output;
use std::time::Duration;
use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Lifecycle state of one ephemeral database instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbState {
    Creating,
    Starting,
    Ready,
    Seeding,
    Seeded,
    Failed,
    Stopped,
}

/// One ephemeral, isolated database process.
///
/// Owned by the coordinator's instance registry from the moment provisioning
/// returns; teardown must be attempted for every instance that reached
/// `Starting`, on every exit path.
#[derive(Debug, Clone)]
pub struct DatabaseInstance {
    pub id: Uuid,
    /// Strategy this instance was provisioned for
    pub strategy: String,
    /// Host port bound to the container's 5432
    pub port: u16,
    /// Docker container name, unique per run
    pub container: String,
    pub state: DbState,
}

/// Seam between the coordinator and the container runtime.
///
/// The production implementation shells out to Docker; tests substitute a
/// mock that fails on demand and counts teardowns.
#[async_trait]
pub trait Provisioner: Send + Sync {
    /// Create and start a single-use database instance on `port`.
    async fn provision(&self, strategy: &str, port: u16) -> BenchResult<DatabaseInstance>;

    /// Poll `target` until it accepts connections or the budget elapses.
    /// The default delegates to the readiness gate.
    async fn await_ready(
        &self,
        target: &ConnectionTarget,
        budget: Duration,
        interval: Duration,
    ) -> BenchResult<()> {
        crate::readiness::await_ready(target, budget, interval).await
    }

    /// Apply the DDL + seed fixture at `script` to `target`.
    /// The default delegates to the dataset loader.
    async fn seed(&self, target: &ConnectionTarget, script: &Path) -> BenchResult<()> {
        crate::seed::load(target, script).await
    }

    /// Stop and remove the instance. Never fails outward; individual errors
    /// are logged so the rest of the sweep proceeds.
    async fn teardown(&self, instance: &mut DatabaseInstance);
}

/// Docker-CLI-backed provisioner.
pub struct DockerProvisioner {
    image: String,
    db_user: String,
    db_password: String,
    db_name: String,
    /// Images already pulled this run. The lock is held across the pull so
    /// concurrent callers for the same image observe the completed fetch.
    pulled: Mutex<HashSet<String>>,
}

impl DockerProvisioner {
    pub fn new(
        image: impl Into<String>,
        db_user: impl Into<String>,
        db_password: impl Into<String>,
        db_name: impl Into<String>,
    ) -> Self {
        Self {
            image: image.into(),
            db_user: db_user.into(),
            db_password: db_password.into(),
            db_name: db_name.into(),
            pulled: Mutex::new(HashSet::new()),
        }
    }

    /// Pull the image unless this run already did.
    async fn ensure_image(&self) -> Result<(), String> {
        let mut pulled = self.pulled.lock().await;
        if pulled.contains(&self.image) {
            return Ok(());
        }
        info!(image = %self.image, "pulling image");
        run_docker(&["pull", &self.image]).await?;
        pulled.insert(self.image.clone());
        Ok(())
    }

    /// Arguments for `docker run`, split out for testability.
    fn run_args(&self, container: &str, port: u16) -> Vec<String> {
        vec![
            "run".to_string(),
            "-d".to_string(),
            "--rm".to_string(),
            "--name".to_string(),
            container.to_string(),
            "-e".to_string(),
            format!("POSTGRES_USER={}", self.db_user),
            "-e".to_string(),
            format!("POSTGRES_PASSWORD={}", self.db_password),
            "-e".to_string(),
            format!("POSTGRES_DB={}", self.db_name),
            "-p".to_string(),
            format!("{port}:5432"),
            self.image.clone(),
        ]
    }
}

#[async_trait]
impl Provisioner for DockerProvisioner {
    async fn provision(&self, strategy: &str, port: u16) -> BenchResult<DatabaseInstance> {
        let id = Uuid::new_v4();
        let container = format!("benchmarks-tests-{id}");
        let mut instance = DatabaseInstance {
            id,
            strategy: strategy.to_string(),
            port,
            container: container.clone(),
            state: DbState::Creating,
        };

        self.ensure_image()
            .await
            .map_err(|reason| BenchError::Provision {
                strategy: strategy.to_string(),
                reason,
            })?;

        let args = self.run_args(&container, port);
        let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
        run_docker(&arg_refs)
            .await
            .map_err(|reason| BenchError::Provision {
                strategy: strategy.to_string(),
                reason,
            })?;

        instance.state = DbState::Starting;
        info!(strategy, port, container = %container, "container started");
        Ok(instance)
    }

    async fn teardown(&self, instance: &mut DatabaseInstance) {
        debug!(container = %instance.container, "stopping container");
        // --rm on the run side removes the container once stopped.
        match run_docker(&["stop", &instance.container]).await {
            Ok(_) => {
                instance.state = DbState::Stopped;
                info!(container = %instance.container, "container stopped");
            }
            Err(reason) => {
                let err = BenchError::Teardown {
                    container: instance.container.clone(),
                    reason,
                };
                warn!(error = %err, "teardown failed, continuing sweep");
            }
        }
    }
}

/// Run a docker subcommand, returning trimmed stdout on success.
///
/// Failures come back as plain messages; the caller decides which error
/// variant (`Provision`, `Teardown`) the command was part of.
async fn run_docker(args: &[&str]) -> Result<String, String> {
    let output: Output = Command::new("docker")
        .args(args)
        .output()
        .await
        .map_err(|e| format!("failed to spawn docker {}: {e}", args.join(" ")))?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        Err(command_failure(args, &String::from_utf8_lossy(&output.stderr)))
    }
}

fn command_failure(args: &[&str], stderr: &str) -> String {
    format!("docker {} failed: {}", args.join(" "), stderr.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provisioner() -> DockerProvisioner {
        DockerProvisioner::new("postgres:alpine", "postgres", "postgres", "postgres")
    }

    #[test]
    fn run_args_bind_port_and_env() {
        let p = provisioner();
        let args = p.run_args("benchmarks-tests-x", 55003);
        assert!(args.contains(&"--rm".to_string()));
        assert!(args.contains(&"55003:5432".to_string()));
        assert!(args.contains(&"POSTGRES_PASSWORD=postgres".to_string()));
        assert_eq!(args.last().unwrap(), "postgres:alpine");
    }

    #[test]
    fn failed_stop_reads_as_a_teardown_error() {
        let reason = command_failure(&["stop", "benchmarks-tests-x"], "No such container\n");
        let err = BenchError::Teardown {
            container: "benchmarks-tests-x".to_string(),
            reason,
        };
        let msg = err.to_string();
        assert!(msg.contains("teardown failed"));
        assert!(msg.contains("No such container"));
        assert!(!msg.contains("invalid configuration"));
    }

    #[test]
    fn container_names_are_unique() {
        // The name embeds a v4 UUID; two instances must never collide.
        let a = format!("benchmarks-tests-{}", Uuid::new_v4());
        let b = format!("benchmarks-tests-{}", Uuid::new_v4());
        assert_ne!(a, b);
    }
}
