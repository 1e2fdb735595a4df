//! Dataset loading
//!
//! Applies the fixed DDL + seed script to a ready instance, once, before any
//! measured operation touches it. The script runs as a single batch; if any
//! statement fails the instance counts as unusable and is excluded from the
//! run (its teardown still happens). Partial application is not distinguished
//! from total failure.

use ormbench_core::{BenchError, BenchResult, ConnectionTarget};
use std::path::Path;
use tokio_postgres::NoTls;
use tracing::{debug, info};

/// Read the fixture at `script` and execute it against `target`.
pub async fn load(target: &ConnectionTarget, script: &Path) -> BenchResult<()> {
    let sql = tokio::fs::read_to_string(script).await?;
    debug!(port = target.port, bytes = sql.len(), "applying seed script");

    let (client, connection) = tokio_postgres::connect(&target.config_string(), NoTls)
        .await
        .map_err(|e| BenchError::Load {
            port: target.port,
            reason: e.to_string(),
        })?;
    let driver = tokio::spawn(async move {
        let _ = connection.await;
    });

    let result = client
        .batch_execute(&sql)
        .await
        .map_err(|e| BenchError::Load {
            port: target.port,
            reason: e.to_string(),
        });

    drop(client);
    driver.abort();

    if result.is_ok() {
        info!(port = target.port, "dataset loaded");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_fixture_is_an_io_error() {
        let target = ConnectionTarget::local(55000);
        let err = load(&target, Path::new("/nonexistent/init-db.sql"))
            .await
            .unwrap_err();
        assert!(matches!(err, BenchError::Io(_)));
    }

    #[tokio::test]
    async fn unreachable_instance_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("init-db.sql");
        std::fs::write(&script, "SELECT 1;").unwrap();

        // Nothing listens on port 1.
        let target = ConnectionTarget::local(1);
        let err = load(&target, &script).await.unwrap_err();
        match err {
            BenchError::Load { port, .. } => assert_eq!(port, 1),
            other => panic!("expected Load, got {other:?}"),
        }
    }
}
