//! Readiness gate for freshly started database instances
//!
//! A container reports "started" well before postgres accepts connections,
//! so each instance is polled with a lightweight connect + `SELECT 1`
//! handshake until it answers or the budget runs out. Polling for one
//! instance never blocks polling for its siblings; the coordinator fans the
//! waits out in parallel.

use crate::retry::{until_ready, RetryOutcome};
use ormbench_core::{BenchError, BenchResult, ConnectionTarget};
use std::time::Duration;
use tokio_postgres::NoTls;
use tracing::debug;

/// Block until `target` accepts connections, or fail with
/// [`BenchError::ReadinessTimeout`] carrying the last connection error.
pub async fn await_ready(
    target: &ConnectionTarget,
    budget: Duration,
    interval: Duration,
) -> BenchResult<()> {
    let config = target.config_string();

    // A listener that accepts TCP but never completes the postgres handshake
    // would otherwise stall an attempt forever; capping each attempt at one
    // interval keeps the overall wait bounded by budget + interval.
    let outcome = until_ready(interval, budget, || {
        let config = config.clone();
        async move {
            match tokio::time::timeout(interval, handshake(&config)).await {
                Ok(result) => result,
                Err(_) => Err(format!(
                    "handshake still pending after {} ms",
                    interval.as_millis()
                )),
            }
        }
    })
    .await;

    match outcome {
        RetryOutcome::Ready(()) => {
            debug!(port = target.port, "database ready");
            Ok(())
        }
        RetryOutcome::TimedOut { waited, last_error } => Err(BenchError::ReadinessTimeout {
            port: target.port,
            waited_ms: waited.as_millis() as u64,
            last_error: last_error.unwrap_or_else(|| "no connection attempt completed".to_string()),
        }),
    }
}

/// One connect + `SELECT 1` probe.
async fn handshake(config: &str) -> Result<(), String> {
    let (client, connection) = tokio_postgres::connect(config, NoTls)
        .await
        .map_err(|e| e.to_string())?;

    // The connection object drives the socket; it ends when the client drops.
    let driver = tokio::spawn(async move {
        let _ = connection.await;
    });

    let result = client
        .simple_query("SELECT 1")
        .await
        .map(|_| ())
        .map_err(|e| e.to_string());

    drop(client);
    driver.abort();
    result
}
