//! Lazily-connecting PostgreSQL session, one per strategy
//!
//! Sessions are constructed at catalog-registration time, before any
//! database exists; the underlying connection is established on first use
//! and reused for every subsequent invocation, so the warm-up phase absorbs
//! the connect cost. Each session is exclusive to one strategy - no
//! connection is ever shared across cases running for different strategies.

use ormbench_core::{CaseError, ConnectionTarget};
use std::collections::HashMap;
use tokio::sync::{Mutex, OnceCell};
use tokio_postgres::{Client, NoTls, Statement};
use tracing::debug;

/// A connection endpoint plus a lazy client and a prepared-statement cache.
pub struct PgSession {
    target: ConnectionTarget,
    client: OnceCell<Client>,
    statements: Mutex<HashMap<&'static str, Statement>>,
}

impl PgSession {
    pub fn new(target: ConnectionTarget) -> Self {
        Self {
            target,
            client: OnceCell::new(),
            statements: Mutex::new(HashMap::new()),
        }
    }

    pub fn target(&self) -> &ConnectionTarget {
        &self.target
    }

    /// The connected client, establishing the connection on first call.
    pub async fn client(&self) -> Result<&Client, CaseError> {
        let client = self
            .client
            .get_or_try_init(|| async {
                let (client, connection) =
                    tokio_postgres::connect(&self.target.config_string(), NoTls).await?;
                let port = self.target.port;
                tokio::spawn(async move {
                    if let Err(e) = connection.await {
                        debug!(port, error = %e, "connection task ended");
                    }
                });
                debug!(port, "session connected");
                Ok::<_, tokio_postgres::Error>(client)
            })
            .await?;
        Ok(client)
    }

    /// A named prepared statement for `sql`, prepared once per session.
    pub async fn prepared(&self, sql: &'static str) -> Result<Statement, CaseError> {
        {
            let cache = self.statements.lock().await;
            if let Some(statement) = cache.get(sql) {
                return Ok(statement.clone());
            }
        }
        let statement = self.client().await?.prepare(sql).await?;
        self.statements.lock().await.insert(sql, statement.clone());
        Ok(statement)
    }
}
