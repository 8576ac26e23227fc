// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Connection provisioning and the query/mutate/alter executor

use log::{debug, info};
use serde::de::DeserializeOwned;
use tokio::time::timeout;

use super::http::HttpTransport;
use super::payload::{Mutation, Operation};
use super::retry::with_retries;
use super::transport::Transport;
use crate::config::{ConnectionConfig, Timeouts};
use crate::error::{Result, UpgradeError};

/// Dial the configured alpha and log in when credentials are set.
///
/// The returned connection is owned by the caller; it is closed by
/// [`Connection::close`] or when dropped.
pub async fn connect(config: &ConnectionConfig) -> Result<Connection<HttpTransport>> {
    let transport = HttpTransport::dial(config).await?;
    Connection::open(transport, config).await
}

/// A live connection to the cluster.
///
/// Reads run once under the query deadline. Mutations and alters are retried
/// up to `write_attempts` times with a fresh deadline per attempt.
pub struct Connection<T: Transport> {
    transport: T,
    timeouts: Timeouts,
    write_attempts: u32,
    closed: bool,
}

impl<T: Transport> Connection<T> {
    /// Wrap an established transport, logging in if `config` carries credentials.
    ///
    /// On login failure the transport is closed before the error is returned.
    pub async fn open(transport: T, config: &ConnectionConfig) -> Result<Self> {
        let connection = Self {
            transport,
            timeouts: config.timeouts,
            write_attempts: config.write_attempts,
            closed: false,
        };

        if let Some(credentials) = &config.credentials {
            let login = timeout(
                connection.timeouts.login,
                connection.transport.login(credentials),
            )
            .await;

            let outcome = match login {
                Ok(Ok(())) => Ok(()),
                Ok(Err(UpgradeError::Authentication(msg))) => Err(msg),
                Ok(Err(e)) => Err(e.to_string()),
                Err(_) => Err(format!(
                    "login timed out after {:?}",
                    connection.timeouts.login
                )),
            };

            if let Err(msg) = outcome {
                connection.close();
                return Err(UpgradeError::Authentication(msg));
            }
            info!("Logged in to Dgraph cluster as '{}'", credentials.user);
        }

        Ok(connection)
    }

    /// Run a read-only query and deserialize its `data` into `R`. Not retried.
    pub async fn query<R: DeserializeOwned>(&self, query: &str) -> Result<R> {
        debug!("[QUERY] {}", query.replace('\n', " "));
        let data = match timeout(self.timeouts.query, self.transport.query(query)).await {
            Ok(data) => data?,
            Err(_) => {
                return Err(UpgradeError::Timeout {
                    operation: "query",
                    after: self.timeouts.query,
                })
            }
        };
        Ok(serde_json::from_value(data)?)
    }

    /// Apply a mutation with `commitNow`. An empty mutation is a no-op.
    pub async fn mutate(&self, mut mutation: Mutation) -> Result<()> {
        if mutation.is_empty() {
            return Ok(());
        }
        mutation.commit_now = true;

        let transport = &self.transport;
        let mutation = &mutation;
        with_retries("mutation", self.write_attempts, self.timeouts.write, move || {
            transport.mutate(mutation)
        })
        .await
    }

    /// Apply a schema operation. An empty operation is a no-op.
    pub async fn alter(&self, operation: Operation) -> Result<()> {
        if operation.is_empty() {
            return Ok(());
        }

        let transport = &self.transport;
        let operation = &operation;
        with_retries("alter", self.write_attempts, self.timeouts.write, move || {
            transport.alter(operation)
        })
        .await
    }

    /// Release the connection
    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.closed {
            self.transport.close();
            self.closed = true;
            debug!("Connection to Dgraph cluster closed");
        }
    }
}

impl<T: Transport> Drop for Connection<T> {
    fn drop(&mut self) {
        self.release();
    }
}
