// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! The remote procedure boundary beneath a [`Connection`](super::Connection)

use async_trait::async_trait;
use serde_json::Value;

use super::payload::{Mutation, Operation};
use crate::config::Credentials;
use crate::error::Result;

/// One connection to an alpha.
///
/// Implementations perform a single call per method; deadlines and retries
/// are applied by the [`Connection`](super::Connection) on top.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Log in; subsequent calls carry the obtained access token
    async fn login(&self, credentials: &Credentials) -> Result<()>;

    /// Run a read-only query and return the `data` part of the response
    async fn query(&self, query: &str) -> Result<Value>;

    /// Apply a mutation
    async fn mutate(&self, mutation: &Mutation) -> Result<()>;

    /// Apply a schema operation
    async fn alter(&self, operation: &Operation) -> Result<()>;

    /// Release the underlying connection. Calls after this fail.
    fn close(&self);
}
