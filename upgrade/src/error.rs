// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Error types for graph-upgrade

use std::time::Duration;
use thiserror::Error;

/// Result type alias for upgrade operations
pub type Result<T> = std::result::Result<T, UpgradeError>;

/// Main error type for upgrade operations
#[derive(Error, Debug)]
pub enum UpgradeError {
    /// The alpha could not be reached
    #[error("unable to connect to Dgraph cluster: {0}")]
    Connection(String),

    /// Login was rejected or failed
    #[error("unable to login to Dgraph cluster: {0}")]
    Authentication(String),

    /// A read-only query failed
    #[error("Query error: {0}")]
    Query(String),

    /// A mutation was rejected by the alpha
    #[error("Mutation error: {0}")]
    Mutation(String),

    /// An alter operation was rejected by the alpha
    #[error("Alter error: {0}")]
    Alter(String),

    /// A single attempt ran past its deadline
    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Transport level HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O errors on the operator terminal
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The operator input ended before a valid name was supplied
    #[error("input closed while waiting for a new name for `{0}`")]
    InputClosed(String),

    /// Invalid connection settings
    #[error("Configuration error: {0}")]
    Config(String),
}

impl UpgradeError {
    /// Whether this error came from setting up the connection (dial or login)
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            UpgradeError::Connection(_) | UpgradeError::Authentication(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_errors() {
        assert!(UpgradeError::Connection("refused".into()).is_connection_error());
        assert!(UpgradeError::Authentication("bad password".into()).is_connection_error());
        assert!(!UpgradeError::Alter("Pending transactions found".into()).is_connection_error());
        assert!(!UpgradeError::InputClosed("age".into()).is_connection_error());
    }
}
