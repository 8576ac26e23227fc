// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Connection settings for the target Dgraph cluster
//!
//! Timeouts are applied per attempt: a retried mutation or alter gets a fresh
//! window for every try.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::{Result, UpgradeError};

/// Default HTTP endpoint of a local alpha
pub const DEFAULT_ALPHA: &str = "http://localhost:8080";

/// Number of attempts made for every mutate and alter call
pub const MAX_WRITE_ATTEMPTS: u32 = 3;

/// Username/password pair used for ACL login
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }
}

/// Per-operation deadlines
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Timeouts {
    /// Deadline for the login call
    /// Default: 3 seconds
    pub login: Duration,

    /// Deadline for a read-only query
    /// Default: 5 seconds
    pub query: Duration,

    /// Deadline for each mutate or alter attempt
    /// Default: 5 seconds
    pub write: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            login: Duration::from_secs(3),
            query: Duration::from_secs(5),
            write: Duration::from_secs(5),
        }
    }
}

impl Timeouts {
    /// Use the same deadline for queries and writes, keeping the login default
    pub fn with_deadline(deadline: Duration) -> Self {
        Self {
            query: deadline,
            write: deadline,
            ..Self::default()
        }
    }
}

/// Everything needed to provision a connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    /// Alpha HTTP address, e.g. `http://localhost:8080`
    pub alpha: String,

    /// Login credentials; `None` skips authentication
    pub credentials: Option<Credentials>,

    pub timeouts: Timeouts,

    /// Attempts per mutate/alter call
    pub write_attempts: u32,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA.to_string(),
            credentials: None,
            timeouts: Timeouts::default(),
            write_attempts: MAX_WRITE_ATTEMPTS,
        }
    }
}

impl ConnectionConfig {
    pub fn new(alpha: impl Into<String>) -> Self {
        Self {
            alpha: alpha.into(),
            ..Self::default()
        }
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Alpha address with a scheme and without a trailing slash
    pub fn base_url(&self) -> Result<String> {
        let alpha = self.alpha.trim();
        if alpha.is_empty() {
            return Err(UpgradeError::Config("alpha address is required".into()));
        }
        if self.write_attempts == 0 {
            return Err(UpgradeError::Config(
                "write_attempts must be at least 1".into(),
            ));
        }

        let url = if alpha.starts_with("http://") || alpha.starts_with("https://") {
            alpha.to_string()
        } else {
            format!("http://{}", alpha)
        };
        Ok(url.trim_end_matches('/').to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ConnectionConfig::default();
        assert_eq!(config.alpha, DEFAULT_ALPHA);
        assert_eq!(config.write_attempts, 3);
        assert_eq!(config.timeouts.login, Duration::from_secs(3));
        assert_eq!(config.timeouts.query, Duration::from_secs(5));
        assert_eq!(config.timeouts.write, Duration::from_secs(5));
        assert!(config.credentials.is_none());
    }

    #[test]
    fn test_base_url_adds_scheme_and_strips_slash() {
        let config = ConnectionConfig::new("alpha-0:8080/");
        assert_eq!(config.base_url().unwrap(), "http://alpha-0:8080");

        let config = ConnectionConfig::new("https://cloud.example.com");
        assert_eq!(config.base_url().unwrap(), "https://cloud.example.com");
    }

    #[test]
    fn test_base_url_rejects_empty_alpha() {
        let config = ConnectionConfig::new("  ");
        assert!(matches!(config.base_url(), Err(UpgradeError::Config(_))));
    }

    #[test]
    fn test_deadline_keeps_login_default() {
        let timeouts = Timeouts::with_deadline(Duration::from_secs(30));
        assert_eq!(timeouts.query, Duration::from_secs(30));
        assert_eq!(timeouts.write, Duration::from_secs(30));
        assert_eq!(timeouts.login, Duration::from_secs(3));
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: ConnectionConfig =
            serde_json::from_str(r#"{"alpha": "http://10.0.0.1:8080"}"#).unwrap();
        assert_eq!(config.alpha, "http://10.0.0.1:8080");
        assert_eq!(config.write_attempts, MAX_WRITE_ATTEMPTS);
    }
}
