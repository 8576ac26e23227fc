// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Fixed-count retry with a fresh deadline per attempt

use log::{debug, warn};
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;

use crate::error::{Result, UpgradeError};

/// Run `attempt` until it succeeds or `attempts` tries have failed.
///
/// Every try gets its own `deadline`; running past it counts as a failure.
/// There is no backoff and the error is not inspected: whatever failed is
/// tried again. The error of the last try is returned.
pub async fn with_retries<T, F, Fut>(
    operation: &'static str,
    attempts: u32,
    deadline: Duration,
    mut attempt: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = attempts.max(1);
    let mut tried = 1;

    loop {
        let outcome = match timeout(deadline, attempt()).await {
            Ok(outcome) => outcome,
            Err(_) => Err(UpgradeError::Timeout {
                operation,
                after: deadline,
            }),
        };

        match outcome {
            Ok(value) => {
                if tried > 1 {
                    debug!("{} succeeded on attempt {}/{}", operation, tried, attempts);
                }
                return Ok(value);
            }
            Err(e) if tried < attempts => {
                warn!(
                    "error in {}, retrying (attempt {}/{}): {}",
                    operation, tried, attempts, e
                );
                tried += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
