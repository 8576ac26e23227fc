// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI module for graph-upgrade
//!
//! Provides the rename command, schema printing and version information.

pub mod commands;
pub mod handlers;

pub use commands::{Cli, Commands};
pub use handlers::{connection_config, handle_rename, handle_schema, handle_version};
