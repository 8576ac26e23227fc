// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! graph-upgrade - rename predicates and types in a live Dgraph schema
//!
//! # Module Organization
//!
//! - [`client`] - connection provisioning and the query/mutate/alter executor
//! - [`schema`] - schema snapshots, rename plans and the alter text generator
//! - [`prompt`] - interactive prompt for replacement names
//! - [`rename`] - the rename workflow tying the pieces together
//! - [`config`] - connection settings and deadlines
//! - [`error`] - error types
//!
//! # Example
//!
//! ```no_run
//! use graph_upgrade::{connect, ConnectionConfig, RenameSelection, RenameWorkflow};
//!
//! # async fn run() -> graph_upgrade::Result<()> {
//! let connection = connect(&ConnectionConfig::new("http://localhost:8080")).await?;
//! let selection = RenameSelection {
//!     predicates: vec!["dgraph.age".to_string()],
//!     ..RenameSelection::default()
//! };
//!
//! let stdin = std::io::stdin();
//! let report = RenameWorkflow::new(&connection, stdin.lock(), std::io::stdout())
//!     .run(&selection)
//!     .await?;
//! println!("{:?}", report);
//! connection.close();
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod prompt;
pub mod rename;
pub mod schema;
pub mod util;

pub use client::{connect, Connection, HttpTransport, Mutation, Operation, Transport};
pub use config::{ConnectionConfig, Credentials, Timeouts};
pub use error::{Result, UpgradeError};
pub use prompt::{ask_for_new_name, is_reserved_name};
pub use rename::{RenameReport, RenameSelection, RenameWorkflow};
pub use schema::{
    pred_schema_string, type_schema_string, RenamePlan, SchemaPredicate, SchemaSnapshot,
    SchemaType,
};
pub use util::copy_map;
