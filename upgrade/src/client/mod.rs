// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Client side of the remote cluster
//!
//! - [`connect`] provisions a [`Connection`] (dial + optional login)
//! - [`Connection`] executes queries, mutations and schema alters
//! - [`Transport`] is the seam to the wire; [`HttpTransport`] speaks the
//!   alpha's HTTP API

pub mod connection;
pub mod http;
pub mod payload;
pub mod retry;
pub mod transport;

pub use connection::{connect, Connection};
pub use http::HttpTransport;
pub use payload::{DropOp, Mutation, Operation};
pub use retry::with_retries;
pub use transport::Transport;
