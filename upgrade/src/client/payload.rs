// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Request payloads for the write endpoints

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A data mutation.
///
/// JSON and N-Quad forms may not be mixed in a single mutation; when both are
/// set the N-Quads win and the JSON parts are ignored by the transport.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mutation {
    pub set_json: Option<Value>,
    pub delete_json: Option<Value>,
    pub set_nquads: String,
    pub del_nquads: String,
    pub commit_now: bool,
}

impl Mutation {
    pub fn set_json(value: Value) -> Self {
        Self {
            set_json: Some(value),
            ..Self::default()
        }
    }

    pub fn with_delete_json(mut self, value: Value) -> Self {
        self.delete_json = Some(value);
        self
    }

    /// True when there is nothing to send. Empty JSON arrays/objects count as nothing.
    pub fn is_empty(&self) -> bool {
        json_is_empty(&self.set_json)
            && json_is_empty(&self.delete_json)
            && self.set_nquads.trim().is_empty()
            && self.del_nquads.trim().is_empty()
    }

    pub fn uses_nquads(&self) -> bool {
        !self.set_nquads.trim().is_empty() || !self.del_nquads.trim().is_empty()
    }
}

fn json_is_empty(value: &Option<Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Array(items)) => items.is_empty(),
        Some(Value::Object(fields)) => fields.is_empty(),
        Some(_) => false,
    }
}

/// Drop variants understood by the alter endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DropOp {
    Attr,
    Type,
}

/// A schema operation for the alter endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Schema text, e.g. `name: string @index(exact) .`
    pub schema: String,
    pub drop_op: Option<DropOp>,
    /// Predicate or type name for `Attr`/`Type` drops
    pub drop_value: String,
}

impl Operation {
    pub fn schema(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            ..Self::default()
        }
    }

    pub fn drop_attr(predicate: impl Into<String>) -> Self {
        Self {
            drop_op: Some(DropOp::Attr),
            drop_value: predicate.into(),
            ..Self::default()
        }
    }

    pub fn drop_type(type_name: impl Into<String>) -> Self {
        Self {
            drop_op: Some(DropOp::Type),
            drop_value: type_name.into(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.schema.trim().is_empty() && self.drop_op.is_none()
    }
}
