// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Schema snapshots and rename plans
//!
//! Snapshots are read from the `schema {}` query and are never modified;
//! [`generator`] turns them back into alter text under new names.

pub mod generator;

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub use generator::{pred_schema_string, type_schema_string};

/// Query returning every predicate and type definition
pub const SCHEMA_QUERY: &str = "schema {}";

/// Names already taken in the schema
pub type ExistingNames = HashSet<String>;

/// One predicate as reported by `schema {}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaPredicate {
    #[serde(rename = "predicate")]
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: String,
    #[serde(default)]
    pub list: bool,
    #[serde(default)]
    pub count: bool,
    #[serde(default)]
    pub index: bool,
    /// Tokenizers in the order they were declared
    #[serde(default)]
    pub tokenizer: Vec<String>,
    #[serde(default)]
    pub lang: bool,
    #[serde(default, rename = "no_conflict")]
    pub noconflict: bool,
    #[serde(default)]
    pub reverse: bool,
    #[serde(default)]
    pub upsert: bool,
}

impl SchemaPredicate {
    pub fn new(name: impl Into<String>, value_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value_type: value_type.into(),
            ..Self::default()
        }
    }

    /// Edges to other nodes rather than scalar values
    pub fn is_uid(&self) -> bool {
        self.value_type == "uid"
    }
}

/// A field reference inside a type definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeField {
    pub name: String,
}

/// One type as reported by `schema {}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaType {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<TypeField>,
}

impl SchemaType {
    pub fn new<I, S>(name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            fields: fields
                .into_iter()
                .map(|f| TypeField { name: f.into() })
                .collect(),
        }
    }
}

/// Result shape of [`SCHEMA_QUERY`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    #[serde(default)]
    pub schema: Vec<SchemaPredicate>,
    #[serde(default)]
    pub types: Vec<SchemaType>,
}

impl SchemaSnapshot {
    pub fn predicate(&self, name: &str) -> Option<&SchemaPredicate> {
        self.schema.iter().find(|p| p.name == name)
    }

    pub fn schema_type(&self, name: &str) -> Option<&SchemaType> {
        self.types.iter().find(|t| t.name == name)
    }

    /// All predicate and type names
    pub fn existing_names(&self) -> ExistingNames {
        self.schema
            .iter()
            .map(|p| p.name.clone())
            .chain(self.types.iter().map(|t| t.name.clone()))
            .collect()
    }
}

/// Old→new predicate names plus predicates to remove from type field lists.
///
/// A predicate without an entry keeps its name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenamePlan {
    renames: HashMap<String, String>,
    drops: HashSet<String>,
}

impl RenamePlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rename(&mut self, old: impl Into<String>, new: impl Into<String>) -> &mut Self {
        self.renames.insert(old.into(), new.into());
        self
    }

    pub fn drop_predicate(&mut self, name: impl Into<String>) -> &mut Self {
        self.drops.insert(name.into());
        self
    }

    pub fn new_name_for<'a>(&'a self, old: &'a str) -> &'a str {
        self.renames.get(old).map(String::as_str).unwrap_or(old)
    }

    pub fn renames(&self) -> &HashMap<String, String> {
        &self.renames
    }

    pub fn drops(&self) -> &HashSet<String> {
        &self.drops
    }

    /// Whether a type's definition changes under this plan
    pub fn touches(&self, schema_type: &SchemaType) -> bool {
        schema_type
            .fields
            .iter()
            .any(|f| self.renames.contains_key(&f.name) || self.drops.contains(&f.name))
    }
}
