// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Rename workflow for a caller-chosen set of predicates and types
//!
//! One run goes through these steps, stopping at the first error:
//! 1. read the schema and collect the names in use
//! 2. per predicate: ask a new name, create it, copy node data across
//! 3. per type: ask a new name
//! 4. rewrite every affected type, move node type tags, drop renamed types
//! 5. drop the old and the explicitly dropped predicates
//!
//! Nothing is rolled back; a failed run leaves whatever was already applied.

use log::{info, warn};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::io::{BufRead, Write};

use crate::client::{Connection, Mutation, Operation, Transport};
use crate::error::Result;
use crate::prompt::{ask_for_new_name, is_reserved_name};
use crate::schema::{
    pred_schema_string, type_schema_string, ExistingNames, RenamePlan, SchemaPredicate,
    SchemaSnapshot, SCHEMA_QUERY,
};
use crate::util::copy_map;

/// What the caller wants renamed or removed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameSelection {
    pub predicates: Vec<String>,
    pub types: Vec<String>,
    /// Predicates to remove from every type and from the schema
    pub drop: Vec<String>,
}

impl RenameSelection {
    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty() && self.types.is_empty() && self.drop.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredicateRename {
    pub old: String,
    pub new: String,
    /// Nodes whose values were copied to the new predicate
    pub copied_nodes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRename {
    pub old: String,
    pub new: String,
    /// Nodes whose `dgraph.type` was switched to the new name
    pub retagged_nodes: usize,
}

/// Outcome of a completed run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameReport {
    pub predicates: Vec<PredicateRename>,
    pub types: Vec<TypeRename>,
    /// Types rewritten in place because a member predicate changed
    pub rewritten_types: Vec<String>,
    pub dropped_predicates: Vec<String>,
    /// Selected names that were not found in the schema
    pub skipped: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct NodeList {
    #[serde(default)]
    nodes: Vec<Map<String, Value>>,
}

/// Drives one rename run over a borrowed connection.
///
/// New names are read from `input` with prompts written to `output`.
pub struct RenameWorkflow<'c, T: Transport, R, W> {
    connection: &'c Connection<T>,
    input: R,
    output: W,
    is_reserved: fn(&str) -> bool,
}

impl<'c, T, R, W> RenameWorkflow<'c, T, R, W>
where
    T: Transport,
    R: BufRead,
    W: Write,
{
    pub fn new(connection: &'c Connection<T>, input: R, output: W) -> Self {
        Self {
            connection,
            input,
            output,
            is_reserved: is_reserved_name,
        }
    }

    /// Replace the check deciding which new names are reserved
    pub fn with_reservation_check(mut self, is_reserved: fn(&str) -> bool) -> Self {
        self.is_reserved = is_reserved;
        self
    }

    pub async fn run(&mut self, selection: &RenameSelection) -> Result<RenameReport> {
        let snapshot: SchemaSnapshot = self.connection.query(SCHEMA_QUERY).await?;
        let mut existing = snapshot.existing_names();
        let mut plan = RenamePlan::new();
        let mut report = RenameReport::default();

        for old in &selection.predicates {
            if plan.renames().contains_key(old) {
                continue;
            }
            let Some(predicate) = snapshot.predicate(old) else {
                warn!("predicate `{}` not found in schema, skipping", old);
                report.skipped.push(old.clone());
                continue;
            };

            let new = self.ask(old, &existing)?;
            existing.insert(new.clone());

            self.connection
                .alter(Operation::schema(pred_schema_string(&new, predicate)))
                .await?;
            let copied_nodes = self.copy_predicate_data(predicate, &new).await?;
            info!(
                "Renamed predicate `{}` to `{}` ({} nodes copied)",
                old, new, copied_nodes
            );

            plan.rename(old.clone(), new.clone());
            report.predicates.push(PredicateRename {
                old: old.clone(),
                new,
                copied_nodes,
            });
        }

        for name in &selection.drop {
            if snapshot.predicate(name).is_some() {
                plan.drop_predicate(name.clone());
            } else {
                warn!("predicate `{}` not found in schema, nothing to drop", name);
                report.skipped.push(name.clone());
            }
        }

        let mut type_names: HashMap<String, String> = HashMap::new();
        for old in &selection.types {
            if type_names.contains_key(old) {
                continue;
            }
            if snapshot.schema_type(old).is_none() {
                warn!("type `{}` not found in schema, skipping", old);
                report.skipped.push(old.clone());
                continue;
            }
            let new = self.ask(old, &existing)?;
            existing.insert(new.clone());
            type_names.insert(old.clone(), new);
        }

        for schema_type in &snapshot.types {
            let renamed_to = type_names.get(&schema_type.name);
            if renamed_to.is_none() && !plan.touches(schema_type) {
                continue;
            }

            let new_type_name = renamed_to.unwrap_or(&schema_type.name);
            let new_pred_names = copy_map(plan.renames());
            self.connection
                .alter(Operation::schema(type_schema_string(
                    new_type_name,
                    schema_type,
                    &new_pred_names,
                    plan.drops(),
                )))
                .await?;

            match renamed_to {
                Some(new) => {
                    let retagged_nodes = self.retag_nodes(&schema_type.name, new).await?;
                    self.connection
                        .alter(Operation::drop_type(schema_type.name.clone()))
                        .await?;
                    info!(
                        "Renamed type `{}` to `{}` ({} nodes retagged)",
                        schema_type.name, new, retagged_nodes
                    );
                    report.types.push(TypeRename {
                        old: schema_type.name.clone(),
                        new: new.clone(),
                        retagged_nodes,
                    });
                }
                None => {
                    info!("Rewrote type `{}`", schema_type.name);
                    report.rewritten_types.push(schema_type.name.clone());
                }
            }
        }

        let to_drop: Vec<String> = report
            .predicates
            .iter()
            .map(|p| p.old.clone())
            .chain(selection.drop.iter().filter(|d| plan.drops().contains(*d)).cloned())
            .collect();
        for predicate in to_drop {
            if report.dropped_predicates.contains(&predicate) {
                continue;
            }
            self.connection
                .alter(Operation::drop_attr(predicate.clone()))
                .await?;
            info!("Dropped predicate `{}`", predicate);
            report.dropped_predicates.push(predicate);
        }

        Ok(report)
    }

    fn ask(&mut self, old: &str, existing: &ExistingNames) -> Result<String> {
        ask_for_new_name(
            &mut self.input,
            &mut self.output,
            old,
            self.is_reserved,
            existing,
        )
    }

    /// Copy every value of `predicate` onto `new_name` on the same nodes.
    ///
    /// Language-tagged values keep their tag. Facets are not copied.
    async fn copy_predicate_data(
        &self,
        predicate: &SchemaPredicate,
        new_name: &str,
    ) -> Result<usize> {
        let old = &predicate.name;
        let selector = if predicate.is_uid() {
            format!("<{}> {{ uid }}", old)
        } else if predicate.lang {
            format!("<{}>@*", old)
        } else {
            format!("<{}>", old)
        };
        let query = format!("{{ nodes(func: has(<{}>)) {{ uid {} }} }}", old, selector);

        let result: NodeList = self.connection.query(&query).await?;
        let set: Vec<Value> = result
            .nodes
            .into_iter()
            .filter_map(|node| rename_node_keys(node, old, new_name))
            .collect();

        let copied = set.len();
        self.connection
            .mutate(Mutation::set_json(Value::Array(set)))
            .await?;
        Ok(copied)
    }

    /// Point every node of type `old` at type `new` instead
    async fn retag_nodes(&self, old: &str, new: &str) -> Result<usize> {
        let query = format!("{{ nodes(func: type({})) {{ uid }} }}", old);
        let result: NodeList = self.connection.query(&query).await?;

        let uids: Vec<Value> = result
            .nodes
            .into_iter()
            .filter_map(|mut node| node.remove("uid"))
            .collect();
        let set: Vec<Value> = uids
            .iter()
            .map(|uid| json!({ "uid": uid, "dgraph.type": new }))
            .collect();
        let delete: Vec<Value> = uids
            .iter()
            .map(|uid| json!({ "uid": uid, "dgraph.type": old }))
            .collect();

        self.connection
            .mutate(Mutation::set_json(Value::Array(set)).with_delete_json(Value::Array(delete)))
            .await?;
        Ok(uids.len())
    }
}

/// `{uid, old: v, old@en: w}` becomes `{uid, new: v, new@en: w}`.
/// Nodes without a uid or without any value are skipped.
fn rename_node_keys(node: Map<String, Value>, old: &str, new: &str) -> Option<Value> {
    let mut renamed = Map::new();
    let mut has_value = false;

    for (key, value) in node {
        if key == "uid" {
            renamed.insert(key, value);
        } else if key == old {
            renamed.insert(new.to_string(), value);
            has_value = true;
        } else if let Some(lang) = key.strip_prefix(old).filter(|rest| rest.starts_with('@')) {
            renamed.insert(format!("{}{}", new, lang), value);
            has_value = true;
        }
    }

    if has_value && renamed.contains_key("uid") {
        Some(Value::Object(renamed))
    } else {
        None
    }
}
