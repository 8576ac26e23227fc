// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Alter text for predicates and types under new names
//!
//! The directive order below is the order the alpha's schema parser expects.

use std::collections::{HashMap, HashSet};

use super::{SchemaPredicate, SchemaType};

/// Schema line re-creating `predicate` as `new_name`.
///
/// ```text
/// ageOnEarth: int @index(int) @upsert .
/// ```
pub fn pred_schema_string(new_name: &str, predicate: &SchemaPredicate) -> String {
    let mut out = String::with_capacity(new_name.len() + predicate.value_type.len() + 16);
    out.push_str(new_name);
    out.push_str(": ");

    if predicate.list {
        out.push('[');
        out.push_str(&predicate.value_type);
        out.push(']');
    } else {
        out.push_str(&predicate.value_type);
    }
    out.push(' ');

    if predicate.count {
        out.push_str("@count ");
    }
    if predicate.index {
        out.push_str("@index(");
        out.push_str(&predicate.tokenizer.join(", "));
        out.push_str(") ");
    }
    if predicate.lang {
        out.push_str("@lang ");
    }
    if predicate.noconflict {
        out.push_str("@noconflict ");
    }
    if predicate.reverse {
        out.push_str("@reverse ");
    }
    if predicate.upsert {
        out.push_str("@upsert ");
    }

    out.push_str(".\n");
    out
}

/// Type block re-creating `schema_type` as `new_type_name`.
///
/// Fields keep their original order. A field in `preds_to_remove` is left
/// out; a field in `new_pred_names` is written under its new name.
///
/// ```text
/// type Person {          type Human {
///   name                   name
///   age            =>      ageOnEarth
///   unnecessaryEdge      }
/// }
/// ```
/// with `new_pred_names = {age: ageOnEarth}` and
/// `preds_to_remove = {unnecessaryEdge}`.
pub fn type_schema_string(
    new_type_name: &str,
    schema_type: &SchemaType,
    new_pred_names: &HashMap<String, String>,
    preds_to_remove: &HashSet<String>,
) -> String {
    let mut out = format!("type {} {{\n", new_type_name);

    for field in &schema_type.fields {
        if preds_to_remove.contains(&field.name) {
            continue;
        }
        let name = new_pred_names.get(&field.name).unwrap_or(&field.name);
        out.push_str("  ");
        out.push_str(name);
        out.push('\n');
    }

    out.push_str("}\n");
    out
}
