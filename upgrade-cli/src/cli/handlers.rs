// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command handlers for graph-upgrade

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

use super::commands::Cli;
use graph_upgrade::schema::SCHEMA_QUERY;
use graph_upgrade::{
    connect, pred_schema_string, type_schema_string, ConnectionConfig, Credentials,
    RenameReport, RenameSelection, RenameWorkflow, SchemaSnapshot, Timeouts,
};

/// Build connection settings from the global flags, prompting for a
/// password when a user is given without one.
pub fn connection_config(cli: &Cli) -> Result<ConnectionConfig, Box<dyn std::error::Error>> {
    let mut config = ConnectionConfig::new(cli.alpha.clone())
        .with_timeouts(Timeouts::with_deadline(Duration::from_secs(cli.deadline)));

    if let Some(user) = &cli.user {
        let password = match &cli.password {
            Some(pwd) => pwd.clone(),
            None => {
                print!("Password for {}: ", user);
                std::io::Write::flush(&mut std::io::stdout())?;
                rpassword::read_password()?
            }
        };
        config = config.with_credentials(Credentials::new(user.clone(), password));
    }

    Ok(config)
}

/// Handle the rename command
pub async fn handle_rename(
    config: ConnectionConfig,
    selection: RenameSelection,
) -> Result<(), Box<dyn std::error::Error>> {
    if selection.is_empty() {
        println!(
            "{}",
            "Nothing to do: pass --predicate, --type or --drop".yellow()
        );
        return Ok(());
    }

    println!(
        "{}",
        format!("Connecting to Dgraph cluster at {}...", config.alpha)
            .bold()
            .green()
    );
    let connection = connect(&config).await?;

    let outcome = {
        let stdin = std::io::stdin();
        let mut workflow = RenameWorkflow::new(&connection, stdin.lock(), std::io::stdout());
        workflow.run(&selection).await
    };
    connection.close();

    let report = outcome?;
    println!("{}", format_report(&report));
    println!("{}", "\nRename complete!".bold().green());
    Ok(())
}

/// Handle the schema command
pub async fn handle_schema(config: ConnectionConfig) -> Result<(), Box<dyn std::error::Error>> {
    let connection = connect(&config).await?;
    let snapshot = connection.query::<SchemaSnapshot>(SCHEMA_QUERY).await;
    connection.close();

    print!("{}", render_schema(&snapshot?));
    Ok(())
}

/// Handle the version command
pub fn handle_version() {
    println!(
        "{} {}",
        env!("CARGO_PKG_NAME").bold().green(),
        env!("CARGO_PKG_VERSION")
    );
}

/// The whole schema as alter text, predicates first
fn render_schema(snapshot: &SchemaSnapshot) -> String {
    let mut out = String::new();
    for predicate in &snapshot.schema {
        out.push_str(&pred_schema_string(&predicate.name, predicate));
    }
    let no_renames = HashMap::new();
    let no_drops = HashSet::new();
    for schema_type in &snapshot.types {
        out.push('\n');
        out.push_str(&type_schema_string(
            &schema_type.name,
            schema_type,
            &no_renames,
            &no_drops,
        ));
    }
    out
}

fn format_report(report: &RenameReport) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Kind", "Old name", "New name", "Nodes"]);

    for p in &report.predicates {
        table.add_row(vec![
            Cell::new("predicate"),
            Cell::new(&p.old),
            Cell::new(&p.new),
            Cell::new(p.copied_nodes),
        ]);
    }
    for t in &report.types {
        table.add_row(vec![
            Cell::new("type"),
            Cell::new(&t.old),
            Cell::new(&t.new),
            Cell::new(t.retagged_nodes),
        ]);
    }
    for name in &report.rewritten_types {
        table.add_row(vec![
            Cell::new("type (rewritten)"),
            Cell::new(name),
            Cell::new(name),
            Cell::new("-"),
        ]);
    }
    for name in &report.dropped_predicates {
        table.add_row(vec![
            Cell::new("dropped"),
            Cell::new(name),
            Cell::new("-"),
            Cell::new("-"),
        ]);
    }

    let mut out = table.to_string();
    if !report.skipped.is_empty() {
        out.push_str(&format!(
            "\n{}",
            format!("Not found in schema: {}", report.skipped.join(", ")).yellow()
        ));
    }
    out
}
