// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! graph-upgrade command-line entry point

mod cli;

use clap::Parser;
use colored::Colorize;
use graph_upgrade::{RenameSelection, UpgradeError};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.level_filter())
        .format_timestamp(None)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("{}", format!("Error: {}", e).red());
        std::process::exit(exit_code(e.as_ref()));
    }
}

/// Exit status: 2 when the alpha could not be reached or refused the login,
/// 1 for every other failure.
fn exit_code(error: &(dyn std::error::Error + 'static)) -> i32 {
    match error.downcast_ref::<UpgradeError>() {
        Some(e) if e.is_connection_error() => 2,
        _ => 1,
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match &cli.command {
        Commands::Version => {
            cli::handle_version();
            Ok(())
        }
        Commands::Schema => {
            let config = cli::connection_config(&cli)?;
            cli::handle_schema(config).await
        }
        Commands::Rename {
            predicates,
            types,
            drop,
        } => {
            let config = cli::connection_config(&cli)?;
            let selection = RenameSelection {
                predicates: predicates.clone(),
                types: types.clone(),
                drop: drop.clone(),
            };
            cli::handle_rename(config, selection).await
        }
    }
}
