// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command definitions for graph-upgrade

use clap::{Parser, Subcommand, ValueEnum};
use graph_upgrade::config::DEFAULT_ALPHA;

/// Log level options
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only errors
    Error,
    /// Warnings and errors
    Warn,
    /// Info, warnings, and errors
    Info,
    /// Debug messages and above (verbose)
    Debug,
    /// All messages including trace (very verbose)
    Trace,
    /// Disable all logging
    Off,
}

impl LogLevel {
    /// Convert to log::LevelFilter
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

/// graph-upgrade - rename predicates and types in a live Dgraph schema
#[derive(Parser)]
#[command(name = "graph-upgrade")]
#[command(about = "Rename predicates and types in a live Dgraph schema")]
#[command(version)]
pub struct Cli {
    /// HTTP address of a Dgraph alpha
    #[arg(short = 'a', long = "alpha", global = true, default_value = DEFAULT_ALPHA)]
    pub alpha: String,

    /// Username for ACL login
    #[arg(short = 'u', long = "user", global = true)]
    pub user: Option<String>,

    /// Password for ACL login (if not provided, will be prompted)
    #[arg(short = 'p', long = "password", global = true)]
    pub password: Option<String>,

    /// Per-attempt deadline in seconds for queries, mutations and alters
    #[arg(
        long = "deadline",
        global = true,
        default_value_t = 5,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub deadline: u64,

    /// Set log level (error, warn, info, debug, trace, off)
    #[arg(short = 'l', long = "log-level", global = true, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Verbose mode (equivalent to --log-level debug)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Effective log level; defaults to info
    pub fn level_filter(&self) -> log::LevelFilter {
        match (self.log_level, self.verbose) {
            (Some(level), _) => level.to_level_filter(),
            (None, true) => log::LevelFilter::Debug,
            (None, false) => log::LevelFilter::Info,
        }
    }
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Show detailed version information
    Version,

    /// Print the current schema as alter text
    Schema,

    /// Rename predicates and types, asking for each new name
    Rename {
        /// Predicate to rename (repeatable)
        #[arg(long = "predicate")]
        predicates: Vec<String>,

        /// Type to rename (repeatable)
        #[arg(long = "type")]
        types: Vec<String>,

        /// Predicate to remove from all types and drop (repeatable)
        #[arg(long = "drop")]
        drop: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rename() {
        let cli = Cli::parse_from([
            "graph-upgrade",
            "--alpha",
            "http://alpha:8080",
            "rename",
            "--predicate",
            "dgraph.age",
            "--predicate",
            "dgraph.name",
            "--type",
            "dgraph.Person",
        ]);

        assert_eq!(cli.alpha, "http://alpha:8080");
        match cli.command {
            Commands::Rename {
                predicates,
                types,
                drop,
            } => {
                assert_eq!(predicates, vec!["dgraph.age", "dgraph.name"]);
                assert_eq!(types, vec!["dgraph.Person"]);
                assert!(drop.is_empty());
            }
            _ => panic!("expected rename"),
        }
    }

    #[test]
    fn test_level_filter() {
        let cli = Cli::parse_from(["graph-upgrade", "-v", "schema"]);
        assert_eq!(cli.level_filter(), log::LevelFilter::Debug);

        let cli = Cli::parse_from(["graph-upgrade", "-v", "-l", "warn", "schema"]);
        assert_eq!(cli.level_filter(), log::LevelFilter::Warn);

        let cli = Cli::parse_from(["graph-upgrade", "schema"]);
        assert_eq!(cli.level_filter(), log::LevelFilter::Info);
        assert_eq!(cli.deadline, 5);
    }

    #[test]
    fn test_deadline_must_be_positive() {
        assert!(Cli::try_parse_from(["graph-upgrade", "--deadline", "0", "schema"]).is_err());

        let cli = Cli::try_parse_from(["graph-upgrade", "--deadline", "12", "schema"]).unwrap();
        assert_eq!(cli.deadline, 12);
    }
}
