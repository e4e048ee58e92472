//! # replicator-generator-cli
//!
//! Command-line front end for generating ChanneldUE replicators from
//! exported reflection data.
//!
//! ## Commands
//!
//! - `repgen generate [CLASS...]` - Generate replicators and channel data
//! - `repgen list` - List generated replicators
//! - `repgen remove <ID...>` - Delete the files of generated replicators
//! - `repgen clean` - Empty the output directory
//! - `repgen status` - Show the last run and whether it is stale
//! - `repgen inspect <CLASS>` - Show how a class would be generated
//! - `repgen config init|validate` - Manage repgen.toml
//!
//! See `repgen --help` for the full command reference.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::io;
use std::process;

mod commands;
mod config;
mod telemetry;
mod ui;

#[derive(Parser)]
#[command(name = "repgen")]
#[command(about = "Generate ChanneldUE replicators, protobuf schemas and channel data", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to repgen.toml configuration file
    #[arg(short, long, global = true, default_value = config::DEFAULT_CONFIG_FILE, env = "REPGEN_CONFIG")]
    config: String,

    /// Output as JSON (machine-readable format)
    #[arg(long, global = true)]
    json: bool,

    /// Enable verbose output
    #[arg(long, global = true)]
    verbose: bool,

    /// Generate shell completions
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate replicators for the configured (or given) classes
    Generate {
        /// Classes to generate, by path, C++ name or name (overrides config targets)
        classes: Vec<String>,

        /// Protobuf package of the generated schemas (overrides config)
        #[arg(short, long)]
        package: Option<String>,

        /// Go import path prefix (overrides config)
        #[arg(long)]
        go_import_prefix: Option<String>,

        /// Regenerate even when the last run is up to date
        #[arg(short, long)]
        force: bool,

        /// Keep files already in the output directory
        #[arg(long)]
        keep_existing: bool,

        /// Show what would be generated without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// List generated replicators
    List {
        /// List the classes in the reflection data instead
        #[arg(short, long)]
        available: bool,
    },

    /// Delete the generated files of replicators
    Remove {
        /// Replicator identifiers, as printed by `repgen list`
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Delete everything in the output directory
    Clean,

    /// Show the last generation run and whether it is stale
    Status,

    /// Show how a class would be generated
    Inspect {
        /// Class path, C++ name or name
        class: String,
    },

    /// Configuration management commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Create a starter repgen.toml
    Init {
        /// Game module directory the generated code belongs to
        #[arg(long, default_value = "Source/Game")]
        module_dir: String,
    },

    /// Validate the configuration file
    Validate,
}

fn main() {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "repgen", &mut io::stdout());
        return;
    }

    if let Err(e) = telemetry::init(telemetry::LogConfig {
        verbose: cli.verbose,
        json_logs: cli.json,
    }) {
        eprintln!("{} {}", "Warning:".yellow().bold(), e);
    }

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    match command {
        Commands::Generate {
            classes,
            package,
            go_import_prefix,
            force,
            keep_existing,
            dry_run,
        } => commands::generate::generate(
            &cli.config,
            commands::generate::GenerateOptions {
                classes,
                package,
                go_import_prefix,
                force,
                keep_existing,
                dry_run,
                json: cli.json,
            },
        ),
        Commands::List { available } => commands::list::list(&cli.config, available, cli.json),
        Commands::Remove { ids } => commands::remove::remove(&cli.config, &ids, cli.json),
        Commands::Clean => commands::clean::clean(&cli.config, cli.json),
        Commands::Status => commands::status::status(&cli.config, cli.json),
        Commands::Inspect { class } => commands::inspect::inspect(&cli.config, &class, cli.json),
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::Init { module_dir } => commands::config::init(&cli.config, &module_dir),
            ConfigCommands::Validate => commands::config::validate(&cli.config),
        },
    }
}
