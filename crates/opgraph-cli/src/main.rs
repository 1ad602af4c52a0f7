//! gpt - command-line help for graph processing operators.
//!
//! Prints the general usage with the operator catalog, the usage and graph
//! template of a single operator, or the usage declared by a graph file.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

mod commands;

use commands::{config as config_cmd, usage, usage::OperatorOutput};
use opgraph_usage::Config;

/// gpt - Graph Processing Tool help.
///
/// Run `gpt` to list operators, `gpt operator <name>` for operator usage.
#[derive(Parser, Debug)]
#[command(
    name = "gpt",
    author,
    version,
    about = "Graph Processing Tool: operator and graph usage",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Operator catalog (JSON) to use instead of the bundled one
    #[arg(long, global = true, value_name = "FILE")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the general usage and list all public operators (default command).
    Operators,

    /// Show the usage of one operator.
    Operator {
        /// Operator name or alias.
        name: String,

        /// Print only the graph template.
        #[arg(long)]
        xml: bool,

        /// Print the operator descriptor as JSON.
        #[arg(long, conflicts_with = "xml")]
        json: bool,
    },

    /// Show the usage declared by a graph file.
    Graph {
        /// Path to the graph file.
        path: PathBuf,

        /// Graph variable substituted for `${KEY}` (can be specified multiple times).
        #[arg(short = 'D', value_name = "KEY=VALUE", value_parser = parse_key_value)]
        define: Vec<(String, String)>,
    },

    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration.
    Show,

    /// Set a configuration value.
    Set {
        /// Configuration key.
        key: String,
        /// Configuration value.
        value: String,
    },

    /// Get a configuration value.
    Get {
        /// Configuration key.
        key: String,
    },

    /// Reset configuration to defaults.
    Reset,

    /// Show path to config file.
    Path,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    let level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // GPT_* overrides may come from a .env file
    let _ = dotenvy::dotenv();
    let mut config = Config::load()?;
    if let Some(catalog) = cli.catalog {
        config.catalog_path = Some(catalog);
    }

    let command = cli.command.unwrap_or(Commands::Operators);

    match command {
        Commands::Operators => {
            usage::operators(&config)?;
        }

        Commands::Operator { name, xml, json } => {
            let output = if xml {
                OperatorOutput::Xml
            } else if json {
                OperatorOutput::Json
            } else {
                OperatorOutput::Usage
            };
            return usage::operator(&config, &name, output);
        }

        Commands::Graph { path, define } => {
            usage::graph(&config, &path, define)?;
        }

        Commands::Config(config_cmd_inner) => match config_cmd_inner {
            ConfigCommands::Show => {
                config_cmd::show(&config)?;
            }
            ConfigCommands::Set { key, value } => {
                config_cmd::set(&mut config, &key, &value)?;
            }
            ConfigCommands::Get { key } => {
                config_cmd::get(&config, &key)?;
            }
            ConfigCommands::Reset => {
                config_cmd::reset()?;
            }
            ConfigCommands::Path => {
                if let Some(path) = Config::config_file_path() {
                    println!("{}", path.display());
                } else {
                    println!("(no config file path available)");
                }
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}

/// Parse a `KEY=VALUE` graph variable.
fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}
