//! contract-impact — contract dependency graph and change impact gate.

mod commands;
mod config;
mod manifest;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::resolve_format;
use config::ContractsConfig;

#[derive(Parser)]
#[command(name = "contract-impact", version, about = "Contract dependency and impact analysis")]
struct Cli {
    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the dependency graph and report cycles and missing dependencies
    Graph {
        /// Spec manifest produced by the extractor
        #[arg(long)]
        input: PathBuf,
        /// Write the graph in DOT format to this file
        #[arg(long)]
        dot: Option<PathBuf>,
        /// Output format (human, json)
        #[arg(long)]
        format: Option<String>,
        /// Fail when any spec references a missing dependency
        #[arg(long)]
        fail_on_missing: bool,
    },
    /// Write a hashed snapshot of every declared spec
    Snapshot {
        /// Spec manifest produced by the extractor
        #[arg(long)]
        input: PathBuf,
        /// Snapshot file to write
        #[arg(long)]
        output: PathBuf,
    },
    /// Compare two snapshots and classify the impact
    Impact {
        /// Baseline snapshot
        #[arg(long)]
        baseline: PathBuf,
        /// Head snapshot
        #[arg(long)]
        head: PathBuf,
        /// Output format (human, json)
        #[arg(long)]
        format: Option<String>,
        /// Fail on breaking changes even if contracts.toml allows them
        #[arg(long)]
        fail_on_breaking: bool,
        /// Fail on non-breaking changes too
        #[arg(long)]
        fail_on_non_breaking: bool,
        /// Spec manifest used to list dependents of breaking specs
        #[arg(long)]
        manifest: Option<PathBuf>,
    },
    /// Check capability requirements against declared capabilities
    Requirements {
        /// Spec manifest produced by the extractor
        #[arg(long)]
        input: PathBuf,
        /// Output format (human, json)
        #[arg(long)]
        format: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let cwd = std::env::current_dir()?;
    let config = ContractsConfig::load_or_default(&cwd)?;
    if let Some(project) = &config.project {
        tracing::debug!(project = %project.name, "loaded project config");
    }

    match cli.command {
        Commands::Graph {
            input,
            dot,
            format,
            fail_on_missing,
        } => {
            let mut policy = config.graph;
            policy.fail_on_missing |= fail_on_missing;
            commands::graph::run(
                &input,
                dot.as_deref(),
                resolve_format(format.as_deref())?,
                policy,
            )
        }

        Commands::Snapshot { input, output } => commands::snapshot::run(&input, &output),

        Commands::Impact {
            baseline,
            head,
            format,
            fail_on_breaking,
            fail_on_non_breaking,
            manifest,
        } => {
            let mut policy = config.impact;
            policy.fail_on_breaking |= fail_on_breaking;
            policy.fail_on_non_breaking |= fail_on_non_breaking;
            commands::impact::run(
                &baseline,
                &head,
                resolve_format(format.as_deref())?,
                policy,
                manifest.as_deref(),
            )
        }

        Commands::Requirements { input, format } => {
            commands::requirements::run(&input, resolve_format(format.as_deref())?)
        }
    }
}
