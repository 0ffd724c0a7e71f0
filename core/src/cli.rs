use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, LoggingConfig};
use crate::context::{Context, SymbolTable};
use crate::parser;
use crate::transform::Identity;
use crate::workflow::Workflow;

#[derive(Parser)]
#[command(name = "pmsl")]
#[command(about = "PMSL - workflow scripting language compiler", long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default search)
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a workflow and report success or the first syntax error
    Check {
        /// PMSL source file
        file: PathBuf,
    },

    /// Print the workflow in normalised PMSL form
    Format {
        /// PMSL source file
        file: PathBuf,
    },

    /// Print generated code for every action script and transition guard
    Generate {
        /// PMSL source file
        file: PathBuf,
    },

    /// Print the parsed workflow as JSON
    Ast {
        /// PMSL source file
        file: PathBuf,
    },
}

/// Run the CLI by parsing process arguments
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    run_cli_with_args(cli)
}

/// Run the CLI with provided arguments
pub fn run_cli_from_args(args: Vec<String>) -> Result<()> {
    let cli = Cli::try_parse_from(args)?;
    run_cli_with_args(cli)
}

fn run_cli_with_args(cli: Cli) -> Result<()> {
    let config = Config::builder()
        .config_path(cli.config.map(PathBuf::from))
        .build()
        .context("Failed to load configuration")?;
    init_tracing(&config.logging);

    match cli.command {
        Commands::Check { file } => {
            let workflow = load_workflow(&file)?;
            println!("✓ {} ({} nodes)", workflow.name, workflow.nodes.len());
        }

        Commands::Format { file } => {
            let workflow = load_workflow(&file)?;
            let mut out = String::new();
            workflow.transform(&mut Identity, &mut out);
            print!("{}", out);
        }

        Commands::Generate { file } => {
            let workflow = load_workflow(&file)?;
            let ctx = SymbolTable::from_config(&config.generate);
            print!("{}", render_generated(&workflow, &ctx));
        }

        Commands::Ast { file } => {
            let workflow = load_workflow(&file)?;
            let json = serde_json::to_string_pretty(&workflow)
                .context("Failed to serialize workflow")?;
            println!("{}", json);
        }
    }

    Ok(())
}

/// Install the stderr tracing subscriber; `RUST_LOG` wins over the configured level
pub fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    // a subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_workflow(path: &Path) -> Result<Workflow> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let workflow = parser::parse(&source)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    info!(workflow = %workflow.name, file = %path.display(), "loaded workflow");
    Ok(workflow)
}

/// One block per node: a line per action script and per transition guard
pub fn render_generated<C: Context + ?Sized>(workflow: &Workflow, ctx: &C) -> String {
    let mut out = String::new();
    for node in &workflow.nodes {
        let _ = writeln!(out, "{} {}", node.kind.keyword(), node.name);
        for action in &node.actions {
            let mut script = String::new();
            action.generate(ctx, &mut script);
            let _ = writeln!(out, "  {}: {}", action.phase.keyword(), script);
        }
        for transition in &node.transitions {
            let mut guard = String::new();
            transition.generate_guard(ctx, &mut guard);
            let _ = writeln!(out, "  -> {}: {}", transition.target, guard);
        }
    }
    out
}
