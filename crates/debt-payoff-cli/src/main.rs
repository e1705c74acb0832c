mod commands;
mod config;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::plan::{CompareArgs, PlanArgs};
use commands::target::TargetArgs;

/// Debt payoff planning with decimal precision
#[derive(Parser)]
#[command(
    name = "payoff",
    version,
    about = "Debt payoff planning: snowball, avalanche, custom order and target timelines",
    long_about = "Simulates month-by-month debt payoff with decimal precision. \
                  Reads a JSON request from --input or stdin, runs a single strategy \
                  or a snowball/avalanche/minimum-only comparison, and can solve for \
                  the extra payment needed to be debt-free by a target month."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// TOML file with month cap, recommendation thresholds and solver bounds;
    /// keys set in the request's own `config` block take precedence
    #[arg(long, global = true)]
    config: Option<String>,

    /// Log simulation details to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one payoff strategy (or a comparison) for a set of debts
    Plan(PlanArgs),
    /// Compare snowball, avalanche and minimum-only payoff
    Compare(CompareArgs),
    /// Find the extra monthly payment needed to hit a payoff timeline
    Target(TargetArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
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

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = match config::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Plan(args) => commands::plan::run_plan(args, settings.as_ref()),
        Commands::Compare(args) => commands::plan::run_compare(args, settings.as_ref()),
        Commands::Target(args) => commands::target::run_target(args, settings.as_ref()),
        Commands::Version => {
            println!("payoff {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
