//! CLI command implementations

use anyhow::Result;
use clap::Subcommand;
use sentbench_core::Normalization;
use sentbench_eval::{builtin_specs, ProviderSpec, ReportFormat};

pub mod generate_config;
pub mod run;
pub mod score;
pub mod split;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Benchmark providers against a labeled corpus
    Run(run::RunArgs),

    /// Show how each provider segments a text
    Split(split::SplitArgs),

    /// Score one segmentation against another
    Score(score::ScoreArgs),

    /// Check corpus and configuration files
    Validate(validate::ValidateArgs),

    /// Write a configuration template
    GenerateConfig(generate_config::GenerateConfigArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },
}

/// List subcommands
#[derive(Debug, Subcommand)]
pub enum ListCommands {
    /// List built-in providers
    Providers {
        /// Also check whether each provider can start
        #[arg(long)]
        check: bool,
    },

    /// List report formats and normalizations
    Formats,
}

impl Commands {
    /// Run the selected command
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Run(args) => args.execute(),
            Commands::Split(args) => args.execute(),
            Commands::Score(args) => args.execute(),
            Commands::Validate(args) => args.execute(),
            Commands::GenerateConfig(args) => args.execute(),
            Commands::List { subcommand } => subcommand.execute(),
        }
    }
}

impl ListCommands {
    /// Print the requested listing
    pub fn execute(&self) -> Result<()> {
        match self {
            ListCommands::Providers { check } => {
                println!("Built-in providers:");
                for spec in builtin_specs() {
                    let label = provider_label(&spec);
                    if *check {
                        let provider = spec.build()?;
                        let status = if provider.is_available() {
                            "available"
                        } else {
                            "unavailable"
                        };
                        println!("  {:<22} {label} [{status}]", spec.id());
                    } else {
                        println!("  {:<22} {label}", spec.id());
                    }
                }
                println!();
                println!("Define more under [[providers]] in a configuration file.");
            }
            ListCommands::Formats => {
                println!("Report formats:");
                for format in ReportFormat::ALL {
                    println!("  {format}");
                }
                println!();
                println!("Normalizations:");
                for normalization in Normalization::ALL {
                    let marker = if normalization == Normalization::default() {
                        " (default)"
                    } else {
                        ""
                    };
                    println!("  {normalization}{marker}");
                }
            }
        }
        Ok(())
    }
}

fn provider_label(spec: &ProviderSpec) -> String {
    match spec {
        ProviderSpec::Punctuation { name, .. }
        | ProviderSpec::Unicode { name, .. }
        | ProviderSpec::Command { name, .. } => {
            format!("{} ({})", name.as_deref().unwrap_or(spec.id()), spec.kind())
        }
        ProviderSpec::Python { name, backend, .. } => {
            format!("{} (python: {backend})", name.as_deref().unwrap_or(spec.id()))
        }
    }
}

/// Initialize logging based on verbosity level
///
/// `RUST_LOG` takes precedence over the verbosity flags. Quiet mode keeps
/// only errors.
pub fn init_logging(verbose: u8, quiet: bool) {
    let log_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };

    // Ignore an already installed logger
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .try_init();
}
