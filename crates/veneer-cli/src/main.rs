//! Veneer CLI
//!
//! Generates capability descriptors and forwarding proxies for the targets
//! listed in `veneer.toml`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use veneer_cli::commands::{check, generate};
use veneer_cli::config::CONFIG_FILE;
use veneer_cli::output::resolve_color_choice;
use veneer_cli::{CommandOptions, OutputFormat};

#[derive(Parser)]
#[command(name = "veneer")]
#[command(about = "Proxy and capability descriptor generator", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(short, long, global = true, default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Colorize output: auto, always, never
    #[arg(long, global = true)]
    color: Option<String>,

    /// Log filter when RUST_LOG is unset (e.g. "debug", "veneer_codegen=trace")
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate descriptors, proxies and the registry
    Generate {
        /// Output directory (overrides `out-dir` in the configuration)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,
        /// Diagnostic format
        #[arg(long, value_enum, default_value = "pretty")]
        format: OutputFormat,
    },

    /// Resolve every target and report problems without writing files
    Check {
        /// Diagnostic format
        #[arg(long, value_enum, default_value = "pretty")]
        format: OutputFormat,
    },
}

fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let color = resolve_color_choice(cli.color.as_deref());
    let summary = match cli.command {
        Commands::Generate { out_dir, format } => {
            let options = CommandOptions {
                config: cli.config,
                format,
                color,
            };
            generate::execute(&options, out_dir)?
        }
        Commands::Check { format } => {
            let options = CommandOptions {
                config: cli.config,
                format,
                color,
            };
            check::execute(&options)?
        }
    };

    if !summary.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
