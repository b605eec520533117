use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod collaborators;
mod commands;

#[derive(Parser)]
#[command(
    name = "vigil",
    about = "Vigil — system-health diagnostic engine",
    version,
    propagate_version = true,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full diagnostic.
    ///
    /// Probes every configured subsystem concurrently, scores the
    /// outcomes, persists a timestamped report, and exits 0 when
    /// overall health is at least 70%, 1 otherwise.
    Check {
        /// Path to vigil.toml (default: ./vigil.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory for report files (overrides config)
        #[arg(long)]
        report_dir: Option<PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Override every probe timeout, in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,vigil_cli=debug,vigil_probe=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            config,
            report_dir,
            format,
            timeout,
        } => {
            let code = commands::check::check(config, report_dir, &format, timeout).await?;
            std::process::exit(code);
        }
    }
}
