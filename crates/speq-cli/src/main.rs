//! Speq CLI - offline driver for the speq equalizer and spectrum analyzer.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "speq")]
#[command(author, version, about = "Five-band EQ and spectrum analyzer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the combined EQ magnitude response
    Response(commands::response::ResponseArgs),

    /// Run synthetic tones through the engine and print the spectrum
    Analyze(commands::analyze::AnalyzeArgs),

    /// Write or decode the binary EQ state record
    State(commands::state::StateArgs),

    /// List host-automatable parameters with ranges and defaults
    Params(commands::params::ParamsArgs),
}

fn main() -> anyhow::Result<()> {
    // RUST_LOG controls verbosity; logs go to stderr so tables stay clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();
    tracing_log::LogTracer::init().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Response(args) => commands::response::run(args),
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::State(args) => commands::state::run(args),
        Commands::Params(args) => commands::params::run(args),
    }
}
