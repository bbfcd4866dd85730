mod commands;
mod prompt;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "taxsort",
    about = "Sort custodian tax documents into client folders and build cc: cover sheets",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Match input PDFs to clients and copy them, redacted, into year folders
    Convert(commands::ConvertOpts),
    /// Generate one cc: cover PDF per household from the CC details CSV
    Covers(commands::CoversOpts),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Convert(opts) => commands::run_convert(opts),
        Commands::Covers(opts) => commands::run_covers(opts),
    }
}
