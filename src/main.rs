mod aggregate;
mod cli;
mod error;
mod extract;
mod fmt;
mod loader;
mod locate;
mod models;
mod normalize;
mod runlog;
mod settings;
mod summary;
mod week;

use clap::Parser;
use tracing_subscriber::{fmt as tracing_fmt, EnvFilter};

use cli::{Cli, Commands};

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Payroll { data_dir, dump } => cli::payroll::run(data_dir, dump),
        Commands::Jobs { data_dir, dump } => cli::jobs::run(data_dir, dump),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
