//! CLI entry point for the binomial bias calculator

use binomialbias::io::cli::{BiasRunner, Cli};
use clap::Parser;
use tracing_subscriber::EnvFilter;

// RUST_LOG takes precedence over --quiet and --verbose
fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_level().as_str()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> binomialbias::Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);
    let mut runner = BiasRunner::new(cli);
    runner.process()
}
