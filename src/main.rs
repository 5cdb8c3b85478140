use anyhow::Result;
use tracing_subscriber::EnvFilter;

use trello2kanban::{cli, config};

fn main() -> Result<()> {
    let config = config::load_config()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.import.log));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = cli::parse_args(&args)?;
    cli::run(command, &config)
}
