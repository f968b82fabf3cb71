use clap::Parser;
use timeside_router::cli::{run_cli, Cli};
use timeside_router::logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(&cli.log_level)?;
    run_cli(cli)
}
