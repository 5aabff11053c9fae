use clap::Parser;
use millsurf::cli::{self, Cli};
use millsurf::init_logging;
use tracing::debug;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.log_level(), cli.log_json)?;
    debug!("millsurf {} ({})", millsurf::VERSION, millsurf::BUILD_DATE);

    cli::run(&cli)?;
    Ok(())
}
