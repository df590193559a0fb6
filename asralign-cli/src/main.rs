//! asralign CLI - spoken/written corpus alignment tool

use asralign_cli::cli::{Cli, log_filter, run_cli};
use clap::Parser;
use eyre::Result;

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let (non_blocking, _guard) = tracing_appender::non_blocking(std::io::stderr());

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(log_filter(cli.debug))
        .init();

    run_cli(cli)
}
