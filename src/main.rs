use clap::Parser;
use grove::cli::{run_cli, Cli};
use grove::logging::init_logging;
use grove::runtime_config::RuntimeConfig;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging()?;
    RuntimeConfig::from_env().apply();
    run_cli(cli)
}
