use anyhow::Result;
use clap::Parser;

use jsdown_cli::args::CliArgs;
use jsdown_cli::{driver, tracing_config};

fn main() -> Result<()> {
    // Only installs a subscriber when JSDOWN_LOG or RUST_LOG is set.
    tracing_config::init_tracing();

    let args = CliArgs::parse();
    let output = driver::run(&args)?;
    print!("{output}");
    Ok(())
}
