// src/bin/cli.rs
use clap::Parser;
use fic_scrape::{cli, log};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = cli::Cli::parse();
    log::init(args.verbose);
    cli::run(args)?;
    Ok(())
}
