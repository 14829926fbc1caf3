mod cli;
mod config;
mod convert;
mod logging;
mod report;
mod skill_cmd;
mod verify_cmd;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = config::load(cli.config.as_deref())?;
    match cli.command {
        Command::Verify(args) => verify_cmd::run(args, &config),
        Command::Skill(args) => skill_cmd::run(args, &config),
    }
}
