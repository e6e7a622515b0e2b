use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod output;

use cli::{Args, Command};

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Summary { data, json } => {
            if json {
                ridestat::console::init_quiet();
            } else {
                ridestat::console::init();
            }
            commands::summary(&data, json)
        }
        Command::List { config } => commands::list(config.as_deref()),
        Command::Run(run) => {
            ridestat::console::init();
            commands::run(run)
        }
        Command::Completions { shell } => {
            commands::completions(shell);
            Ok(())
        }
    }
}
