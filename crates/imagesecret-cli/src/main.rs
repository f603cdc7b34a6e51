mod cli;
mod commands;

use clap::Parser;

use crate::cli::{CliArgs, Commands};

pub type CliResult<T> = imagesecret_core::Result<T>;

fn main() -> CliResult<()> {
    env_logger::init();

    let args = CliArgs::parse();
    log::debug!("{args:?}");

    match args.command {
        Commands::Hide(args) => args.run(),
        Commands::Unveil(args) => args.run(),
        Commands::Capacity(args) => args.run(),
    }
}
