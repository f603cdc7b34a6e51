use std::path::PathBuf;

use clap::Args;

use crate::CliResult;

/// Prints how many payload bytes an image can hold
#[derive(Args, Debug)]
pub struct CapacityArgs {
    /// JPEG or PNG image
    #[arg(
        short = 'i',
        long = "in",
        value_name = "image file",
        required = true
    )]
    pub media: PathBuf,
}

impl CapacityArgs {
    pub fn run(self) -> CliResult<()> {
        println!("{}", imagesecret_core::commands::capacity(&self.media)?);

        Ok(())
    }
}
