use std::path::PathBuf;

use clap::Args;

use crate::CliResult;

/// Unveils a message or a file from a JPEG or PNG image
#[derive(Args, Debug)]
pub struct UnveilArgs {
    /// Source image that contains secret data
    #[arg(
        short = 'i',
        long = "in",
        value_name = "image source file",
        required = true
    )]
    pub media: PathBuf,

    /// Final data will be stored in that folder
    #[arg(
        short = 'o',
        long = "out",
        value_name = "output folder",
        required = true
    )]
    pub output_folder: PathBuf,
}

impl UnveilArgs {
    pub fn run(self) -> CliResult<()> {
        let written = imagesecret_core::commands::unveil(&self.media, &self.output_folder)?;
        println!("{}", written.display());

        Ok(())
    }
}
