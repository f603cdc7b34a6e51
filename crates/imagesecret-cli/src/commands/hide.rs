use std::path::PathBuf;

use clap::Args;
use imagesecret_core::Payload;

use crate::CliResult;

/// Hides a message or a file in a JPEG or PNG image
#[derive(Args, Debug)]
pub struct HideArgs {
    /// Carrier image, JPEG or PNG, used readonly.
    #[arg(short = 'i', long = "in", value_name = "image file", required = true)]
    pub media: PathBuf,

    /// Final image will be stored as file
    #[arg(
        short = 'o',
        long = "out",
        value_name = "output image file",
        required = true
    )]
    pub write_to_file: PathBuf,

    /// File to hide in the image
    #[arg(
        short = 'd',
        long = "data",
        value_name = "data file",
        required_unless_present = "message",
        conflicts_with = "message"
    )]
    pub data_file: Option<PathBuf>,

    /// A text message that will be hidden
    #[arg(
        short,
        long,
        value_name = "text message",
        required_unless_present = "data_file"
    )]
    pub message: Option<String>,
}

impl HideArgs {
    pub fn run(self) -> CliResult<()> {
        let payload = match self.data_file {
            Some(file) => Payload::from_file(&file)?,
            None => Payload::Text(self.message.unwrap_or_default()),
        };

        imagesecret_core::commands::hide(&self.media, &self.write_to_file, &payload)
    }
}
