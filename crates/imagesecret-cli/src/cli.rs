use clap::{Parser, Subcommand};

use crate::commands::*;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    Hide(hide::HideArgs),
    Unveil(unveil::UnveilArgs),
    Capacity(capacity::CapacityArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::path::Path;

    #[test]
    fn cli_definition_is_consistent() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn hide_with_a_message() {
        let args = CliArgs::try_parse_from([
            "imagesecret", "hide", "-i", "in.jpg", "-o", "out.jpg", "-m", "hi",
        ])
        .unwrap();
        match args.command {
            Commands::Hide(hide) => {
                assert_eq!(hide.media, Path::new("in.jpg"));
                assert_eq!(hide.write_to_file, Path::new("out.jpg"));
                assert_eq!(hide.message.as_deref(), Some("hi"));
                assert!(hide.data_file.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn hide_needs_exactly_one_payload() {
        assert!(
            CliArgs::try_parse_from(["imagesecret", "hide", "-i", "a.png", "-o", "b.png"]).is_err()
        );
        assert!(CliArgs::try_parse_from([
            "imagesecret", "hide", "-i", "a.png", "-o", "b.png", "-m", "x", "-d", "file.txt",
        ])
        .is_err());
    }

    #[test]
    fn unveil_and_capacity() {
        let args = CliArgs::try_parse_from(["imagesecret", "unveil", "--in", "s.png", "--out", "dir"])
            .unwrap();
        assert!(
            matches!(args.command, Commands::Unveil(ref u) if u.output_folder == Path::new("dir"))
        );

        let args = CliArgs::try_parse_from(["imagesecret", "capacity", "-i", "s.jpeg"]).unwrap();
        assert!(
            matches!(args.command, Commands::Capacity(ref c) if c.media == Path::new("s.jpeg"))
        );
    }
}
