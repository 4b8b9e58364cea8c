//! Command-line arguments

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "wfsync", version)]
#[command(about = "Mirror upstream game data into the relational store", long_about = None)]
pub struct Cli {
    /// Defaults to syncing every category
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Sync every category, or only the named ones
    Sync {
        /// Category names or upstream labels (warframe, Primary, Pets, ...)
        categories: Vec<String>,
    },

    /// Validate and persist builds from a JSON file
    ImportBuilds {
        /// A JSON array of builds, or an object with a `builds` array
        file: PathBuf,
    },

    /// Print the names a category resolves to
    Names {
        /// Category name or upstream label
        category: String,
    },

    /// Create missing tables and indexes
    Schema,
}

impl Cli {
    pub fn into_command(self) -> Commands {
        self.command.unwrap_or(Commands::Sync {
            categories: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<Commands, clap::Error> {
        let argv = std::iter::once("wfsync").chain(args.iter().copied());
        Cli::try_parse_from(argv).map(Cli::into_command)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse(&[]).unwrap(), Commands::Sync { categories: vec![] });
        assert_eq!(
            parse(&["sync", "mod", "Warframes"]).unwrap(),
            Commands::Sync {
                categories: vec!["mod".into(), "Warframes".into()]
            }
        );
        assert_eq!(
            parse(&["import-builds", "builds.json"]).unwrap(),
            Commands::ImportBuilds {
                file: PathBuf::from("builds.json")
            }
        );
        assert_eq!(
            parse(&["names", "Pets"]).unwrap(),
            Commands::Names {
                category: "Pets".into()
            }
        );
        assert_eq!(parse(&["schema"]).unwrap(), Commands::Schema);
    }

    #[test]
    fn test_parse_usage_errors() {
        assert_eq!(
            parse(&["names"]).unwrap_err().kind(),
            ErrorKind::MissingRequiredArgument
        );
        assert_eq!(
            parse(&["refresh"]).unwrap_err().kind(),
            ErrorKind::InvalidSubcommand
        );
        assert_eq!(
            parse(&["schema", "now"]).unwrap_err().kind(),
            ErrorKind::UnknownArgument
        );
        assert_eq!(parse(&["--help"]).unwrap_err().kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
