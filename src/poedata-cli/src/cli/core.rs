//! Core CLI definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "poedata")]
#[command(about = "Path of Exile trade data generator", long_about = None)]
pub struct Cli {
    /// Working directory holding descriptions, tables and API snapshots
    #[arg(long, default_value = ".", global = true)]
    pub root: PathBuf,

    /// Configuration file (defaults to poedata.toml in the root)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug detail (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Generate items and stats for every configured locale (default)
    #[command(visible_alias = "g")]
    Generate {
        /// Only generate this locale code (e.g. "en")
        #[arg(short, long)]
        locale: Option<String>,
    },

    /// Print the normalized matcher form of stat texts
    #[command(visible_alias = "n")]
    Normalize {
        /// Stat texts, e.g. "Adds {0} to {1} [Fire|Fire] Damage"
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Show or initialize configuration
    #[command(visible_alias = "c")]
    Config {
        /// Show the effective configuration
        #[arg(long)]
        show: bool,

        /// Write the default configuration to poedata.toml in the root
        #[arg(long)]
        init: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_command_parses() {
        let cli = Cli::try_parse_from(["poedata"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.root, PathBuf::from("."));
        assert!(!cli.verbose);
    }

    #[test]
    fn test_generate_with_locale() {
        let cli = Cli::try_parse_from(["poedata", "--root", "data", "generate", "-l", "en", "-v"])
            .unwrap();
        assert_eq!(cli.root, PathBuf::from("data"));
        assert!(cli.verbose);
        assert_eq!(
            cli.command,
            Some(Commands::Generate {
                locale: Some("en".to_string())
            })
        );
    }

    #[test]
    fn test_normalize_requires_text() {
        assert!(Cli::try_parse_from(["poedata", "normalize"]).is_err());

        let cli = Cli::try_parse_from(["poedata", "n", "{0}% increased Armour"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Normalize {
                text: vec!["{0}% increased Armour".to_string()]
            })
        );
    }
}
