use std::path::PathBuf;

use clap::Parser;

use crate::Commands;

/// Main CLI application arguments and command structure
#[derive(Parser, Debug)]
#[clap(
    name = "newsdesk",
    version,
    about = "Crypto news article manager with markdown preview and AI drafts"
)]
pub struct Cli {
    /// Path to the configuration file
    #[clap(short = 'c', long, value_parser)]
    pub config: Option<PathBuf>,

    /// Directory holding the article collection (overrides the config)
    #[clap(long, value_parser)]
    pub data_dir: Option<PathBuf>,

    /// Verbose output mode
    #[clap(short, long)]
    pub verbose: bool,

    /// Subcommands for the newsdesk application
    #[clap(subcommand)]
    pub command: Commands,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create_with_generate() {
        let cli = Cli::try_parse_from([
            "newsdesk",
            "--data-dir",
            "/tmp/news",
            "create",
            "-T",
            "ETH hits $5k",
            "-a",
            "Desk",
            "--generate",
        ])
        .unwrap();

        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/news")));
        match cli.command {
            Commands::Create {
                title,
                author,
                source,
                ..
            } => {
                assert_eq!(title, "ETH hits $5k");
                assert_eq!(author.as_deref(), Some("Desk"));
                assert!(source.generate);
                assert!(source.content.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_content_and_file_conflict() {
        let result = Cli::try_parse_from([
            "newsdesk", "edit", "42", "-c", "body", "-f", "body.md",
        ]);
        assert!(result.is_err());
    }
}
