//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - ask: send one message to the assistant
//! - daemon: serve the assistant over the IPC socket
//! - cards: count a user's cards

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Flashcall - chat with your flashcards
#[derive(Parser, Debug)]
#[command(name = "flashcall")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Send one message to the assistant and print the reply
    Ask {
        /// Caller identity
        #[arg(short, long)]
        user: String,

        /// The message, words joined with spaces
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// Run the IPC daemon in the foreground
    Daemon,

    /// Show how many cards a user owns
    Cards {
        /// Card owner
        #[arg(short, long)]
        user: String,
    },
}

impl Commands {
    /// Message text for `ask`
    pub fn message_text(message: &[String]) -> String {
        message.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_requires_command() {
        assert!(Cli::try_parse_from(["flashcall"]).is_err());
    }

    #[test]
    fn test_cli_verbose_flag() {
        let cli = Cli::try_parse_from(["flashcall", "-v", "daemon"]).unwrap();
        assert!(cli.is_verbose());
    }

    #[test]
    fn test_cli_config_option() {
        let cli = Cli::try_parse_from(["flashcall", "-c", "/path/to/flashcall.yml", "daemon"]).unwrap();
        assert_eq!(cli.config.as_ref(), Some(&PathBuf::from("/path/to/flashcall.yml")));
    }

    #[test]
    fn test_ask_joins_words() {
        let cli = Cli::try_parse_from(["flashcall", "ask", "--user", "u1", "Quiz", "me"]).unwrap();
        match cli.command {
            Commands::Ask { user, message } => {
                assert_eq!(user, "u1");
                assert_eq!(Commands::message_text(&message), "Quiz me");
            }
            _ => panic!("Expected ask command"),
        }
    }

    #[test]
    fn test_ask_requires_message_and_user() {
        assert!(Cli::try_parse_from(["flashcall", "ask", "--user", "u1"]).is_err());
        assert!(Cli::try_parse_from(["flashcall", "ask", "Quiz me"]).is_err());
    }

    #[test]
    fn test_cards_command() {
        let cli = Cli::try_parse_from(["flashcall", "cards", "-u", "u1"]).unwrap();
        match cli.command {
            Commands::Cards { user } => assert_eq!(user, "u1"),
            _ => panic!("Expected cards command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["flashcall", "daemon", "--verbose"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Daemon));
    }

    #[test]
    fn test_cli_debug_assert() {
        Cli::command().debug_assert();
    }
}
