//! CLI command definitions and parsing
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "faqsense",
    version,
    about = "Semantic FAQ search backed by text embeddings",
    long_about = "faqsense stores FAQ questions together with their embeddings and answers \
                  \"which stored questions are most similar to this one?\" from the command \
                  line or over HTTP."
)]
pub struct Cli {
    /// Global config file path (defaults to ~/.config/faqsense/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Profile to apply on top of the config (e.g., "offline")
    #[arg(short, long, global = true)]
    pub profile: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP search server
    Serve {
        /// Address to bind (overrides server.bind)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Create the document store if it does not exist yet
    Setup,

    /// Index the built-in travel FAQ, or questions from a file
    Seed {
        /// File with one question per line ('#' starts a comment)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Embed and store one or more texts
    Index {
        /// Texts to index
        #[arg(required = true)]
        texts: Vec<String>,
    },

    /// Find the stored questions most similar to a question
    Search {
        /// Question text
        question: String,

        /// Maximum number of results to return (at most 5)
        #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=5))]
        limit: Option<u8>,

        /// Show results in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Nearest neighbors of a raw vector, e.g. "[0.1,0.2,0.3]"
    Neighbors {
        /// Vector literal
        vector: String,

        /// Maximum number of results to return
        #[arg(short, long, default_value = "5")]
        limit: usize,
    },

    /// Show store statistics
    Stats,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Validate configuration file
    Validate {
        /// Path to config file (defaults to standard location)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from([
            "faqsense",
            "--profile",
            "offline",
            "search",
            "Are flights refundable?",
            "--limit",
            "3",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.profile.as_deref(), Some("offline"));
        match cli.command {
            Commands::Search {
                question,
                limit,
                json,
            } => {
                assert_eq!(question, "Are flights refundable?");
                assert_eq!(limit, Some(3));
                assert!(json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_search_limit_capped() {
        assert!(Cli::try_parse_from(["faqsense", "search", "q", "--limit", "7"]).is_err());
        assert!(Cli::try_parse_from(["faqsense", "search", "q", "--limit", "0"]).is_err());
    }

    #[test]
    fn test_index_requires_text() {
        assert!(Cli::try_parse_from(["faqsense", "index"]).is_err());
    }
}
