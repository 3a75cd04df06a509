//! CLI command definitions for the `webchat-ai` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod memory;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use webchat_types::memory::{Actor, DEFAULT_MEMORY_LIMIT};

/// Memory-aware AI core for the WebChat support widget.
#[derive(Parser)]
#[command(name = "webchat-ai", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Log filter derived from `--quiet` / `-v`; `RUST_LOG` still wins.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "info,sqlx=warn",
            1 => "info,webchat_core=debug,webchat_infra=debug,webchat_api=debug",
            _ => "trace",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server.
    Serve {
        /// Port to listen on (overrides PORT).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides HOST).
        #[arg(long)]
        host: Option<String>,
    },

    /// Inspect or append durable user memory.
    #[command(alias = "memories")]
    Memory {
        #[command(subcommand)]
        action: MemoryAction,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum MemoryAction {
    /// List a user's most recent memory records, newest first.
    #[command(alias = "ls")]
    List {
        /// User identifier.
        #[arg(long)]
        user: String,

        /// Maximum records to show.
        #[arg(long, default_value_t = DEFAULT_MEMORY_LIMIT)]
        limit: i64,
    },

    /// Append one record to a user's memory.
    Add {
        /// User identifier.
        #[arg(long)]
        user: String,

        /// Session identifier.
        #[arg(long)]
        session: String,

        /// Who said it: user, agent or bot.
        #[arg(long, value_parser = parse_actor)]
        actor: Actor,

        /// The utterance to remember.
        text: String,
    },

    /// Print the memory block exactly as injected into chat prompts.
    Block {
        /// User identifier.
        #[arg(long)]
        user: String,

        /// Maximum records to include.
        #[arg(long, default_value_t = DEFAULT_MEMORY_LIMIT)]
        limit: i64,
    },
}

fn parse_actor(raw: &str) -> Result<Actor, String> {
    raw.parse()
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_memory_add() {
        let cli = Cli::try_parse_from([
            "webchat-ai", "memory", "add", "--user", "u1", "--session", "s1", "--actor", "Agent",
            "Sent the invoice",
        ])
        .unwrap();

        match cli.command {
            Commands::Memory {
                action: MemoryAction::Add { user, session, actor, text },
            } => {
                assert_eq!(user, "u1");
                assert_eq!(session, "s1");
                assert_eq!(actor, Actor::Agent);
                assert_eq!(text, "Sent the invoice");
            }
            _ => panic!("expected memory add"),
        }
    }

    #[test]
    fn test_rejects_unknown_actor() {
        let result = Cli::try_parse_from([
            "webchat-ai", "memory", "add", "--user", "u1", "--session", "s1", "--actor", "robot",
            "hi",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_memory_list_default_limit() {
        let cli = Cli::try_parse_from(["webchat-ai", "--json", "memory", "list", "--user", "u1"])
            .unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Commands::Memory { action: MemoryAction::List { limit: 50, .. } }
        ));
    }

    #[test]
    fn test_log_filter() {
        let cli = Cli::try_parse_from(["webchat-ai", "-vv", "serve"]).unwrap();
        assert_eq!(cli.log_filter(), "trace");

        let cli = Cli::try_parse_from(["webchat-ai", "--quiet", "serve", "--port", "9000"]).unwrap();
        assert_eq!(cli.log_filter(), "error");
        assert!(matches!(cli.command, Commands::Serve { port: Some(9000), host: None }));
    }

    #[test]
    fn test_serve_flags_are_optional_overrides() {
        let cli = Cli::try_parse_from(["webchat-ai", "serve"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve { port: None, host: None }));

        let cli = Cli::try_parse_from(["webchat-ai", "serve", "-p", "8080", "--host", "127.0.0.1"])
            .unwrap();
        match cli.command {
            Commands::Serve { port, host } => {
                assert_eq!(port, Some(8080));
                assert_eq!(host.as_deref(), Some("127.0.0.1"));
            }
            _ => panic!("expected serve"),
        }
    }
}
