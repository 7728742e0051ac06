//! CLI command definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for noa
#[derive(Parser, Debug)]
#[command(name = "noa")]
#[command(author, version, about = "Network of assistants - a moderated group chat over a shared channel")]
#[command(long_about = r#"
noa runs a group conversation between a human and a team of LLM assistants.
Every participant joins the same space on a hub. After each chat message the
moderator decides who speaks next and grants them the floor.

Start the pieces in separate terminals:
  noa hub
  noa moderator --agents-dir ./agents
  noa assistant --assistant-id pdf-assistant --description "Answers questions about PDFs"
  noa user-proxy

Configuration files are loaded from (in priority order):
1. NOA_* environment variables (e.g. NOA_TRANSPORT__ENDPOINT)
2. --config <path>     Explicit config file
3. ./noa.toml          Project-level config
4. ~/.config/noa/config.toml   Global config
"#)]
pub struct Cli {
    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Write diagnostics to this file instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Participant roles
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the hub every participant connects to
    Hub {
        /// Address to listen on
        #[arg(long, value_name = "ADDR")]
        listen: Option<String>,
    },

    /// Run the moderator deciding who speaks next
    Moderator {
        /// Hub address
        #[arg(long, value_name = "ADDR")]
        endpoint: Option<String>,

        /// Directory of assistant spec files (*.json)
        #[arg(long, value_name = "DIR")]
        agents_dir: Option<PathBuf>,

        /// Model for the decision engine
        #[arg(short, long, value_name = "MODEL")]
        model: Option<String>,
    },

    /// Run an assistant that answers when granted the floor
    Assistant {
        /// Participant name (normalized, e.g. "PDF Assistant" -> pdf-assistant)
        #[arg(long, value_name = "ID")]
        assistant_id: Option<String>,

        /// What this assistant does
        #[arg(long, value_name = "TEXT")]
        description: Option<String>,

        /// Hub address
        #[arg(long, value_name = "ADDR")]
        endpoint: Option<String>,

        /// Model used for replies
        #[arg(short, long, value_name = "MODEL")]
        model: Option<String>,
    },

    /// Join the conversation as the human user
    UserProxy {
        /// Hub address
        #[arg(long, value_name = "ADDR")]
        endpoint: Option<String>,
    },
}
