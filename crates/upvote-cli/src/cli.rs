use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "upvote")]
#[command(about = "Browse, submit, and vote on feature requests")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to local store file
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Optional path to client config file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Feature API base URL (e.g. <http://localhost:8000/api>)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List feature requests, most recent first
    #[command(alias = "ls")]
    List {
        /// Skip the local cache and fetch from the server
        #[arg(short, long)]
        refresh: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a feature with its vote statistics
    Show {
        /// Feature ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Submit a new feature request
    #[command(alias = "add")]
    New {
        /// Short title (3-200 characters)
        title: String,
        /// Description (10-1000 characters)
        #[arg(required = true)]
        description: Vec<String>,
    },
    /// Change a feature's title or description
    Edit {
        /// Feature ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New description
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a feature and all of its votes
    #[command(alias = "rm")]
    Delete {
        /// Feature ID
        id: String,
    },
    /// Vote for a feature
    Vote {
        /// Feature ID
        id: String,
    },
    /// Withdraw your vote from a feature
    Unvote {
        /// Feature ID
        id: String,
    },
    /// Show vote statistics for a feature
    Stats {
        /// Feature ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List features voted for from this device
    Voted {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show or set this device's label
    Device {
        /// New label; omit to show the current one
        label: Option<String>,
        /// Remove the stored label
        #[arg(long, conflicts_with = "label")]
        clear: bool,
    },
    /// Forget local votes, cached features, and device label
    Reset,
    /// Check whether the feature service is reachable
    Health,
    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output file path (prints to stdout if omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}

impl From<CompletionShell> for clap_complete::Shell {
    fn from(shell: CompletionShell) -> Self {
        match shell {
            CompletionShell::Bash => Self::Bash,
            CompletionShell::Zsh => Self::Zsh,
            CompletionShell::Fish => Self::Fish,
            CompletionShell::PowerShell => Self::PowerShell,
        }
    }
}
