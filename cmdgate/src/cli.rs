use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "cmdgate")]
#[command(version)]
#[command(about = "Approval gate helper for shell commands")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands are called by machines, not humans: positional arguments are
/// optional at the parser level so a degenerate invocation degrades to the
/// fail-closed output instead of a usage error.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a command against an allowlist of glob patterns
    ///
    /// Prints "true" when any pattern matches the whole command, otherwise
    /// "false". Malformed or missing input prints "false".
    Matches {
        /// The full command line to check
        command: Option<String>,
        /// JSON array of allowlist entries
        entries: Option<String>,
    },

    /// Resolve an executable reference to a concrete filesystem path
    ///
    /// Prints the resolution as JSON. An empty path-env falls back to the
    /// process's own PATH.
    Resolve {
        /// Raw executable reference (name, relative, absolute, or ~/ path)
        executable: Option<String>,
        /// Working directory for relative references
        cwd: Option<String>,
        /// PATH-style list of directories to search
        path_env: Option<String>,
    },

    /// Print the first whitespace- or quote-delimited token of a command
    #[command(name = "first-token")]
    FirstToken {
        /// The command line to tokenize
        command: Option<String>,
    },
}
