//! CLI argument definitions.

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `clientid`.
#[derive(Debug, Parser)]
#[command(name = "clientid", version, about = "Resolve consent-gated client identifiers")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve the identifier for a scope on a document.
    Resolve {
        /// Scope name, `[A-Za-z0-9_-]+`.
        scope: String,
        /// URL of the document requesting the identifier.
        #[arg(long)]
        url: String,
        /// Create the scope cookie if missing (direct documents only).
        #[arg(long)]
        create: bool,
        /// Cookie to read instead of one named after the scope.
        #[arg(long)]
        cookie_name: Option<String>,
        /// Treat the document as embedded by a delegated host.
        #[arg(long)]
        embedded: bool,
        /// Base id the embedding host hands out (implies `--embedded`).
        #[arg(long)]
        host_cid: Option<String>,
    },
    /// Show the stored base id, opt-out flag and scope cookies.
    Show,
    /// Opt this profile out of client identifiers.
    OptOut,
}
