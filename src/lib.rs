//! Consent-gated, per-scope client identifiers.
//!
//! A document resolves identifiers through a [`CidService`] built over a
//! [`context::ServiceContext`]. Proxy-served documents derive per-scope ids
//! from a shared base id; documents on their own origin use a per-scope
//! cookie. Nothing is written durably until persistence consent settles.

pub mod adapters;
pub mod cid;
pub mod cli;
pub mod commands;
pub mod config;
pub mod consent;
pub mod context;
pub mod error;
pub mod origin;
pub mod ports;

pub use cid::{CidService, ScopeArg, ScopeRequest};
pub use consent::{Consent, ConsentGrant};
pub use error::CidError;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli.command)
}

#[cfg(test)]
mod tests {
    use super::run;

    #[test]
    fn run_errors_on_unknown_subcommand() {
        let result = run(["clientid", "unknown"]);
        assert!(result.is_err());
    }

    #[test]
    fn run_rejects_invalid_scope() {
        let result = run(["clientid", "resolve", "bad scope", "--url", "https://example.com/"]);
        assert!(result.unwrap_err().contains("invalid scope"));
    }
}
