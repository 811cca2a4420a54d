//! Command dispatch and handlers.

pub mod opt_out;
pub mod resolve;
pub mod show;

use crate::cli::Command;
use crate::config::CidConfig;

/// Dispatch a parsed command to its handler.
///
/// Configuration is read from the environment (`CID_CONFIG`, `CID_STORE`)
/// once per invocation.
///
/// # Errors
///
/// Returns an error string if configuration loading or the selected command fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let config = CidConfig::from_env()?;
    dispatch_with_config(command, &config)
}

/// Dispatch a command with an explicit configuration.
///
/// # Errors
///
/// Returns an error string if the selected command fails.
pub fn dispatch_with_config(command: &Command, config: &CidConfig) -> Result<(), String> {
    match command {
        Command::Resolve { scope, url, create, cookie_name, embedded, host_cid } => {
            let host = resolve::HostMode::from_flags(*embedded, host_cid.as_deref());
            let id = resolve::run(config, scope, url, *create, cookie_name.as_deref(), host)?;
            match id {
                Some(id) => println!("{id}"),
                None => eprintln!("no identifier"),
            }
            Ok(())
        }
        Command::Show => show::run(config),
        Command::OptOut => opt_out::run(config),
    }
}
