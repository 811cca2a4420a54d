//! `clientid opt-out` command.

use crate::adapters::live::storage::FileKeyValueStore;
use crate::cid::opt_out;
use crate::config::CidConfig;

/// Execute the `opt-out` command.
///
/// # Errors
///
/// Returns an error string if the flag cannot be written.
pub fn run(config: &CidConfig) -> Result<(), String> {
    let store = FileKeyValueStore::new(&config.store_dir);
    opt_out(&store).map_err(|e| format!("Failed to record opt-out: {e}"))?;
    println!("Opted out of client identifiers.");
    Ok(())
}
