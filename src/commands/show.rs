//! `clientid show` command.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::adapters::live::cookies::FileCookieJar;
use crate::adapters::live::storage::FileKeyValueStore;
use crate::cid::{is_opted_out, record};
use crate::config::CidConfig;

/// Execute the `show` command.
///
/// # Errors
///
/// Returns an error string if the store or cookie jar cannot be read.
pub fn run(config: &CidConfig) -> Result<(), String> {
    let store = FileKeyValueStore::new(&config.store_dir);
    let jar = FileCookieJar::new(&config.store_dir);
    print!("{}", render(&store, &jar, Utc::now())?);
    Ok(())
}

/// Formats the stored state as plain text.
///
/// # Errors
///
/// Returns an error string if the store or cookie jar cannot be read.
pub fn render(
    store: &FileKeyValueStore,
    jar: &FileCookieJar,
    now: DateTime<Utc>,
) -> Result<String, String> {
    let mut out = String::new();

    let stored =
        record::read_record(store).map_err(|e| format!("Failed to read base id: {e}"))?;
    match stored {
        Some(record) => {
            let age = record.age(now);
            let state = if record.is_expired(now) { " (expired)" } else { "" };
            let _ = writeln!(
                out,
                "Base id: {} (age {}d {}h){state}",
                record.value,
                age.num_days(),
                age.num_hours() % 24
            );
        }
        None => out.push_str("Base id: none\n"),
    }

    let opted_out = if is_opted_out(store) { "yes" } else { "no" };
    let _ = writeln!(out, "Opted out: {opted_out}");

    let cookies = jar.entries_at(now).map_err(|e| format!("Failed to read cookies: {e}"))?;
    if cookies.is_empty() {
        out.push_str("Cookies: none\n");
    } else {
        out.push_str("Cookies:\n");
        for (name, cookie) in &cookies {
            let _ = writeln!(
                out,
                "  {name} = {} (expires {})",
                cookie.value,
                cookie.expires_at.format("%Y-%m-%d")
            );
        }
    }
    Ok(out)
}
