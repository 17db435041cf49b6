use std::io::Write;

use rayon::prelude::*;

use crate::core::{gpg, store::PasswordStore};
use crate::utils::error::Result;

/// Search the decrypted contents of every entry for a query string.
///
/// Entries are decrypted in parallel; the output stays in entry-name order.
/// Entries that fail to decrypt are skipped with a warning.
pub(crate) fn run(store: &PasswordStore, buffer: &mut dyn Write, query: &str) -> Result<()> {
    let needle = query.to_lowercase();
    let entries = store.entries(None)?;

    let hits: Vec<(String, Vec<String>)> = entries
        .par_iter()
        .filter_map(|entry| match gpg::decrypt(&entry.path) {
            Ok(plaintext) => {
                let lines: Vec<String> = plaintext
                    .lines()
                    .filter(|line| line.to_lowercase().contains(&needle))
                    .map(str::to_string)
                    .collect();
                if lines.is_empty() {
                    None
                } else {
                    Some((entry.name.clone(), lines))
                }
            }
            Err(e) => {
                log::warn!("skipping {}: {}", entry.name, e);
                None
            }
        })
        .collect();

    for (name, lines) in &hits {
        writeln!(buffer, "{}:", name)?;
        for line in lines {
            writeln!(buffer, "    {}", line)?;
        }
    }

    if hits.is_empty() {
        writeln!(buffer, "No matches for {}.", query)?;
    }

    Ok(())
}
