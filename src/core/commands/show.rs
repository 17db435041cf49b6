use std::io::Write;

use crate::core::{clipboard, gpg, store::PasswordStore, tree};
use crate::utils::app_config::AppConfig;
use crate::utils::error::{Error, Result};

/// Decrypt and print an entry, or render a directory as a tree.
///
/// A name that matches both an entry and a directory resolves to the entry
/// unless it carries a trailing slash. With `--clip` the first line of the
/// entry goes to the clipboard instead of the buffer.
/// List a directory as a tree without consulting entries, for `ls`.
pub(crate) fn ls(store: &PasswordStore, buffer: &mut dyn Write, subdir: Option<&str>) -> Result<()> {
    match subdir {
        Some(subdir) => {
            let name = format!("{}/", subdir.trim_end_matches('/'));
            run(store, buffer, Some(name.as_str()), false)
        }
        None => run(store, buffer, None, false),
    }
}

pub(crate) fn run(
    store: &PasswordStore, buffer: &mut dyn Write, name: Option<&str>, clip: bool,
) -> Result<()> {
    let wants_dir = name.map(|n| n.ends_with('/')).unwrap_or(false);

    if let Some(name) = name {
        let file = store.entry_file(name)?;
        if !wants_dir && file.is_file() {
            let plaintext = gpg::decrypt(&file)?;

            if clip {
                let clip_time: u64 = AppConfig::get("clip_time")?;
                clipboard::spawn_clip_child(clipboard::first_line(&plaintext)?)?;
                writeln!(
                    buffer,
                    "Copied {} to clipboard. Will clear in {} seconds.",
                    name, clip_time
                )?;
            } else {
                write!(buffer, "{}", plaintext)?;
            }
            return Ok(());
        }

        let dir = store.dir_path(name.trim_end_matches('/'))?;
        if dir.is_dir() {
            return tree::write_tree(buffer, name.trim_end_matches('/'), &dir);
        }

        return Err(Error::new(&format!(
            "{} is not in the password store.",
            name
        )));
    }

    if store.root().is_dir() {
        return tree::write_tree(buffer, "Password Store", store.root());
    }

    Err(Error::new("password store is empty, run `pk init <gpg-id>` first"))
}
