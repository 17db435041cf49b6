use std::io::{self, Read};

use crate::core::{clipboard, gpg, store::PasswordStore};
use crate::utils::app_config::AppConfig;
use crate::utils::error::{Error, Result};

/// Copy an entry's first line to the clipboard.
///
/// With a name, the entry is decrypted and a detached helper child is
/// spawned to own the clipboard. Without a name this IS the helper child:
/// the secret arrives on stdin, and this process holds the clipboard for
/// `clip_time` seconds before clearing it.
pub(crate) fn run(store: &PasswordStore, name: Option<&str>) -> Result<()> {
    let clip_time: u64 = AppConfig::get("clip_time")?;

    match name {
        Some(name) => {
            let file = store.entry_file(name)?;
            if !file.is_file() {
                return Err(Error::new(&format!(
                    "{} is not in the password store.",
                    name
                )));
            }
            let plaintext = gpg::decrypt(&file)?;
            clipboard::spawn_clip_child(clipboard::first_line(&plaintext)?)?;
            println!(
                "Copied {} to clipboard. Will clear in {} seconds.",
                name, clip_time
            );
            Ok(())
        }
        None => {
            let mut secret = String::new();
            io::stdin().read_to_string(&mut secret)?;
            clipboard::hold_and_clear(clipboard::first_line(&secret)?, clip_time)
        }
    }
}
