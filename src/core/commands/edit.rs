use std::env;
use std::fs;
use std::io::Write;
use std::process::Command;

use crate::core::{git, gpg, store::PasswordStore};
use crate::utils::app_config::AppConfig;
use crate::utils::error::{Error, Result};

/// Edit an entry with the configured editor, re-encrypting on change.
///
/// The decrypted contents go to a private temporary file outside the store;
/// the file is removed when the command finishes, whether or not the edit
/// was kept.
pub(crate) fn run(store: &PasswordStore, name: &str) -> Result<()> {
    let file = store.entry_file(name)?;
    let recipients = store.recipients_for(&file)?;

    let existing = if file.is_file() {
        Some(gpg::decrypt(&file)?)
    } else {
        None
    };

    let mut scratch = tempfile::Builder::new()
        .prefix(".pk-edit-")
        .suffix(".txt")
        .tempfile()?;
    if let Some(ref contents) = existing {
        scratch.write_all(contents.as_bytes())?;
        scratch.flush()?;
    }

    let editor = editor_command()?;
    let status = Command::new(&editor).arg(scratch.path()).status()?;
    if !status.success() {
        return Err(Error::new(&format!("{} exited with {}", editor, status)));
    }

    // Editors that replace the file leave new contents at the same path
    let edited = fs::read_to_string(scratch.path())?;

    if edited.is_empty() {
        return Err(Error::new("refusing to store an empty entry"));
    }
    if existing.as_deref() == Some(edited.as_str()) {
        println!("Password unchanged.");
        return Ok(());
    }

    gpg::encrypt(&file, &edited, &recipients)?;
    git::commit_all(
        store.root(),
        &format!("Edit password for {} using {}", name, editor),
    )?;

    println!("Stored {}.", name);
    Ok(())
}

/// `$EDITOR` wins over the configured fallback.
fn editor_command() -> Result<String> {
    match env::var("EDITOR") {
        Ok(editor) if !editor.is_empty() => Ok(editor),
        _ => AppConfig::get("editor"),
    }
}
