//! # Clipboard Handling
//!
//! Copying a secret spawns a detached `pk clip` child process that owns the
//! clipboard, sleeps for the configured `clip_time` and then clears it. The
//! child has to outlive the parent because on X11 the clipboard contents
//! disappear with the process that set them.

use std::env;
use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

use arboard::Clipboard;

use crate::utils::error::{Error, Result};

/// Extracts the line of an entry that goes to the clipboard.
pub fn first_line(plaintext: &str) -> Result<&str> {
    plaintext
        .lines()
        .next()
        .filter(|line| !line.is_empty())
        .ok_or_else(|| Error::new("entry is empty, nothing to copy"))
}

/// Spawns the clip helper child and feeds it the secret on stdin.
pub fn spawn_clip_child(secret: &str) -> Result<()> {
    let exe = env::current_exe()?;
    let mut child = Command::new(exe)
        .arg("clip")
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    child
        .stdin
        .as_mut()
        .ok_or_else(|| Error::new("failed to reach the clip helper's stdin"))?
        .write_all(secret.as_bytes())?;

    // The child is intentionally not waited on; it keeps serving the
    // clipboard after this process exits.
    Ok(())
}

/// Child mode: owns the clipboard for `clip_time` seconds, then clears it.
pub fn hold_and_clear(secret: &str, clip_time: u64) -> Result<()> {
    let mut clipboard = Clipboard::new()
        .map_err(|e| Error::with_source("clipboard unavailable", Box::new(e)))?;

    clipboard
        .set_text(secret.to_string())
        .map_err(|e| Error::with_source("failed to set clipboard contents", Box::new(e)))?;
    log::debug!("clipboard set, clearing in {} seconds", clip_time);

    thread::sleep(Duration::from_secs(clip_time));

    clipboard
        .clear()
        .map_err(|e| Error::with_source("failed to clear clipboard", Box::new(e)))?;

    Ok(())
}
