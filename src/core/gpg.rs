//! # GPG Plumbing
//!
//! All encryption and decryption shells out to the configured gpg binary,
//! the same way the `pass` family of tools does. Plaintext is passed through
//! stdin and never written to disk by this module.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use crate::utils::app_config::AppConfig;
use crate::utils::error::{Error, Result};

/// Builds a gpg invocation with the flags shared by every call.
fn gpg_command() -> Command {
    let binary: String = AppConfig::get("gpg_binary").unwrap_or_else(|_| String::from("gpg"));
    let mut cmd = Command::new(binary);
    cmd.arg("--quiet").arg("--yes").arg("--batch");
    cmd
}

/// Decrypts an encrypted entry file and returns its plaintext.
pub fn decrypt(path: &Path) -> Result<String> {
    log::debug!("decrypting {}", path.display());

    let output = gpg_command().arg("--decrypt").arg(path).output()?;
    if !output.status.success() {
        return Err(Error::new(&format!(
            "gpg failed to decrypt {}: {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(String::from_utf8(output.stdout)?)
}

/// Encrypts plaintext to the given recipients, writing the result to `path`.
///
/// The parent directory is created if missing. An existing file at `path`
/// is overwritten.
pub fn encrypt(path: &Path, plaintext: &str, recipients: &[String]) -> Result<()> {
    if recipients.is_empty() {
        return Err(Error::new("no GPG recipients configured for this path"));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    log::debug!(
        "encrypting {} for {} recipients",
        path.display(),
        recipients.len()
    );

    let mut cmd = gpg_command();
    cmd.arg("--encrypt").arg("--compress-algo=none");
    for recipient in recipients {
        cmd.arg("--recipient").arg(recipient);
    }
    cmd.arg("--output").arg(path);

    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()?;

    child
        .stdin
        .as_mut()
        .ok_or_else(|| Error::new("failed to open gpg stdin"))?
        .write_all(plaintext.as_bytes())?;

    let output = child.wait_with_output()?;
    if !output.status.success() {
        return Err(Error::new(&format!(
            "gpg failed to encrypt {}: {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(())
}

/// Checks whether a public key matching the id is present in the keyring.
pub fn key_exists(id: &str) -> Result<bool> {
    let output = gpg_command()
        .arg("--list-keys")
        .arg(id)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .output()?;
    Ok(output.status.success())
}
