use std::collections::BTreeSet;

use crate::core::{git, gpg, store::PasswordStore};
use crate::utils::error::{Error, Result};

/// Initialize the store (or a subdirectory) for a set of GPG ids.
///
/// When the subtree already holds entries and the id set changed, every
/// entry below it is re-encrypted to the new recipients.
pub(crate) fn run(store: &PasswordStore, gpg_ids: &[String], path: Option<&str>) -> Result<()> {
    let target = store.dir_path(path.unwrap_or(""))?;

    for id in gpg_ids {
        if !gpg::key_exists(id)? {
            return Err(Error::new(&format!(
                "no public key found for {}, import it into the keyring first",
                id
            )));
        }
    }

    let previous: Option<BTreeSet<String>> = if target.is_dir() {
        store
            .recipients_for(&target)
            .ok()
            .map(|ids| ids.into_iter().collect())
    } else {
        None
    };

    store.write_gpg_id(&target, gpg_ids)?;

    let current: BTreeSet<String> = gpg_ids.iter().cloned().collect();
    let mut reencrypted = 0;
    if let Some(previous) = previous {
        if previous != current {
            reencrypted = store.reencrypt_below(&target)?;
        }
    }

    let scope = match path {
        Some(path) => format!("{} in the password store", path),
        None => String::from("the password store"),
    };
    git::commit_all(
        store.root(),
        &format!("Set GPG ids for {} to {}", scope, gpg_ids.join(", ")),
    )?;

    println!("Password store initialized for {}.", gpg_ids.join(", "));
    if reencrypted > 0 {
        println!("Re-encrypted {} existing entries.", reencrypted);
    }
    Ok(())
}
