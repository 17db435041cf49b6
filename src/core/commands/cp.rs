use super::mv::{Mode, transfer};
use crate::core::{git, store::PasswordStore};
use crate::utils::error::Result;

/// Copy an entry or directory inside the store.
pub(crate) fn run(store: &PasswordStore, old: &str, new: &str, force: bool) -> Result<()> {
    transfer(store, old, new, force, Mode::Copy)?;
    git::commit_all(store.root(), &format!("Copy {} to {}", old, new))?;
    println!("Copied {} to {}.", old, new);
    Ok(())
}
