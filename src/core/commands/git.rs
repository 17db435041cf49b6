use crate::core::git;
use crate::core::store::PasswordStore;
use crate::utils::error::Result;

/// Pass arguments through to the system git, run inside the store.
pub(crate) fn run(store: &PasswordStore, args: &[String]) -> Result<()> {
    git::passthrough(store.root(), args)
}
