use std::fs;

use super::confirm;
use crate::core::{git, store::PasswordStore};
use crate::utils::error::{Error, Result};

/// Remove an entry, or a whole directory with `--recursive`.
pub(crate) fn run(store: &PasswordStore, name: &str, recursive: bool, force: bool) -> Result<()> {
    let wants_dir = name.ends_with('/');
    let file = store.entry_file(name)?;
    let dir = store.dir_path(name.trim_end_matches('/'))?;

    if !wants_dir && file.is_file() {
        if !force && !confirm(&format!("Are you sure you would like to delete {}?", name))? {
            return Ok(());
        }
        fs::remove_file(&file)?;
        if let Some(parent) = file.parent() {
            store.prune_empty_dirs(parent)?;
        }
    } else if dir.is_dir() {
        if !recursive {
            return Err(Error::new(&format!(
                "{} is a directory, use --recursive to delete it",
                name
            )));
        }
        if !force
            && !confirm(&format!(
                "Are you sure you would like to delete {} and everything below it?",
                name
            ))?
        {
            return Ok(());
        }
        fs::remove_dir_all(&dir)?;
        if let Some(parent) = dir.parent() {
            store.prune_empty_dirs(parent)?;
        }
    } else {
        return Err(Error::new(&format!(
            "{} is not in the password store.",
            name
        )));
    }

    git::commit_all(store.root(), &format!("Remove {} from store", name))?;
    println!("Removed {}.", name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::path::Path;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
        File::create(path).expect("create file");
    }

    #[test]
    fn test_rm_entry_and_prune() -> Result<()> {
        let temp = TempDir::new()?;
        let store = PasswordStore::at(temp.path());
        touch(&temp.path().join("dir/sub/entry.gpg"));

        run(&store, "dir/sub/entry", false, true)?;

        assert!(!temp.path().join("dir").exists());
        Ok(())
    }

    #[test]
    fn test_rm_directory_requires_recursive() {
        let temp = TempDir::new().expect("tempdir");
        let store = PasswordStore::at(temp.path());
        touch(&temp.path().join("dir/entry.gpg"));

        let err = run(&store, "dir", false, true).unwrap_err();
        assert!(err.to_string().contains("--recursive"));
        assert!(temp.path().join("dir/entry.gpg").exists());
    }

    #[test]
    fn test_rm_directory_recursive() -> Result<()> {
        let temp = TempDir::new()?;
        let store = PasswordStore::at(temp.path());
        touch(&temp.path().join("dir/one.gpg"));
        touch(&temp.path().join("dir/two.gpg"));
        touch(&temp.path().join("keep.gpg"));

        run(&store, "dir", true, true)?;

        assert!(!temp.path().join("dir").exists());
        assert!(temp.path().join("keep.gpg").exists());
        Ok(())
    }

    #[test]
    fn test_rm_unknown_name_errors() {
        let temp = TempDir::new().expect("tempdir");
        let store = PasswordStore::at(temp.path());

        let err = run(&store, "missing", false, true).unwrap_err();
        assert!(err.to_string().contains("not in the password store"));
    }
}
