use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{git, store::PasswordStore};
use crate::utils::error::{Error, Result};

/// Whether a transfer moves or copies the source.
#[derive(Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Move,
    Copy,
}

/// Rename an entry or directory inside the store.
pub(crate) fn run(store: &PasswordStore, old: &str, new: &str, force: bool) -> Result<()> {
    transfer(store, old, new, force, Mode::Move)?;
    git::commit_all(store.root(), &format!("Rename {} to {}", old, new))?;
    println!("Renamed {} to {}.", old, new);
    Ok(())
}

/// Moves or copies `old` to `new`, re-encrypting when the destination's
/// recipient set differs from the source's.
pub(crate) fn transfer(
    store: &PasswordStore, old: &str, new: &str, force: bool, mode: Mode,
) -> Result<()> {
    let wants_dir = old.ends_with('/');
    let src_file = store.entry_file(old)?;
    let src_dir = store.dir_path(old.trim_end_matches('/'))?;

    let (src, dest, src_is_dir) = if !wants_dir && src_file.is_file() {
        let dest_dir = store.dir_path(new.trim_end_matches('/'))?;
        let dest = if new.ends_with('/') || dest_dir.is_dir() {
            let file_name = src_file
                .file_name()
                .ok_or_else(|| Error::new(&format!("invalid entry name: {}", old)))?;
            dest_dir.join(file_name)
        } else {
            store.entry_file(new)?
        };
        (src_file, dest, false)
    } else if src_dir.is_dir() {
        let dest_dir = store.dir_path(new.trim_end_matches('/'))?;
        let dest = if dest_dir.is_dir() {
            let dir_name = src_dir
                .file_name()
                .ok_or_else(|| Error::new(&format!("invalid directory name: {}", old)))?;
            dest_dir.join(dir_name)
        } else {
            dest_dir
        };
        (src_dir, dest, true)
    } else {
        return Err(Error::new(&format!("{} is not in the password store.", old)));
    };

    if dest.exists() && !force {
        return Err(Error::new(&format!(
            "{} already exists in the store, use --force to overwrite it",
            dest.display()
        )));
    }
    if src_is_dir && dest.starts_with(&src) {
        return Err(Error::new(&format!(
            "cannot move {} into itself",
            old
        )));
    }

    let src_recipients = recipient_set(store, &src);

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent)?;
    }
    match mode {
        Mode::Move => {
            if dest.exists() {
                if dest.is_dir() {
                    fs::remove_dir_all(&dest)?;
                } else {
                    fs::remove_file(&dest)?;
                }
            }
            fs::rename(&src, &dest)?;
        }
        Mode::Copy => {
            if src_is_dir {
                copy_recursive(&src, &dest)?;
            } else {
                fs::copy(&src, &dest)?;
            }
        }
    }

    // Entries that changed recipient scope get re-encrypted in place
    let dest_recipients = recipient_set(store, &dest);
    if let (Some(from), Some(to)) = (src_recipients, dest_recipients) {
        if from != to {
            store.reencrypt_below(&dest)?;
        }
    }

    if mode == Mode::Move {
        if let Some(parent) = src.parent() {
            store.prune_empty_dirs(parent)?;
        }
    }

    Ok(())
}

fn recipient_set(store: &PasswordStore, path: &Path) -> Option<BTreeSet<String>> {
    store
        .recipients_for(path)
        .ok()
        .map(|ids| ids.into_iter().collect())
}

fn copy_recursive(src: &Path, dest: &Path) -> Result<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target: PathBuf = dest.join(entry.file_name());
        if entry.path().is_dir() {
            copy_recursive(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().expect("parent")).expect("create dirs");
        File::create(path).expect("create file");
    }

    #[test]
    fn test_move_entry() -> Result<()> {
        let temp = TempDir::new()?;
        let store = PasswordStore::at(temp.path());
        touch(&temp.path().join("old.gpg"));

        transfer(&store, "old", "new", false, Mode::Move)?;

        assert!(!temp.path().join("old.gpg").exists());
        assert!(temp.path().join("new.gpg").is_file());
        Ok(())
    }

    #[test]
    fn test_move_entry_into_existing_directory() -> Result<()> {
        let temp = TempDir::new()?;
        let store = PasswordStore::at(temp.path());
        touch(&temp.path().join("mail.gpg"));
        fs::create_dir_all(temp.path().join("work"))?;

        transfer(&store, "mail", "work", false, Mode::Move)?;

        assert!(temp.path().join("work/mail.gpg").is_file());
        Ok(())
    }

    #[test]
    fn test_move_refuses_overwrite_without_force() {
        let temp = TempDir::new().expect("tempdir");
        let store = PasswordStore::at(temp.path());
        touch(&temp.path().join("a.gpg"));
        touch(&temp.path().join("b.gpg"));

        let err = transfer(&store, "a", "b", false, Mode::Move).unwrap_err();
        assert!(err.to_string().contains("--force"));
        assert!(temp.path().join("a.gpg").exists());
    }

    #[test]
    fn test_move_directory_and_prune() -> Result<()> {
        let temp = TempDir::new()?;
        let store = PasswordStore::at(temp.path());
        touch(&temp.path().join("nested/dir/one.gpg"));

        transfer(&store, "nested/dir", "moved", false, Mode::Move)?;

        assert!(temp.path().join("moved/one.gpg").is_file());
        assert!(!temp.path().join("nested").exists());
        Ok(())
    }

    #[test]
    fn test_copy_keeps_source() -> Result<()> {
        let temp = TempDir::new()?;
        let store = PasswordStore::at(temp.path());
        touch(&temp.path().join("keep.gpg"));

        transfer(&store, "keep", "copied", false, Mode::Copy)?;

        assert!(temp.path().join("keep.gpg").is_file());
        assert!(temp.path().join("copied.gpg").is_file());
        Ok(())
    }

    #[test]
    fn test_copy_directory_recursive() -> Result<()> {
        let temp = TempDir::new()?;
        let store = PasswordStore::at(temp.path());
        touch(&temp.path().join("dir/a.gpg"));
        touch(&temp.path().join("dir/sub/b.gpg"));

        transfer(&store, "dir", "backup", false, Mode::Copy)?;

        assert!(temp.path().join("backup/a.gpg").is_file());
        assert!(temp.path().join("backup/sub/b.gpg").is_file());
        assert!(temp.path().join("dir/a.gpg").is_file());
        Ok(())
    }

    #[test]
    fn test_move_unknown_source_errors() {
        let temp = TempDir::new().expect("tempdir");
        let store = PasswordStore::at(temp.path());

        let err = transfer(&store, "ghost", "new", false, Mode::Move).unwrap_err();
        assert!(err.to_string().contains("not in the password store"));
    }

    #[test]
    fn test_move_directory_into_itself_rejected() {
        let temp = TempDir::new().expect("tempdir");
        let store = PasswordStore::at(temp.path());
        touch(&temp.path().join("dir/one.gpg"));

        let err = transfer(&store, "dir", "dir/sub", false, Mode::Move).unwrap_err();
        assert!(err.to_string().contains("into itself"));
    }
}
