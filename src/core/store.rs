//! # Password Store Model
//!
//! The password store is a directory tree in which every leaf is a
//! GPG-encrypted file named `<entry>.gpg`. Entry names mirror relative paths
//! inside the store, so `sites/github` lives at `<root>/sites/github.gpg`.
//! A `.gpg-id` file at the root or in any subdirectory names the GPG
//! recipients used to encrypt entries below it; the nearest ancestor wins.

use std::fs;
use std::path::{Component, Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use super::gpg;
use super::types::StoreEntry;
use crate::utils::app_config::AppConfig;
use crate::utils::error::{Error, Result};

/// Name of the file that pins GPG recipients for a subtree.
pub const GPG_ID_FILE: &str = ".gpg-id";

/// Handle to a password store rooted at a directory.
#[derive(Debug, Clone)]
pub struct PasswordStore {
    root: PathBuf,
}

impl PasswordStore {
    /// Opens the store at the configured `store_dir`.
    pub fn open() -> Result<Self> {
        let dir: String = AppConfig::get("store_dir")?;
        Ok(Self::at(expand_tilde(&dir)))
    }

    /// Opens a store at an explicit root.
    pub fn at<P: Into<PathBuf>>(root: P) -> Self {
        PasswordStore { root: root.into() }
    }

    /// The store's root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Maps an entry name to its encrypted file path.
    ///
    /// Rejects names that would escape the store root.
    pub fn entry_file(&self, name: &str) -> Result<PathBuf> {
        let rel = sanitize(name)?;
        let mut file = self.root.join(rel);
        let file_name = file
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::new(&format!("invalid entry name: {}", name)))?
            .to_string();
        file.set_file_name(format!("{}.gpg", file_name));
        Ok(file)
    }

    /// Maps a name to a directory path inside the store. An empty name maps
    /// to the root itself.
    pub fn dir_path(&self, name: &str) -> Result<PathBuf> {
        if name.is_empty() {
            return Ok(self.root.clone());
        }
        Ok(self.root.join(sanitize(name)?))
    }

    /// Resolves the GPG recipients in effect for a path inside the store.
    ///
    /// Walks up from the path's directory towards the root and returns the
    /// ids listed in the first `.gpg-id` found. Empty lines and `#` comments
    /// are skipped.
    pub fn recipients_for(&self, path: &Path) -> Result<Vec<String>> {
        let mut dir = if path.is_dir() {
            path.to_path_buf()
        } else {
            path.parent()
                .ok_or_else(|| Error::new(&format!("invalid store path: {}", path.display())))?
                .to_path_buf()
        };

        loop {
            let candidate = dir.join(GPG_ID_FILE);
            if candidate.is_file() {
                let ids = read_gpg_id(&candidate)?;
                if ids.is_empty() {
                    return Err(Error::new(&format!(
                        "no GPG ids listed in {}",
                        candidate.display()
                    )));
                }
                return Ok(ids);
            }
            if dir == self.root || !dir.starts_with(&self.root) {
                break;
            }
            match dir.parent() {
                Some(parent) => dir = parent.to_path_buf(),
                None => break,
            }
        }

        Err(Error::new(
            "password store is not initialized, run `pk init <gpg-id>` first",
        ))
    }

    /// Writes a `.gpg-id` file listing the given ids, creating the directory
    /// if needed.
    pub fn write_gpg_id(&self, dir: &Path, ids: &[String]) -> Result<()> {
        fs::create_dir_all(dir)?;
        let mut contents = ids.join("\n");
        contents.push('\n');
        fs::write(dir.join(GPG_ID_FILE), contents)?;
        log::debug!("wrote {} ids to {}", ids.len(), dir.display());
        Ok(())
    }

    /// Lists every entry below the given subtree, sorted by name. Hidden
    /// files and directories are skipped.
    pub fn entries(&self, subdir: Option<&str>) -> Result<Vec<StoreEntry>> {
        let base = self.dir_path(subdir.unwrap_or(""))?;
        if !base.is_dir() {
            return Ok(Vec::new());
        }

        let mut entries: Vec<StoreEntry> = WalkDir::new(&base)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
            .filter_map(|entry| entry.ok())
            .filter(|e| e.path().is_file())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("gpg"))
            .filter_map(|e| self.entry_for_path(e.path()))
            .collect();

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Builds a [`StoreEntry`] for an encrypted file path inside the store.
    pub fn entry_for_path(&self, path: &Path) -> Option<StoreEntry> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let name = rel
            .with_extension("")
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => part.to_str(),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/");
        Some(StoreEntry {
            name,
            path: path.to_path_buf(),
        })
    }

    /// Re-encrypts every entry below a directory to the recipients currently
    /// in effect for its location. Returns the number of entries rewritten.
    pub fn reencrypt_below(&self, dir: &Path) -> Result<usize> {
        let mut count = 0;
        let files: Vec<PathBuf> = WalkDir::new(dir)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
            .filter_map(|entry| entry.ok())
            .filter(|e| e.path().is_file())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("gpg"))
            .map(|e| e.into_path())
            .collect();

        for file in files {
            let recipients = self.recipients_for(&file)?;
            let plaintext = gpg::decrypt(&file)?;
            gpg::encrypt(&file, &plaintext, &recipients)?;
            count += 1;
        }

        log::info!("re-encrypted {} entries below {}", count, dir.display());
        Ok(count)
    }

    /// Removes now-empty directories between `dir` and the store root.
    pub fn prune_empty_dirs(&self, dir: &Path) -> Result<()> {
        let mut current = dir.to_path_buf();
        while current != self.root && current.starts_with(&self.root) {
            let is_empty = match fs::read_dir(&current) {
                Ok(mut iter) => iter.next().is_none(),
                Err(_) => false,
            };
            if !is_empty {
                break;
            }
            fs::remove_dir(&current)?;
            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }
        Ok(())
    }
}

/// Hidden-file check for store walks.
pub fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

/// Validates an entry or directory name and converts it to a relative path.
///
/// Absolute names and any path component other than a plain name (`..`, `.`,
/// prefixes) are rejected so lookups can never escape the store root.
fn sanitize(name: &str) -> Result<PathBuf> {
    let trimmed = name.trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(Error::new("entry name is empty"));
    }

    let path = Path::new(trimmed);
    if path.is_absolute() {
        return Err(Error::new(&format!(
            "entry name must be relative to the store: {}",
            name
        )));
    }
    for component in path.components() {
        match component {
            Component::Normal(_) => {}
            _ => {
                return Err(Error::new(&format!(
                    "entry name may not leave the store: {}",
                    name
                )));
            }
        }
    }

    Ok(path.to_path_buf())
}

/// Parses a `.gpg-id` file into a list of key ids.
fn read_gpg_id(path: &Path) -> Result<Vec<String>> {
    let contents = fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Expands a leading `~/` to the user's home directory.
pub fn expand_tilde(dir: &str) -> PathBuf {
    if let Some(rest) = dir.strip_prefix("~/") {
        let home = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE"));
        if let Ok(home) = home {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(dir)
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
    fn test_entry_file_mapping() -> Result<()> {
        let store = PasswordStore::at("/store");
        assert_eq!(
            store.entry_file("sites/github")?,
            PathBuf::from("/store/sites/github.gpg")
        );
        assert_eq!(store.entry_file("top")?, PathBuf::from("/store/top.gpg"));
        Ok(())
    }

    #[test]
    fn test_entry_file_trims_trailing_slash() -> Result<()> {
        let store = PasswordStore::at("/store");
        assert_eq!(store.entry_file("dir/")?, PathBuf::from("/store/dir.gpg"));
        Ok(())
    }

    #[test]
    fn test_sneaky_names_rejected() {
        let store = PasswordStore::at("/store");
        assert!(store.entry_file("../outside").is_err());
        assert!(store.entry_file("a/../../outside").is_err());
        assert!(store.entry_file("/etc/passwd").is_err());
        assert!(store.entry_file("").is_err());
    }

    #[test]
    fn test_entries_sorted_and_hidden_skipped() -> Result<()> {
        let temp = TempDir::new()?;
        let store = PasswordStore::at(temp.path());

        touch(&temp.path().join("zeta.gpg"));
        touch(&temp.path().join("alpha.gpg"));
        touch(&temp.path().join("dir/nested.gpg"));
        touch(&temp.path().join(".hidden/secret.gpg"));
        touch(&temp.path().join("notes.txt"));

        let entries = store.entries(None)?;
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "dir/nested", "zeta"]);

        Ok(())
    }

    #[test]
    fn test_entries_subdir() -> Result<()> {
        let temp = TempDir::new()?;
        let store = PasswordStore::at(temp.path());

        touch(&temp.path().join("top.gpg"));
        touch(&temp.path().join("dir/one.gpg"));
        touch(&temp.path().join("dir/two.gpg"));

        let entries = store.entries(Some("dir"))?;
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["dir/one", "dir/two"]);

        Ok(())
    }

    #[test]
    fn test_recipients_nearest_ancestor_wins() -> Result<()> {
        let temp = TempDir::new()?;
        let store = PasswordStore::at(temp.path());

        store.write_gpg_id(temp.path(), &[String::from("root@example.com")])?;
        store.write_gpg_id(
            &temp.path().join("work"),
            &[String::from("work@example.com"), String::from("0xDEADBEEF")],
        )?;

        let work_entry = temp.path().join("work/mail.gpg");
        touch(&work_entry);
        assert_eq!(
            store.recipients_for(&work_entry)?,
            vec!["work@example.com", "0xDEADBEEF"]
        );

        let top_entry = temp.path().join("top.gpg");
        touch(&top_entry);
        assert_eq!(store.recipients_for(&top_entry)?, vec!["root@example.com"]);

        Ok(())
    }

    #[test]
    fn test_recipients_skip_comments_and_blanks() -> Result<()> {
        let temp = TempDir::new()?;
        let store = PasswordStore::at(temp.path());

        fs::write(
            temp.path().join(GPG_ID_FILE),
            "# team keys\n\nalice@example.com\n  bob@example.com  \n",
        )?;

        let entry = temp.path().join("x.gpg");
        touch(&entry);
        assert_eq!(
            store.recipients_for(&entry)?,
            vec!["alice@example.com", "bob@example.com"]
        );

        Ok(())
    }

    #[test]
    fn test_recipients_uninitialized_store() -> Result<()> {
        let temp = TempDir::new()?;
        let store = PasswordStore::at(temp.path());

        let entry = temp.path().join("x.gpg");
        touch(&entry);
        let err = store.recipients_for(&entry).unwrap_err();
        assert!(err.to_string().contains("not initialized"));

        Ok(())
    }

    #[test]
    fn test_prune_empty_dirs() -> Result<()> {
        let temp = TempDir::new()?;
        let store = PasswordStore::at(temp.path());

        let deep = temp.path().join("a/b/c");
        fs::create_dir_all(&deep)?;
        touch(&temp.path().join("a/keep.gpg"));

        store.prune_empty_dirs(&deep)?;
        assert!(!temp.path().join("a/b").exists());
        assert!(temp.path().join("a").exists());

        Ok(())
    }

    #[test]
    fn test_expand_tilde() {
        if let Ok(home) = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE")) {
            assert_eq!(
                expand_tilde("~/.passkeep"),
                PathBuf::from(home).join(".passkeep")
            );
        }
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
    }
}
