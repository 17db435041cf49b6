//! # Store Tree Rendering
//!
//! Renders a subtree of the password store as a tree, the way `ls` and
//! `show` display directories. Encrypted entries lose their `.gpg` suffix,
//! hidden files and directories are skipped and children are sorted by name
//! with directories first.

use std::fs;
use std::io;
use std::path::Path;

use ptree::item::StringItem;
use ptree::output;

use crate::utils::error::Result;

/// Writes the tree rooted at `dir` to the buffer, labelled with `label`.
pub fn write_tree(buffer: &mut dyn io::Write, label: &str, dir: &Path) -> Result<()> {
    let root = StringItem {
        text: label.to_string(),
        children: build_children(dir)?,
    };
    output::write_tree(&root, buffer)?;
    Ok(())
}

/// Collects the sorted child items of a directory.
fn build_children(dir: &Path) -> Result<Vec<StringItem>> {
    let mut dirs: Vec<StringItem> = Vec::new();
    let mut leaves: Vec<StringItem> = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }

        let path = entry.path();
        if path.is_dir() {
            dirs.push(StringItem {
                text: name,
                children: build_children(&path)?,
            });
        } else if let Some(stem) = name.strip_suffix(".gpg") {
            leaves.push(StringItem {
                text: stem.to_string(),
                children: Vec::new(),
            });
        }
    }

    dirs.sort_by(|a, b| a.text.cmp(&b.text));
    leaves.sort_by(|a, b| a.text.cmp(&b.text));
    dirs.extend(leaves);
    Ok(dirs)
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

    fn render(dir: &Path) -> String {
        let mut buffer: Vec<u8> = Vec::new();
        write_tree(&mut buffer, "Password Store", dir).expect("tree renders");
        String::from_utf8(buffer).expect("utf8 output")
    }

    #[test]
    fn test_tree_lists_entries_without_suffix() {
        let temp = TempDir::new().expect("tempdir");
        touch(&temp.path().join("github.gpg"));
        touch(&temp.path().join("mail/personal.gpg"));

        let rendered = render(temp.path());
        assert!(rendered.contains("Password Store"));
        assert!(rendered.contains("github"));
        assert!(rendered.contains("mail"));
        assert!(rendered.contains("personal"));
        assert!(!rendered.contains(".gpg"));
    }

    #[test]
    fn test_tree_skips_hidden_and_foreign_files() {
        let temp = TempDir::new().expect("tempdir");
        touch(&temp.path().join("visible.gpg"));
        touch(&temp.path().join(".gpg-id"));
        touch(&temp.path().join(".git/config"));
        touch(&temp.path().join("README.md"));

        let rendered = render(temp.path());
        assert!(rendered.contains("visible"));
        assert!(!rendered.contains("gpg-id"));
        assert!(!rendered.contains("config"));
        assert!(!rendered.contains("README"));
    }

    #[test]
    fn test_tree_sorts_directories_first() {
        let temp = TempDir::new().expect("tempdir");
        touch(&temp.path().join("aaa.gpg"));
        touch(&temp.path().join("zdir/inner.gpg"));

        let rendered = render(temp.path());
        let dir_pos = rendered.find("zdir").expect("zdir listed");
        let leaf_pos = rendered.find("aaa").expect("aaa listed");
        assert!(dir_pos < leaf_pos);
    }
}
