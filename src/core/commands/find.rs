use std::io::Write;

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::core::display::{name_column_width, truncate_name};
use crate::core::store::PasswordStore;
use crate::core::types::OutputFormat;
use crate::utils::error::Result;

#[derive(Tabled)]
struct FindRow {
    #[tabled(rename = "Entry")]
    name: String,
    #[tabled(rename = "Location")]
    location: String,
}

/// List entries whose name contains the query, case-insensitively.
pub(crate) fn run(
    store: &PasswordStore, buffer: &mut dyn Write, query: &str, format: &OutputFormat,
) -> Result<()> {
    let needle = query.to_lowercase();
    let matches: Vec<_> = store
        .entries(None)?
        .into_iter()
        .filter(|entry| entry.name.to_lowercase().contains(&needle))
        .collect();

    match format {
        OutputFormat::Text => {
            if !matches.is_empty() {
                let width = name_column_width();
                let rows: Vec<FindRow> = matches
                    .iter()
                    .map(|entry| FindRow {
                        name: truncate_name(&entry.name, width),
                        location: entry.path.display().to_string(),
                    })
                    .collect();
                let table = Table::new(rows).with(Style::sharp()).to_string();
                writeln!(buffer, "{}", table)?;
            }
            writeln!(buffer, "Total: {} entries", matches.len())?;
        }
        OutputFormat::Json => {
            writeln!(buffer, "{}", serde_json::to_string_pretty(&matches)?)?;
        }
    }

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

    fn run_find(store: &PasswordStore, query: &str, format: OutputFormat) -> String {
        let mut buffer: Vec<u8> = Vec::new();
        run(store, &mut buffer, query, &format).expect("find runs");
        String::from_utf8(buffer).expect("utf8")
    }

    #[test]
    fn test_find_matches_substring_case_insensitive() {
        let temp = TempDir::new().expect("tempdir");
        let store = PasswordStore::at(temp.path());
        touch(&temp.path().join("sites/GitHub.gpg"));
        touch(&temp.path().join("sites/gitlab.gpg"));
        touch(&temp.path().join("mail.gpg"));

        let output = run_find(&store, "git", OutputFormat::Text);
        assert!(output.contains("GitHub"));
        assert!(output.contains("gitlab"));
        assert!(!output.contains("mail"));
        assert!(output.contains("Total: 2 entries"));
    }

    #[test]
    fn test_find_no_matches() {
        let temp = TempDir::new().expect("tempdir");
        let store = PasswordStore::at(temp.path());
        touch(&temp.path().join("mail.gpg"));

        let output = run_find(&store, "bank", OutputFormat::Text);
        assert!(output.contains("Total: 0 entries"));
    }

    #[test]
    fn test_find_json_output() {
        let temp = TempDir::new().expect("tempdir");
        let store = PasswordStore::at(temp.path());
        touch(&temp.path().join("sites/github.gpg"));

        let output = run_find(&store, "github", OutputFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&output).expect("valid json");
        assert_eq!(parsed[0]["name"], "sites/github");
    }
}
