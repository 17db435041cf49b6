//! Display utilities for CLI output formatting.

use terminal_size::{Width, terminal_size};

/// Width available for the entry-name column of tabular output, derived
/// from the terminal width with room left for the other columns.
pub(crate) fn name_column_width() -> usize {
    match terminal_size() {
        Some((Width(w), _)) => (w as usize).saturating_sub(35).clamp(20, 60),
        None => 45,
    }
}

/// Truncates an entry name to `max_len` characters, keeping the last path
/// segment visible and marking the omitted middle with "...".
pub(crate) fn truncate_name(name: &str, max_len: usize) -> String {
    if name.chars().count() <= max_len {
        return name.to_string();
    }

    if let Some(last_slash) = name.rfind('/') {
        let leaf = &name[last_slash..]; // includes the slash
        let leaf_len = leaf.chars().count();

        if leaf_len + 3 >= max_len {
            // The leaf alone fills the column
            let keep = max_len.saturating_sub(3);
            let tail: String = name
                .chars()
                .rev()
                .take(keep)
                .collect::<Vec<_>>()
                .into_iter()
                .rev()
                .collect();
            return format!("...{}", tail);
        }

        let prefix_len = max_len - leaf_len - 3;
        let prefix: String = name.chars().take(prefix_len).collect();
        return format!("{}...{}", prefix, leaf);
    }

    let keep = max_len.saturating_sub(3);
    let head: String = name.chars().take(keep).collect();
    format!("{}...", head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_name_short_names_untouched() {
        assert_eq!(truncate_name("github", 20), "github");
        assert_eq!(truncate_name("sites/github", 20), "sites/github");
        assert_eq!(truncate_name("", 10), "");
    }

    #[test]
    fn test_truncate_name_keeps_leaf() {
        assert_eq!(
            truncate_name("work/clients/acme/portal", 20),
            "work/clien.../portal"
        );
        assert_eq!(truncate_name("a/b/c/d/e/mail", 12), "a/b/.../mail");
    }

    #[test]
    fn test_truncate_name_long_leaf() {
        let truncated = truncate_name("dir/very-long-entry-name-here", 12);
        assert!(truncated.starts_with("..."));
        assert!(truncated.chars().count() <= 12);
    }

    #[test]
    fn test_truncate_name_no_slash() {
        assert_eq!(truncate_name("averylongentryname", 10), "averylo...");
    }
}
