use std::io::{self, BufRead, Read, Write};

use super::confirm;
use crate::core::{git, gpg, store::PasswordStore};
use crate::utils::error::{Error, Result};

/// Insert a new entry, prompting for its contents.
pub(crate) fn run(
    store: &PasswordStore, name: &str, multiline: bool, echo: bool, force: bool,
) -> Result<()> {
    let file = store.entry_file(name)?;

    // Fail before prompting when the store has no recipients
    let recipients = store.recipients_for(&file)?;

    if file.exists() && !force {
        let overwrite = confirm(&format!("An entry already exists for {}. Overwrite it?", name))?;
        if !overwrite {
            return Ok(());
        }
    }

    let contents = if multiline {
        println!(
            "Enter contents of {} and press Ctrl+D when finished:",
            name
        );
        let mut contents = String::new();
        io::stdin().lock().read_to_string(&mut contents)?;
        contents
    } else if echo {
        print!("Enter password for {}: ", name);
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        line.trim_end_matches(['\r', '\n']).to_string()
    } else {
        let password = rpassword::prompt_password(format!("Enter password for {}: ", name))?;
        let check = rpassword::prompt_password(format!("Retype password for {}: ", name))?;
        if password != check {
            return Err(Error::new("the entered passwords do not match"));
        }
        password
    };

    if contents.is_empty() {
        return Err(Error::new("refusing to store an empty entry"));
    }

    gpg::encrypt(&file, &ensure_trailing_newline(contents), &recipients)?;
    git::commit_all(store.root(), &format!("Add password for {} to store", name))?;

    println!("Stored {}.", name);
    Ok(())
}

fn ensure_trailing_newline(mut contents: String) -> String {
    if !contents.ends_with('\n') {
        contents.push('\n');
    }
    contents
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_trailing_newline() {
        assert_eq!(ensure_trailing_newline(String::from("pw")), "pw\n");
        assert_eq!(ensure_trailing_newline(String::from("pw\n")), "pw\n");
    }
}
