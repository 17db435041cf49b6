use crate::core::{clipboard, git, gpg, pwgen, store::PasswordStore};
use crate::utils::app_config::AppConfig;
use crate::utils::error::{Error, Result};

/// Generate a random password and store it as a new entry.
pub(crate) fn run(
    store: &PasswordStore, name: &str, length: Option<usize>, no_symbols: bool, clip: bool,
    force: bool,
) -> Result<()> {
    let file = store.entry_file(name)?;
    let recipients = store.recipients_for(&file)?;

    if file.exists() && !force {
        return Err(Error::new(&format!(
            "an entry already exists for {}, use --force to overwrite it",
            name
        )));
    }

    let length = match length {
        Some(length) => length,
        None => AppConfig::get("generated_length")?,
    };
    let password = pwgen::generate(length, !no_symbols)?;

    gpg::encrypt(&file, &format!("{}\n", password), &recipients)?;
    git::commit_all(store.root(), &format!("Generate password for {}", name))?;

    if clip {
        let clip_time: u64 = AppConfig::get("clip_time")?;
        clipboard::spawn_clip_child(&password)?;
        println!(
            "Copied {} to clipboard. Will clear in {} seconds.",
            name, clip_time
        );
    } else {
        println!("The generated password for {} is:", name);
        println!("{}", password);
    }

    Ok(())
}
