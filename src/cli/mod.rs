//! # Command-Line Interface Module
//!
//! Defines the CLI with `clap` and dispatches parsed subcommands to the
//! handlers in `core::commands`. The `Cli` struct is the top level,
//! `Commands` enumerates the subcommands and `cli_match()` drives parsing,
//! configuration merging and execution.

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{
    generate,
    shells::{Bash, Fish, Zsh},
};
use std::io;
use std::path::PathBuf;

use crate::core::{commands, store::PasswordStore, types::OutputFormat};
use crate::utils::app_config::AppConfig;
use crate::utils::error::Result;
use crate::utils::types::LogLevel;

#[derive(Parser, Debug)]
#[command(
    name = "pk",
    author,
    about,
    long_about = "A GPG-backed password store for the command line",
    version
)]
pub struct Cli {
    /// Specifies a custom configuration file path.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enables or disables debug mode.
    #[arg(name = "debug", short, long = "debug", value_name = "DEBUG")]
    pub debug: Option<bool>,

    /// Sets the logging level: error, warn, info, debug or trace.
    #[arg(
        name = "log_level",
        short,
        long = "log-level",
        value_name = "LOG_LEVEL"
    )]
    pub log_level: Option<LogLevel>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Initialize the store for one or more GPG ids.
    #[clap(
        name = "init",
        about = "Initialize the password store for the given GPG ids"
    )]
    Init {
        /// GPG key ids (fingerprints, key ids or e-mail addresses).
        #[arg(required = true)]
        gpg_ids: Vec<String>,

        /// Restrict the ids to a subdirectory of the store.
        #[arg(short, long, value_name = "SUBDIR")]
        path: Option<String>,
    },

    /// List entries as a tree.
    #[clap(name = "ls", about = "List entries as a tree")]
    Ls {
        /// Subdirectory to list. Defaults to the whole store.
        subdir: Option<String>,
    },

    /// Decrypt and print an entry, or list a directory.
    #[clap(name = "show", about = "Decrypt and print an entry")]
    Show {
        /// Entry name. Omit to list the whole store.
        name: Option<String>,

        /// Copy the first line to the clipboard instead of printing.
        #[arg(short = 'c', long)]
        clip: bool,
    },

    /// Insert a new entry.
    #[clap(name = "insert", about = "Insert a new entry into the store")]
    Insert {
        /// Entry name.
        name: String,

        /// Read multi-line contents from stdin until EOF.
        #[arg(short, long)]
        multiline: bool,

        /// Echo the password while typing it.
        #[arg(short, long)]
        echo: bool,

        /// Overwrite an existing entry without asking.
        #[arg(short, long)]
        force: bool,
    },

    /// Generate a new random password entry.
    #[clap(name = "generate", about = "Generate a random password entry")]
    Generate {
        /// Entry name.
        name: String,

        /// Password length. Defaults to the configured generated_length.
        length: Option<usize>,

        /// Use letters and digits only.
        #[arg(short = 'n', long)]
        no_symbols: bool,

        /// Copy the password to the clipboard instead of printing it.
        #[arg(short = 'c', long)]
        clip: bool,

        /// Overwrite an existing entry.
        #[arg(short, long)]
        force: bool,
    },

    /// Edit an entry with the configured editor.
    #[clap(name = "edit", about = "Edit an entry with the configured editor")]
    Edit {
        /// Entry name.
        name: String,
    },

    /// Remove an entry or directory.
    #[clap(name = "rm", about = "Remove an entry from the store")]
    Rm {
        /// Entry or directory name.
        name: String,

        /// Delete directories and everything below them.
        #[arg(short, long)]
        recursive: bool,

        /// Skip the confirmation prompt.
        #[arg(short, long)]
        force: bool,
    },

    /// Rename an entry or directory.
    #[clap(name = "mv", about = "Rename an entry or directory")]
    Mv {
        /// Current name.
        old: String,
        /// New name.
        new: String,

        /// Overwrite the destination if it exists.
        #[arg(short, long)]
        force: bool,
    },

    /// Copy an entry or directory.
    #[clap(name = "cp", about = "Copy an entry or directory")]
    Cp {
        /// Source name.
        old: String,
        /// Destination name.
        new: String,

        /// Overwrite the destination if it exists.
        #[arg(short, long)]
        force: bool,
    },

    /// Search entry names.
    #[clap(name = "find", about = "List entries whose name matches the query")]
    Find {
        /// Substring to search for.
        query: String,

        /// The output format: `text` or `json`.
        #[arg(long, value_name = "FORMAT", default_value = "text", value_parser = parse_output_format)]
        format: OutputFormat,
    },

    /// Search decrypted contents of every entry.
    #[clap(name = "grep", about = "Search inside the decrypted entries")]
    Grep {
        /// Substring to search for.
        query: String,
    },

    /// Copy an entry's first line to the clipboard.
    #[clap(name = "clip", about = "Copy an entry's first line to the clipboard")]
    Clip {
        /// Entry name. Without a name the secret is read from stdin and
        /// this process holds the clipboard until it is cleared.
        name: Option<String>,
    },

    /// Run git inside the store.
    #[clap(name = "git", about = "Run a git command inside the store")]
    Git {
        /// Arguments passed through to git.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Displays the current application configuration.
    #[clap(name = "config", about = "Show Configuration", long_about = None)]
    Config,

    /// Subcommands for generating shell completion scripts.
    #[clap(name = "completion", about = "Generate completion scripts", long_about = None)]
    Completion {
        #[clap(subcommand)]
        subcommand: CompletionSubcommand,
    },
}

/// Defines subcommands for shell completion script generation.
#[derive(Subcommand, PartialEq, Debug)]
enum CompletionSubcommand {
    /// Generates the autocompletion script for Bash.
    #[clap(about = "generate the autocompletion script for bash")]
    Bash,
    /// Generates the autocompletion script for Zsh.
    #[clap(about = "generate the autocompletion script for zsh")]
    Zsh,
    /// Generates the autocompletion script for Fish.
    #[clap(about = "generate the autocompletion script for fish")]
    Fish,
}

/// Parses command-line arguments, merges configuration layers, and executes
/// the matched command.
pub fn cli_match() -> Result<()> {
    // Parse the command line arguments
    let cli = Cli::parse();

    // Merge clap config file if the value is set
    AppConfig::merge_config(cli.config.as_deref())?;

    let app = Cli::command();
    let matches = app.get_matches();

    AppConfig::merge_args(matches)?;

    // Execute the subcommand
    match &cli.command {
        Commands::Init { gpg_ids, path } => {
            let store = PasswordStore::open()?;
            commands::init::run(&store, gpg_ids, path.as_deref())?;
        }
        Commands::Ls { subdir } => {
            let store = PasswordStore::open()?;
            commands::show::ls(&store, &mut io::stdout(), subdir.as_deref())?;
        }
        Commands::Show { name, clip } => {
            let store = PasswordStore::open()?;
            commands::show::run(&store, &mut io::stdout(), name.as_deref(), *clip)?;
        }
        Commands::Insert {
            name,
            multiline,
            echo,
            force,
        } => {
            let store = PasswordStore::open()?;
            commands::insert::run(&store, name, *multiline, *echo, *force)?;
        }
        Commands::Generate {
            name,
            length,
            no_symbols,
            clip,
            force,
        } => {
            let store = PasswordStore::open()?;
            commands::generate::run(&store, name, *length, *no_symbols, *clip, *force)?;
        }
        Commands::Edit { name } => {
            let store = PasswordStore::open()?;
            commands::edit::run(&store, name)?;
        }
        Commands::Rm {
            name,
            recursive,
            force,
        } => {
            let store = PasswordStore::open()?;
            commands::rm::run(&store, name, *recursive, *force)?;
        }
        Commands::Mv { old, new, force } => {
            let store = PasswordStore::open()?;
            commands::mv::run(&store, old, new, *force)?;
        }
        Commands::Cp { old, new, force } => {
            let store = PasswordStore::open()?;
            commands::cp::run(&store, old, new, *force)?;
        }
        Commands::Find { query, format } => {
            let store = PasswordStore::open()?;
            commands::find::run(&store, &mut io::stdout(), query, format)?;
        }
        Commands::Grep { query } => {
            let store = PasswordStore::open()?;
            commands::grep::run(&store, &mut io::stdout(), query)?;
        }
        Commands::Clip { name } => {
            let store = PasswordStore::open()?;
            commands::clip::run(&store, name.as_deref())?;
        }
        Commands::Git { args } => {
            let store = PasswordStore::open()?;
            commands::git::run(&store, args)?;
        }
        Commands::Config => commands::config::run()?,
        Commands::Completion { subcommand } => {
            let mut app = Cli::command();
            match subcommand {
                CompletionSubcommand::Bash => {
                    generate(Bash, &mut app, "pk", &mut std::io::stdout());
                }
                CompletionSubcommand::Zsh => {
                    generate(Zsh, &mut app, "pk", &mut std::io::stdout());
                }
                CompletionSubcommand::Fish => {
                    generate(Fish, &mut app, "pk", &mut std::io::stdout());
                }
            }
        }
    }

    Ok(())
}

/// Parses a string slice into an `OutputFormat`, used by `clap` as a value
/// parser.
fn parse_output_format(s: &str) -> std::result::Result<OutputFormat, String> {
    match s.to_lowercase().as_str() {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        _ => Err(format!("Invalid output format: {}", s)),
    }
}
