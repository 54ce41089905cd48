//! imdclude: flattens `#include "path"` directives into a single document.
//!
//! `imdclude -f FILE` replaces every directive in `FILE` with the (recursively
//! flattened) content of the file it names. `--backup` snapshots the document
//! first; `--list` and `--restore ID` manage those snapshots.

#![warn(missing_docs)]

mod flatten;
mod list;
mod logging;
mod restore;
mod settings;

use std::io;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use imdclude_source::{DiskFs, FileSystem};

use crate::flatten::FlattenArgs;
use crate::settings::Settings;

/// Flatten `#include "path"` directives into a single document.
#[derive(Parser, Debug)]
#[command(name = "imdclude", version, about = "Flatten #include directives")]
pub struct Cli {
    /// File to import includes into. With `--list`, only its backups are shown.
    #[arg(short, long)]
    pub file: Option<String>,

    /// Directory include paths are relative to (default: config, then ".").
    #[arg(short, long)]
    pub dir: Option<String>,

    /// Write the flattened document here instead of back to `--file`.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Back up the original document beforehand.
    #[arg(short, long)]
    pub backup: bool,

    /// List all available backups.
    #[arg(short, long)]
    pub list: bool,

    /// Restore the backup with the given ID.
    #[arg(short, long, value_name = "ID")]
    pub restore: Option<String>,

    /// Show internal debug logs.
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to a custom `imdclude.toml` configuration file.
    #[arg(long)]
    pub config: Option<String>,

    /// Output format for `--list`.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Listing output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// One human-readable line per backup.
    Text,
    /// A JSON array of backup summaries.
    Json,
}

/// The action selected by the flags, in precedence order.
#[derive(Debug, PartialEq, Eq)]
enum Action {
    Restore(String),
    List,
    Flatten,
}

impl Cli {
    fn action(&self) -> Action {
        if let Some(ref id) = self.restore {
            if !id.is_empty() {
                return Action::Restore(id.clone());
            }
        }
        if self.list {
            return Action::List;
        }
        Action::Flatten
    }

    fn flatten_args(&self) -> Result<FlattenArgs, Box<dyn std::error::Error>> {
        let Some(ref file) = self.file else {
            return Err("the required flag `-f, --file` was not specified".into());
        };
        Ok(FlattenArgs {
            file: PathBuf::from(file),
            output: self.output.as_ref().map(PathBuf::from),
            backup: self.backup,
        })
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(&cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<i32, Box<dyn std::error::Error>> {
    let settings = Settings::from_cli(cli)?;
    let mut out = io::stdout().lock();

    match cli.action() {
        Action::Restore(id) => restore::run(&id, &settings, &mut out),
        Action::List => {
            let only = cli.file.as_ref().map(|f| DiskFs.absolute(Path::new(f)));
            list::run(&settings, cli.format, only.as_deref(), &mut out)
        }
        Action::Flatten => flatten::run(&cli.flatten_args()?, &settings, &mut out),
    }
}
