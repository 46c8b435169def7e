use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// Shared application context for global flags
#[derive(Clone, Debug)]
pub struct AppContext {
    pub quiet: bool,    // --quiet
    pub verbose: bool,  // --verbose
    pub no_color: bool, // --no-color or NO_COLOR
    pub dry_run: bool,  // --dry-run
}

#[derive(Parser, Debug)]
#[command(name = "awl")]
#[command(about = "Keep a Python package's __all__ in sync with its imports")]
#[command(version, long_about = None, disable_version_flag = true)]
pub struct Cli {
    /// Python file to update; "-" reads stdin. Omit to sync every
    /// package listed in pyproject.toml
    pub path: Option<PathBuf>,

    /// Python file to update (takes precedence over PATH)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Compute changes without writing them
    #[arg(long)]
    pub dry_run: bool,

    /// Print a unified diff of each change
    #[arg(long)]
    pub diff: bool,

    /// Only report warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Debug logging plus old/new __all__ for each file
    #[arg(short = 'V', long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Emit one JSON object per file instead of text
    #[arg(long)]
    pub json: bool,

    /// Longest single-line __all__ before wrapping (overrides config)
    #[arg(long, value_name = "N")]
    pub max_width: Option<usize>,

    /// Print a shell completion script and exit
    #[arg(long, value_enum, value_name = "SHELL")]
    pub completions: Option<Shell>,

    /// Print version
    #[arg(short = 'v', long, action = ArgAction::Version)]
    pub version: Option<bool>,
}

impl Cli {
    /// Shared context derived from the global flags.
    pub fn context(&self) -> AppContext {
        AppContext {
            quiet: self.quiet,
            verbose: self.verbose,
            no_color: self.no_color || std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty()),
            dry_run: self.dry_run,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}
