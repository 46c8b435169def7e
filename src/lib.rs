//! **awl** - keeps a Python package's `__all__` in step with its imports
//!
//! Comment directives steer which names are exported; the declaration is
//! rewritten in place, touching no other byte of the file.

/// Command-line interface with clap integration
pub mod cli;

/// Shell completion generation
pub mod completion;

/// Status lines, diffs and JSON output
pub mod render;

/// Core pipeline - directives, imports, name policy and patching
pub mod core {
    /// `# awl:...` comment directives (file and line windows)
    pub mod directives;
    pub use directives::{ControlFlags, Directive, FileFlags};

    /// Top-level import statements and the names they bind
    pub mod imports;
    pub use imports::ImportStatement;

    /// Public/private policy over imported names
    pub mod filter;

    /// Locate, format and rewrite the `__all__` declaration
    pub mod declaration;
    pub use declaration::{PatchAction, PatchOptions, PatchReason, PatchResult};

    /// Per-file and batch orchestration
    pub mod sync;
    pub use sync::{FileReport, FileStatus, SyncError, SyncOptions, run_batch, sync_file, sync_source};
}

/// Command handlers
pub mod cli_ext {
    /// Single file, stdin and batch modes plus exit codes
    pub mod sync_cmd;
    pub use sync_cmd::run as sync_run;
}

/// Language processing - tree-sitter Python parsing
pub mod parsers {
    /// Python module parsing (top-level statements, syntax errors)
    pub mod python_parser;
    pub use python_parser::{ParseError, PythonModule};
}

/// Infrastructure - Configuration, I/O, discovery
pub mod infra {
    /// Configuration management with file and env sources
    pub mod config;
    pub use config::{Config, load_config};

    /// Whole-file reads, atomic writes, stdin capture
    pub mod io;

    /// CRLF/LF-robust line indexing for line→byte mapping
    pub mod line_index;
    pub use line_index::NewlineIndex;

    /// Source roots from pyproject.toml
    pub mod pyproject;

    /// Gitignore-aware discovery of `__init__.py` files
    pub mod walk;
    pub use walk::FileWalker;
}

// Strategic re-exports for clean CLI interface
pub use cli::{AppContext, Cli};
pub use cli_ext::sync_run;
pub use infra::{Config, FileWalker, load_config};

// Core types for external consumers
pub use crate::core::{FileReport, FileStatus, SyncOptions, sync_file, sync_source};
