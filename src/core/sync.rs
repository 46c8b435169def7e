//! Filepath: src/core/sync.rs
//! ------------------------------------------------------------------
//! Per-file and batch orchestration of the `__all__` synchronizer.
//!
//! Pipeline for one source buffer:
//!   scan directives → (file ignore? skip) → parse → collect imports
//!   → (wildcard? skip) → filter names → patch declaration.
//!
//! `sync_source` is pure. `sync_file` adds the read, the optional
//! atomic write and the diff preview. `run_batch` discovers package
//! `__init__.py` files from `pyproject.toml` and fans out with rayon;
//! per-file failures become error records and never stop the batch.
//! ------------------------------------------------------------------

use std::{
    collections::BTreeSet,
    io,
    path::{Path, PathBuf},
};

use anyhow::Result;
use miette::{Diagnostic, NamedSource, SourceSpan};
use rayon::prelude::*;
use serde::Serialize;
use similar::TextDiff;
use tracing::{debug, instrument, warn};

use crate::{
    core::{
        declaration::{self, DEFAULT_MAX_WIDTH, PatchAction, PatchOptions, PatchReason},
        directives, filter, imports,
    },
    infra::{config::Config, io as fsio, pyproject, walk::FileWalker},
    parsers::python_parser::{ParseError, PythonModule},
};

/// Reason strings carried by [`FileReport::reason`].
pub mod reasons
{
    pub const WILDCARD: &str = "wildcard";
    pub const IGNORE: &str = "ignore";
    pub const NO_PYPROJECT: &str = "no-pyproject";
    pub const CONFLICT: &str = "Multiple __all__ assignments";
    pub const SYNTAX: &str = "syntax-error";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus
{
    Changed,
    Unchanged,
    Skip,
    Error,
}

/// Serializable record of one processed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport
{
    pub status: FileStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub file: PathBuf,
    /// Declaration before the sync; only read in verbose mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_all: Option<Vec<String>>,
    pub new_all: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<PatchAction>,
    pub dry_run: bool,
    /// Unified diff of the change; only built when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

impl FileReport
{
    /// Error record with no names attached.
    pub fn error(
        file: impl Into<PathBuf>,
        reason: impl Into<String>,
    ) -> Self
    {
        Self {
            status: FileStatus::Error,
            reason: Some(reason.into()),
            file: file.into(),
            old_all: None,
            new_all: Vec::new(),
            action: None,
            dry_run: false,
            diff: None,
        }
    }

    pub fn is_error(&self) -> bool
    {
        self.status == FileStatus::Error
    }
}

/// Knobs for a sync run.
#[derive(Debug, Clone, Copy)]
pub struct SyncOptions
{
    pub dry_run: bool,
    pub verbose: bool,
    pub show_diff: bool,
    pub max_width: usize,
}

impl Default for SyncOptions
{
    fn default() -> Self
    {
        Self { dry_run: false, verbose: false, show_diff: false, max_width: DEFAULT_MAX_WIDTH }
    }
}

/// Decision for one in-memory buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceOutcome
{
    pub status: FileStatus,
    pub reason: Option<&'static str>,
    pub old_all: Option<Vec<String>>,
    pub new_all: Vec<String>,
    pub action: Option<PatchAction>,
    /// Patched text when `status` is `Changed`.
    pub new_text: Option<String>,
}

impl SourceOutcome
{
    fn skip(reason: &'static str) -> Self
    {
        Self {
            status: FileStatus::Skip,
            reason: Some(reason),
            old_all: None,
            new_all: Vec::new(),
            action: None,
            new_text: None,
        }
    }
}

/// Failures that stop processing of a single file.
#[derive(Debug, thiserror::Error, Diagnostic)]
pub enum SyncError
{
    #[error("Failed to read {}: {source}", .path.display())]
    #[diagnostic(code(awl::io::read))]
    Read
    {
        path: PathBuf,
        source: io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    #[diagnostic(code(awl::io::write))]
    Write
    {
        path: PathBuf,
        source: io::Error,
    },

    #[error("Invalid Python syntax in {} at line {line}", .path.display())]
    #[diagnostic(code(awl::syntax), help("the file was left untouched; fix the syntax and run again"))]
    Syntax
    {
        path: PathBuf,
        line: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("parsing failed here")]
        span: SourceSpan,
    },

    #[error(transparent)]
    #[diagnostic(code(awl::parser))]
    Parser(ParseError),
}

impl SyncError
{
    /// Reason string for the batch error record.
    pub fn reason(&self) -> String
    {
        match self
        {
            SyncError::Syntax { .. } => reasons::SYNTAX.to_string(),
            other => other.to_string(),
        }
    }

    fn from_parse(
        path: &Path,
        source: &str,
        err: ParseError,
    ) -> Self
    {
        match err
        {
            ParseError::Syntax { line, span } => SyncError::Syntax {
                path: path.to_path_buf(),
                line,
                src: NamedSource::new(path.display().to_string(), source.to_string()),
                span,
            },
            other => SyncError::Parser(other),
        }
    }
}

/// Run the pipeline on one buffer. Never touches the filesystem.
pub fn sync_source(
    source: &str,
    opts: &SyncOptions,
) -> Result<SourceOutcome, ParseError>
{
    let flags = directives::scan(source);
    if flags.file.ignore_file
    {
        return Ok(SourceOutcome::skip(reasons::IGNORE));
    }

    let module = PythonModule::parse(source)?;
    let statements = imports::collect(&module);

    if let Some(stmt) = statements.iter().find(|s| s.wildcard)
    {
        debug!(line = stmt.line_number, "wildcard import");
        return Ok(SourceOutcome::skip(reasons::WILDCARD));
    }

    let names = filter::filter(&statements, &flags);
    let old_all = if opts.verbose { declaration::extract_current_all(&module) } else { None };

    let result = declaration::patch(&module, &names, &PatchOptions { max_width: opts.max_width });

    let (status, reason) = match (result.changed, result.reason)
    {
        (_, PatchReason::Conflict) => (FileStatus::Error, Some(reasons::CONFLICT)),
        (true, _) => (FileStatus::Changed, None),
        (false, _) => (FileStatus::Unchanged, None),
    };

    Ok(SourceOutcome {
        status,
        reason,
        old_all,
        new_all: names,
        action: result.action,
        new_text: result.new_text,
    })
}

/// Sync one file on disk. Writes atomically unless `dry_run`.
#[instrument(skip(path, opts), fields(path = %path.display()))]
pub fn sync_file(
    path: &Path,
    opts: &SyncOptions,
) -> Result<FileReport, SyncError>
{
    let source = fsio::read_source(path)
        .map_err(|source| SyncError::Read { path: path.to_path_buf(), source })?;

    let outcome = sync_source(&source, opts).map_err(|e| SyncError::from_parse(path, &source, e))?;

    let diff = match (&outcome.new_text, opts.show_diff)
    {
        (Some(new_text), true) => Some(unified_diff(path, &source, new_text)),
        _ => None,
    };

    match &outcome.new_text
    {
        Some(new_text) if !opts.dry_run =>
        {
            fsio::write_atomic(path, new_text.as_bytes())
                .map_err(|source| SyncError::Write { path: path.to_path_buf(), source })?;
            debug!(action = ?outcome.action, "declaration written");
        }
        _ => {}
    }

    Ok(FileReport {
        status: outcome.status,
        reason: outcome.reason.map(str::to_string),
        file: path.to_path_buf(),
        old_all: outcome.old_all,
        new_all: outcome.new_all,
        action: outcome.action,
        dry_run: opts.dry_run,
        diff,
    })
}

/// Unified diff between the file's current and patched text.
pub fn unified_diff(
    path: &Path,
    old: &str,
    new: &str,
) -> String
{
    let name = path.display().to_string();
    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(3)
        .header(&name, &name)
        .to_string()
}

/// Sync every `__init__.py` under the source roots named by
/// `project_dir/pyproject.toml`. Discovery honors the config's ignore
/// globs and hidden-directory policy. Reports come back sorted by path.
#[instrument(skip(project_dir, opts, config), fields(project = %project_dir.display()))]
pub fn run_batch(
    project_dir: &Path,
    opts: &SyncOptions,
    config: &Config,
) -> Result<Vec<FileReport>>
{
    let pyproject_path = project_dir.join(pyproject::PYPROJECT);
    if !pyproject_path.is_file()
    {
        warn!(path = %pyproject_path.display(), "no pyproject.toml found");
        return Ok(vec![FileReport::error(pyproject_path, reasons::NO_PYPROJECT)]);
    }

    let roots = pyproject::source_roots(&pyproject_path)?;
    if roots.is_empty()
    {
        warn!("pyproject.toml names no source roots and there is no src/ directory");
    }

    let walker = FileWalker::new(&config.ignore_patterns)?.with_include_hidden(config.include_hidden);
    let files: BTreeSet<PathBuf> = roots
        .iter()
        .flat_map(|root| walker.init_files(root))
        .collect();

    debug!(count = files.len(), "syncing init files");

    let mut reports: Vec<FileReport> = files
        .into_par_iter()
        .map(|path| {
            sync_file(&path, opts).unwrap_or_else(|err| {
                warn!(path = %path.display(), %err, "file failed");
                FileReport::error(path, err.reason())
            })
        })
        .collect();

    reports.sort_by(|a, b| a.file.cmp(&b.file));
    Ok(reports)
}
