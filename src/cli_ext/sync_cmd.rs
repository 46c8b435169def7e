//! Command handler for `awl`: single file, stdin, or pyproject batch.
//!
//! Reports go to stdout, except in stdin mode where stdout carries the
//! resulting source and the report goes to stderr.

use std::{
    io::{self, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use tracing::{instrument, warn};

use crate::{
    cli::{AppContext, Cli},
    core::sync::{self, FileReport, FileStatus, SyncError, SyncOptions},
    infra::{
        config::{Config, load_config},
        io as fsio,
    },
    render::Renderer,
};

/// Marker path selecting stdin.
const STDIN_MARKER: &str = "-";

/// Display name used for stdin in reports.
const STDIN_NAME: &str = "<stdin>";

/// Where this invocation reads from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target
{
    Batch,
    Stdin,
    File(PathBuf),
}

/// Resolve PATH and `--input`; `--input` wins when both are given.
pub fn resolve_target(
    path: Option<&Path>,
    input: Option<&Path>,
) -> Target
{
    if let (Some(p), Some(i)) = (path, input)
    {
        eprintln!(
            "Warning: both PATH ({}) and --input ({}) given; using --input",
            p.display(),
            i.display()
        );
    }

    match input.or(path)
    {
        None => Target::Batch,
        Some(p) if p.as_os_str() == STDIN_MARKER => Target::Stdin,
        Some(p) => Target::File(p.to_path_buf()),
    }
}

/// Run the command and compute the process exit code.
#[instrument(skip_all)]
pub fn run(
    cli: &Cli,
    ctx: &AppContext,
) -> Result<ExitCode>
{
    let config = load_config().unwrap_or_else(|err| {
        warn!(%err, "ignoring unreadable configuration");
        Config::default()
    });

    let opts = SyncOptions {
        dry_run: ctx.dry_run,
        verbose: ctx.verbose,
        show_diff: cli.diff,
        max_width: cli.max_width.unwrap_or(config.max_width),
    };
    let renderer = Renderer::new(!ctx.no_color, ctx.verbose, cli.json).with_max_width(opts.max_width);

    let reports = match resolve_target(cli.path.as_deref(), cli.input.as_deref())
    {
        Target::Batch =>
        {
            let cwd = std::env::current_dir().context("Failed to resolve the working directory")?;
            let reports = sync::run_batch(&cwd, &opts, &config)?;
            emit(&renderer, ctx, &mut io::stdout().lock(), &reports)?;
            reports
        }
        Target::Stdin =>
        {
            let report = run_stdin(&opts)?;
            emit(&renderer, ctx, &mut io::stderr().lock(), std::slice::from_ref(&report))?;
            vec![report]
        }
        Target::File(path) =>
        {
            if !path.exists()
            {
                eprintln!("Error: Input file does not exist: {}", path.display());
                return Ok(ExitCode::FAILURE);
            }
            let Some(report) = run_file(&path, &opts, cli.json)
            else
            {
                return Ok(ExitCode::FAILURE);
            };
            emit(&renderer, ctx, &mut io::stdout().lock(), std::slice::from_ref(&report))?;
            vec![report]
        }
    };

    Ok(exit_code(&reports))
}

pub fn has_errors(reports: &[FileReport]) -> bool
{
    reports.iter().any(FileReport::is_error)
}

/// 1 when any report is an error, else 0.
pub fn exit_code(reports: &[FileReport]) -> ExitCode
{
    if has_errors(reports) { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}

/// Sync one path. Outside JSON mode, syntax errors are printed as a
/// diagnostic and yield `None`; other failures become error reports.
fn run_file(
    path: &Path,
    opts: &SyncOptions,
    json: bool,
) -> Option<FileReport>
{
    match sync::sync_file(path, opts)
    {
        Ok(report) => Some(report),
        Err(err @ SyncError::Syntax { .. }) if !json =>
        {
            eprintln!("{:?}", miette::Report::new(err));
            None
        }
        Err(err) => Some(FileReport::error(path, err.reason())),
    }
}

/// Capture stdin, sync the capture, and echo the resulting text.
fn run_stdin(opts: &SyncOptions) -> Result<FileReport>
{
    let capture = fsio::capture_stdin().context("Failed to capture stdin")?;

    let mut report = match sync::sync_file(capture.path(), opts)
    {
        Ok(report) => report,
        Err(err) => FileReport::error(capture.path(), err.reason()),
    };
    report.file = PathBuf::from(STDIN_NAME);

    let text = fsio::read_source(capture.path()).context("Failed to read captured stdin")?;
    let mut out = io::stdout().lock();
    out.write_all(text.as_bytes())?;
    out.flush()?;

    Ok(report)
}

/// Render reports; `--quiet` keeps only skips and errors.
fn emit<W: Write>(
    renderer: &Renderer,
    ctx: &AppContext,
    out: &mut W,
    reports: &[FileReport],
) -> Result<()>
{
    let shown: Vec<FileReport> = reports
        .iter()
        .filter(|r| !ctx.quiet || matches!(r.status, FileStatus::Skip | FileStatus::Error))
        .cloned()
        .collect();

    renderer.reports(out, &shown)?;
    out.flush()?;
    Ok(())
}
