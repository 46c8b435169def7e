//! Console rendering of [`FileReport`]s: colored status lines, optional
//! unified diff, verbose old/new declarations, or JSON lines.

use std::io::{self, Write};

use owo_colors::OwoColorize;

use crate::core::{
    declaration::{DEFAULT_MAX_WIDTH, PatchAction, format_declaration},
    sync::{FileReport, FileStatus, reasons},
};

/// Writes reports to any sink. Stateless between reports.
#[derive(Debug, Clone, Copy)]
pub struct Renderer
{
    color: bool,
    verbose: bool,
    json: bool,
    /// Wrap width for the dry-run preview, same as the patcher's.
    max_width: usize,
}

impl Renderer
{
    pub fn new(
        color: bool,
        verbose: bool,
        json: bool,
    ) -> Self
    {
        Self { color, verbose, json, max_width: DEFAULT_MAX_WIDTH }
    }

    pub fn with_max_width(
        mut self,
        max_width: usize,
    ) -> Self
    {
        self.max_width = max_width;
        self
    }

    /// Render one report.
    pub fn report<W: Write>(
        &self,
        out: &mut W,
        report: &FileReport,
    ) -> io::Result<()>
    {
        if self.json
        {
            serde_json::to_writer(&mut *out, report).map_err(io::Error::other)?;
            return writeln!(out);
        }

        if let Some(diff) = &report.diff
        {
            self.diff(out, diff)?;
        }

        let path = report.file.display();
        let reason = report.reason.as_deref().unwrap_or("unknown error");

        match report.status
        {
            FileStatus::Changed if report.dry_run =>
            {
                writeln!(out, "📝 Dry run: no changes written to {}", self.bold(&path.to_string()))?;
                let preview = format_declaration(&report.new_all, "", self.max_width, "\n");
                writeln!(out, "{}", self.cyan(&preview))?;
            }
            FileStatus::Changed => match report.action
            {
                Some(PatchAction::Updated) => writeln!(out, "🔁 Updated __all__ in {}", self.green(&path.to_string()))?,
                _ => writeln!(out, "➕ Added __all__ to {}", self.green(&path.to_string()))?,
            },
            FileStatus::Unchanged => writeln!(out, "✅ {path} is up to date")?,
            FileStatus::Skip => match reason
            {
                reasons::IGNORE => writeln!(out, "🚫 Skipped {path} (file ignored by directive)")?,
                reasons::WILDCARD => writeln!(out, "{}", self.yellow(&format!("⚠️  Skipped {path} (Wildcard import)")))?,
                other => writeln!(out, "Skipped {path} ({other})")?,
            },
            FileStatus::Error => writeln!(out, "{}", self.red(&format!("❌ {path}: {reason}")))?,
        }

        if self.verbose && matches!(report.status, FileStatus::Changed | FileStatus::Unchanged)
        {
            let old = report
                .old_all
                .as_deref()
                .map(inline_list)
                .unwrap_or_else(|| "unavailable".to_string());
            writeln!(out, "   Old __all__: {old}")?;
            writeln!(out, "   New __all__: {}", inline_list(&report.new_all))?;
        }

        Ok(())
    }

    /// Render a batch in order.
    pub fn reports<W: Write>(
        &self,
        out: &mut W,
        reports: &[FileReport],
    ) -> io::Result<()>
    {
        for report in reports
        {
            self.report(out, report)?;
        }
        Ok(())
    }

    fn diff<W: Write>(
        &self,
        out: &mut W,
        diff: &str,
    ) -> io::Result<()>
    {
        for line in diff.lines()
        {
            let painted = if line.starts_with("+++") || line.starts_with("---")
            {
                self.bold(line)
            }
            else if line.starts_with('+')
            {
                self.green(line)
            }
            else if line.starts_with('-')
            {
                self.red(line)
            }
            else if line.starts_with("@@")
            {
                self.cyan(line)
            }
            else
            {
                line.to_string()
            };
            writeln!(out, "{painted}")?;
        }
        Ok(())
    }

    fn green(
        &self,
        s: &str,
    ) -> String
    {
        if self.color { s.green().to_string() } else { s.to_string() }
    }

    fn red(
        &self,
        s: &str,
    ) -> String
    {
        if self.color { s.red().to_string() } else { s.to_string() }
    }

    fn yellow(
        &self,
        s: &str,
    ) -> String
    {
        if self.color { s.yellow().to_string() } else { s.to_string() }
    }

    fn cyan(
        &self,
        s: &str,
    ) -> String
    {
        if self.color { s.cyan().to_string() } else { s.to_string() }
    }

    fn bold(
        &self,
        s: &str,
    ) -> String
    {
        if self.color { s.bold().to_string() } else { s.to_string() }
    }
}

/// `["a", "b"]`, always on one line.
fn inline_list(names: &[String]) -> String
{
    let quoted: Vec<String> = names
        .iter()
        .map(|n| format!("\"{n}\""))
        .collect();
    format!("[{}]", quoted.join(", "))
}
