//! Filepath: src/core/directives.rs
//! Comment directives that steer which imports end up in `__all__`.
//!
//! Markers (`# awl:...`) are matched as plain substrings of each line,
//! not through a comment-aware tokenizer. A marker spelled out inside a
//! string literal is therefore picked up as well.
//!
//! Two windows are scanned:
//!   - file flags: the first [`FILE_FLAG_WINDOW`] lines only;
//!   - line flags: every line, keyed by 1-based line number.

use std::collections::{BTreeMap, BTreeSet};

use memchr::memmem;

/// Number of leading lines inspected for file-level directives.
pub const FILE_FLAG_WINDOW: usize = 5;

/// A recognized directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Directive
{
    /// `# awl:ignore`
    Ignore,

    /// `# awl:include-private`
    IncludePrivate,

    /// `# awl:exclude-public`
    ExcludePublic,
}

impl Directive
{
    pub const ALL: [Directive; 3] =
        [Directive::Ignore, Directive::IncludePrivate, Directive::ExcludePublic];

    /// Comment text searched for on each line.
    pub fn marker(self) -> &'static str
    {
        match self
        {
            Directive::Ignore => "# awl:ignore",
            Directive::IncludePrivate => "# awl:include-private",
            Directive::ExcludePublic => "# awl:exclude-public",
        }
    }
}

/// Flags that apply to the whole file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileFlags
{
    pub ignore_file: bool,
    pub include_private: bool,
    pub exclude_public: bool,
}

/// Result of scanning a source text for directives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlFlags
{
    pub file: FileFlags,

    /// 1-based line number → directives found on that line.
    pub lines: BTreeMap<usize, BTreeSet<Directive>>,
}

impl ControlFlags
{
    /// Directives on `line`, empty if none.
    pub fn at_line(
        &self,
        line: usize,
    ) -> LineDirectives<'_>
    {
        LineDirectives(self.lines.get(&line))
    }
}

/// Borrowed view over one line's directives.
#[derive(Debug, Clone, Copy)]
pub struct LineDirectives<'a>(Option<&'a BTreeSet<Directive>>);

impl LineDirectives<'_>
{
    pub fn contains(
        &self,
        directive: Directive,
    ) -> bool
    {
        self.0.is_some_and(|set| set.contains(&directive))
    }
}

/// Scan `text` for directives. Pure function of its input.
pub fn scan(text: &str) -> ControlFlags
{
    let finders: Vec<(Directive, memmem::Finder<'static>)> = Directive::ALL
        .iter()
        .map(|&d| (d, memmem::Finder::new(d.marker())))
        .collect();

    let mut flags = ControlFlags::default();

    for (idx, line) in text.lines().enumerate()
    {
        let found: BTreeSet<Directive> = finders
            .iter()
            .filter(|(_, f)| f.find(line.as_bytes()).is_some())
            .map(|(d, _)| *d)
            .collect();

        if found.is_empty()
        {
            continue;
        }

        if idx < FILE_FLAG_WINDOW
        {
            let file = &mut flags.file;
            file.ignore_file |= found.contains(&Directive::Ignore);
            file.include_private |= found.contains(&Directive::IncludePrivate);
            file.exclude_public |= found.contains(&Directive::ExcludePublic);
        }

        flags.lines.insert(idx + 1, found);
    }

    flags
}
