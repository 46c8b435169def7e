//! Filepath: src/core/declaration.rs
//! ------------------------------------------------------------------
//! Locate, format and rewrite the module's `__all__` declaration.
//!
//! Invariants:
//!   - More than one top-level `__all__` assignment is a conflict:
//!     nothing is rewritten.
//!   - Only the physical lines of the located statement change, or
//!     just the statement's bytes where other code shares its line;
//!     every other byte of the source is preserved, including CRLF
//!     terminators and a missing final newline.
//!   - Formatting is deterministic, so patching the output of a
//!     previous patch with the same names reports no change.
//!
//! The patcher never does I/O. Persisting (or not, for dry runs) is
//! the caller's decision.
//! ------------------------------------------------------------------

use itertools::Itertools;
use serde::Serialize;
use tree_sitter::Node;

use crate::{
    infra::line_index::NewlineIndex,
    parsers::python_parser::{PythonModule, line_range_1based},
};

/// Reserved export identifier.
pub const EXPORT_IDENT: &str = "__all__";

/// Longest single-line declaration before wrapping.
pub const DEFAULT_MAX_WIDTH: usize = 120;

/// Indent added to each name line of a wrapped declaration.
const ITEM_INDENT: &str = "    ";

/// Where an existing declaration sits in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationSite
{
    /// 1-based first line of the statement.
    pub start_line: usize,
    /// 1-based last line of the statement (inclusive).
    pub end_line: usize,
    /// Leading whitespace of the first line.
    pub indent: String,
    /// Byte range of the statement itself.
    pub start_byte: usize,
    pub end_byte: usize,
}

impl DeclarationSite
{
    /// Byte range to rewrite: the statement's whole lines, narrowed to the
    /// statement itself on a side where other code shares the line.
    /// Returns the range and whether it starts mid-line.
    fn replace_span(
        &self,
        source: &str,
        index: &NewlineIndex,
    ) -> Option<(usize, usize, bool)>
    {
        let (line_lo, line_hi) = index.span_for_lines(self.start_line, self.end_line, source.as_bytes())?;

        let shares_start = !source
            .get(line_lo..self.start_byte)?
            .trim()
            .is_empty();
        let tail = source
            .get(self.end_byte..line_hi)?
            .trim_start();
        let shares_end = !tail.is_empty() && !tail.starts_with('#');

        let lo = if shares_start { self.start_byte } else { line_lo };
        let hi = if shares_end { self.end_byte } else { line_hi };
        Some((lo, hi, shares_start))
    }
}

/// Why a patch did not change anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchReason
{
    None,
    Conflict,
}

/// What a changing patch did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchAction
{
    /// An existing declaration was rewritten in place.
    Updated,
    /// No declaration existed; one was appended.
    Added,
}

/// Outcome of [`patch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchResult
{
    pub changed: bool,
    pub reason: PatchReason,
    pub action: Option<PatchAction>,
    /// Full patched text when `changed`.
    pub new_text: Option<String>,
}

impl PatchResult
{
    fn unchanged(reason: PatchReason) -> Self
    {
        Self { changed: false, reason, action: None, new_text: None }
    }

    fn rewritten(
        action: PatchAction,
        new_text: String,
    ) -> Self
    {
        Self { changed: true, reason: PatchReason::None, action: Some(action), new_text: Some(new_text) }
    }
}

/// Patcher settings.
#[derive(Debug, Clone, Copy)]
pub struct PatchOptions
{
    pub max_width: usize,
}

impl Default for PatchOptions
{
    fn default() -> Self
    {
        Self { max_width: DEFAULT_MAX_WIDTH }
    }
}

/// Top-level `__all__ = ...` (or `__all__: T = ...`) assignments.
/// A bare annotation without a value binds nothing and is skipped.
fn export_assignments<'m>(module: &'m PythonModule<'_>) -> Vec<(Node<'m>, Node<'m>)>
{
    module
        .top_level()
        .into_iter()
        .filter(|stmt| stmt.kind() == "expression_statement")
        .filter_map(|stmt| {
            let assign = stmt.named_child(0)?;
            if assign.kind() != "assignment" || assign.child_by_field_name("right").is_none()
            {
                return None;
            }
            let left = assign.child_by_field_name("left")?;
            (left.kind() == "identifier" && module.text(left) == EXPORT_IDENT)
                .then_some((stmt, assign))
        })
        .collect()
}

/// Locate every top-level export declaration.
pub fn locate(module: &PythonModule<'_>) -> Vec<DeclarationSite>
{
    let source = module.source();
    let index = NewlineIndex::build(module.bytes());

    export_assignments(module)
        .into_iter()
        .map(|(stmt, _)| {
            let (start_line, end_line) = line_range_1based(stmt);
            let line_start = index
                .start_byte_of_line(start_line)
                .unwrap_or(0);
            let indent: String = source[line_start..]
                .chars()
                .take_while(|c| *c == ' ' || *c == '\t')
                .collect();
            DeclarationSite {
                start_line,
                end_line,
                indent,
                start_byte: stmt.start_byte(),
                end_byte: stmt.end_byte(),
            }
        })
        .collect()
}

/// Render the declaration for `names` at `indent`, joining lines with `eol`.
/// Names are emitted in the order given; callers pass them sorted.
pub fn format_declaration(
    names: &[String],
    indent: &str,
    max_width: usize,
    eol: &str,
) -> String
{
    let joined = names
        .iter()
        .map(|n| format!("\"{n}\""))
        .join(", ");
    let single = format!("{indent}{EXPORT_IDENT} = [{joined}]");

    if single.chars().count() <= max_width
    {
        return single;
    }

    let mut lines = Vec::with_capacity(names.len() + 2);
    lines.push(format!("{indent}{EXPORT_IDENT} = ["));
    lines.extend(
        names
            .iter()
            .map(|n| format!("{indent}{ITEM_INDENT}\"{n}\",")),
    );
    lines.push(format!("{indent}]"));
    lines.join(eol)
}

/// Decide how `module`'s source must change so its declaration lists
/// exactly `names`.
pub fn patch(
    module: &PythonModule<'_>,
    names: &[String],
    opts: &PatchOptions,
) -> PatchResult
{
    let source = module.source();
    let bytes = module.bytes();
    let index = NewlineIndex::build(bytes);
    let eol = index.line_ending(bytes);

    let sites = locate(module);

    match sites.as_slice()
    {
        [] =>
        {
            let block = format_declaration(names, "", opts.max_width, eol);
            let mut out = String::with_capacity(source.len() + block.len() + 2 * eol.len());
            out.push_str(source);
            if !index.ends_with_newline()
            {
                out.push_str(eol);
            }
            out.push_str(&block);
            out.push_str(eol);
            PatchResult::rewritten(PatchAction::Added, out)
        }
        [site] =>
        {
            let Some((lo, hi, mid_line)) = site.replace_span(source, &index)
            else
            {
                return PatchResult::unchanged(PatchReason::None);
            };

            let formatted = format_declaration(names, &site.indent, opts.max_width, eol);
            // Mid-line, the indent already precedes the earlier statement.
            let block = if mid_line { &formatted[site.indent.len()..] } else { formatted.as_str() };
            if &source[lo..hi] == block
            {
                return PatchResult::unchanged(PatchReason::None);
            }

            let mut out = String::with_capacity(source.len() - (hi - lo) + block.len());
            out.push_str(&source[..lo]);
            out.push_str(block);
            out.push_str(&source[hi..]);
            PatchResult::rewritten(PatchAction::Updated, out)
        }
        _ => PatchResult::unchanged(PatchReason::Conflict),
    }
}

/// Current value of the first `__all__` assignment, if it is a literal
/// list or tuple of plain strings. Anything else yields `None`.
pub fn extract_current_all(module: &PythonModule<'_>) -> Option<Vec<String>>
{
    let (_, assign) = export_assignments(module)
        .into_iter()
        .next()?;
    let value = assign.child_by_field_name("right")?;

    if !matches!(value.kind(), "list" | "tuple")
    {
        return None;
    }

    let mut cursor = value.walk();
    value
        .named_children(&mut cursor)
        .filter(|n| n.kind() != "comment")
        .map(|n| string_literal_value(module, n))
        .collect()
}

/// Contents of a non-interpolated, non-bytes string literal, escapes left as written.
fn string_literal_value(
    module: &PythonModule<'_>,
    node: Node<'_>,
) -> Option<String>
{
    if node.kind() != "string"
    {
        return None;
    }

    let mut cursor = node.walk();
    let mut out = String::new();
    for part in node.named_children(&mut cursor)
    {
        match part.kind()
        {
            "string_start" =>
            {
                let prefix = module.text(part).to_ascii_lowercase();
                if prefix.contains('b') || prefix.contains('f')
                {
                    return None;
                }
            }
            "string_content" => out.push_str(module.text(part)),
            "string_end" => {}
            _ => return None,
        }
    }
    Some(out)
}
