//! Filepath: src/core/imports.rs
//! Top-level import collection.
//!
//! One [`ImportStatement`] per statement (not per name), anchored at the
//! statement's first line so line directives can be matched against it.
//! Covers `import a.b as c`, `from x import (a, b as c)` and
//! `from __future__ import ...`. Wildcard statements are kept and
//! flagged so callers can bail out on the whole file.

use tree_sitter::Node;

use crate::parsers::python_parser::PythonModule;

/// A top-level import statement and the names it binds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportStatement
{
    /// 1-based line the statement starts on.
    pub line_number: usize,

    /// Effective bound names, in source order.
    pub bound_names: Vec<String>,

    /// `from x import *`
    pub wildcard: bool,
}

impl ImportStatement
{
    pub fn new(
        line_number: usize,
        bound_names: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self
    {
        Self {
            line_number,
            bound_names: bound_names
                .into_iter()
                .map(Into::into)
                .collect(),
            wildcard: false,
        }
    }
}

/// Collect the top-level import statements of `module`.
pub fn collect(module: &PythonModule<'_>) -> Vec<ImportStatement>
{
    module
        .top_level()
        .into_iter()
        .filter_map(|stmt| match stmt.kind()
        {
            "import_statement" | "import_from_statement" | "future_import_statement" =>
            {
                Some(statement_from(module, stmt))
            }
            _ => None,
        })
        .collect()
}

fn statement_from(
    module: &PythonModule<'_>,
    stmt: Node<'_>,
) -> ImportStatement
{
    let mut cursor = stmt.walk();

    let bound_names = stmt
        .children_by_field_name("name", &mut cursor)
        .filter_map(|n| bound_name(module, n))
        .collect();

    let mut cursor = stmt.walk();
    let wildcard = stmt
        .named_children(&mut cursor)
        .any(|n| n.kind() == "wildcard_import");

    ImportStatement { line_number: stmt.start_position().row + 1, bound_names, wildcard }
}

/// Name bound by one import target: the alias, else the first dotted segment.
fn bound_name(
    module: &PythonModule<'_>,
    target: Node<'_>,
) -> Option<String>
{
    match target.kind()
    {
        "aliased_import" =>
        {
            let alias = target.child_by_field_name("alias")?;
            Some(module.text(alias).to_string())
        }
        "dotted_name" =>
        {
            let path = module.text(target);
            path.split('.')
                .next()
                .map(|s| s.trim().to_string())
        }
        _ => None,
    }
}
