//! Filepath: src/core/filter.rs
//! Directive policy: which imported names belong in `__all__`.
//!
//! Decision per name, first match wins:
//!   1. statement line carries `awl:ignore` → drop the whole statement;
//!   2. private (`_` prefix) → keep only under include-private
//!      (file or line);
//!   3. public → drop under exclude-public (file or line).
//!
//! The result is a sorted, deduplicated list so the emitted declaration
//! is the same no matter how the imports are ordered.

use std::collections::BTreeSet;

use crate::core::{
    directives::{ControlFlags, Directive},
    imports::ImportStatement,
};

/// Private by convention: leading underscore.
pub fn is_private(name: &str) -> bool
{
    name.starts_with('_')
}

/// Apply `flags` to `statements` and return the exported names,
/// sorted by code point.
pub fn filter(
    statements: &[ImportStatement],
    flags: &ControlFlags,
) -> Vec<String>
{
    let file = flags.file;
    let mut names = BTreeSet::new();

    for stmt in statements
    {
        let local = flags.at_line(stmt.line_number);

        if local.contains(Directive::Ignore)
        {
            continue;
        }

        let allow_private = file.include_private || local.contains(Directive::IncludePrivate);
        let drop_public = file.exclude_public || local.contains(Directive::ExcludePublic);

        for name in &stmt.bound_names
        {
            let keep = if is_private(name) { allow_private } else { !drop_public };
            if keep
            {
                names.insert(name.as_str());
            }
        }
    }

    names
        .into_iter()
        .map(str::to_string)
        .collect()
}
