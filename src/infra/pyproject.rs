//! Source-root discovery from `pyproject.toml`.
//!
//! Roots come from `[tool.hatch.build] includes` (or hatch's own
//! spelling, `include`). Each pattern contributes its leading non-glob
//! components: `"src/pkg/**"` → `src/pkg`. Without any include, a `src/`
//! directory next to the pyproject is used when present.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

/// Build-config file looked up in batch mode.
pub const PYPROJECT: &str = "pyproject.toml";

#[derive(Debug, Default, Deserialize)]
struct PyProject
{
    #[serde(default)]
    tool: Tool,
}

#[derive(Debug, Default, Deserialize)]
struct Tool
{
    #[serde(default)]
    hatch: Hatch,
}

#[derive(Debug, Default, Deserialize)]
struct Hatch
{
    #[serde(default)]
    build: HatchBuild,
}

#[derive(Debug, Default, Deserialize)]
struct HatchBuild
{
    #[serde(default, alias = "include")]
    includes: Vec<String>,
}

/// Directories to search for `__init__.py`, resolved against the
/// directory holding `pyproject_path`. Sorted and deduplicated.
pub fn source_roots(pyproject_path: &Path) -> Result<Vec<PathBuf>>
{
    let text = std::fs::read_to_string(pyproject_path)
        .with_context(|| format!("Failed to read {}", pyproject_path.display()))?;
    let project: PyProject = toml::from_str(&text)
        .with_context(|| format!("Failed to parse {}", pyproject_path.display()))?;

    let base = pyproject_path
        .parent()
        .unwrap_or_else(|| Path::new("."));

    let mut roots: BTreeSet<PathBuf> = project
        .tool
        .hatch
        .build
        .includes
        .iter()
        .filter_map(|pattern| include_root(pattern))
        .map(|rel| base.join(rel))
        .collect();

    if roots.is_empty()
    {
        let src = base.join("src");
        if src.is_dir()
        {
            roots.insert(src);
        }
    }

    debug!(pyproject = %pyproject_path.display(), ?roots, "resolved source roots");
    Ok(roots.into_iter().collect())
}

/// Leading literal part of an include pattern, or `None` when the
/// pattern starts with a glob.
fn include_root(pattern: &str) -> Option<PathBuf>
{
    let root: PathBuf = pattern
        .trim_start_matches('/')
        .split('/')
        .take_while(|part| !part.contains(['*', '?', '[', '{']))
        .filter(|part| !part.is_empty() && *part != ".")
        .collect();

    (!root.as_os_str().is_empty()).then_some(root)
}
