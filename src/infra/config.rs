use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::declaration::DEFAULT_MAX_WIDTH;

/// Config file names, in priority order. The first one found wins.
const CONFIG_FILES: [&str; 4] = ["awl.toml", ".awl.toml", "awl.yaml", "awl.json"];

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config
{
    /// Longest single-line `__all__` before it is wrapped
    pub max_width: usize,

    /// Extra glob patterns skipped while discovering `__init__.py` files
    /// (in addition to .gitignore), relative to each source root
    pub ignore_patterns: Vec<String>,

    /// Descend into dot-directories during discovery
    pub include_hidden: bool,
}

impl Default for Config
{
    fn default() -> Self
    {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            ignore_patterns: vec![
                "**/__pycache__".to_string(),
                "**/.venv".to_string(),
                "**/node_modules".to_string(),
                "**/build".to_string(),
                "**/dist".to_string(),
            ],
            include_hidden: true,
        }
    }
}

/// Load configuration from the current directory and `AWL_*` env vars.
pub fn load_config() -> Result<Config>
{
    load_config_from(Path::new("."))
}

/// Load configuration from `dir` and `AWL_*` env vars.
/// Env vars use `__` for nesting, e.g. `AWL_MAX_WIDTH=100`.
pub fn load_config_from(dir: &Path) -> Result<Config>
{
    let mut builder = config::Config::builder();

    for name in CONFIG_FILES
    {
        let path = dir.join(name);
        if path.is_file()
        {
            builder = builder.add_source(config::File::from(path));
            break;
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("AWL")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("ignore_patterns"),
    );

    let cfg = builder
        .build()
        .context("Failed to load configuration")?;
    let parsed: Config = cfg
        .try_deserialize()
        .context("Failed to parse configuration")?;

    Ok(parsed)
}
