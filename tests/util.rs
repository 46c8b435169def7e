//! Shared test utilities for integration tests
//!
//! Fixture builders for Python package trees and a preconfigured
//! `awl` command.

#![allow(dead_code)]

use assert_cmd::Command;
use assert_fs::prelude::*;

/// `awl` run inside `dir` with color off and a clean environment.
pub fn awl(dir: &assert_fs::TempDir) -> Command
{
    let mut cmd = Command::cargo_bin("awl").expect("binary");
    cmd.current_dir(dir.path())
        .arg("--no-color")
        .env_remove("RUST_LOG")
        .env_remove("AWL_MAX_WIDTH")
        .env_remove("AWL_IGNORE_PATTERNS")
        .env_remove("AWL_INCLUDE_HIDDEN");
    cmd
}

/// Temp dir holding a single package file at `pkg/__init__.py`.
pub fn single_package(body: &str) -> assert_fs::TempDir
{
    let tmp = assert_fs::TempDir::new().expect("tempdir");
    tmp.child("pkg/__init__.py")
        .write_str(body)
        .expect("write __init__.py");
    tmp
}

/// Hatch project with two included packages, one nested subpackage,
/// and a cache directory that must never be visited.
pub fn hatch_project() -> assert_fs::TempDir
{
    let tmp = assert_fs::TempDir::new().expect("tempdir");

    tmp.child("pyproject.toml")
        .write_str(
            "[project]\nname = \"demo\"\n\n\
             [tool.hatch.build]\nincludes = [\"src/alpha/**\", \"src/beta/**\"]\n",
        )
        .expect("write pyproject");

    // Up to date already
    tmp.child("src/alpha/__init__.py")
        .write_str("from .core import Engine\n\n__all__ = [\"Engine\"]\n")
        .expect("write alpha");

    // Needs a declaration
    tmp.child("src/alpha/sub/__init__.py")
        .write_str("from .impl import run, _helper\n")
        .expect("write alpha.sub");

    // Wildcard: skipped
    tmp.child("src/beta/__init__.py")
        .write_str("from .things import *\n")
        .expect("write beta");

    // Ignored by the default glob set
    tmp.child("src/beta/__pycache__/__init__.py")
        .write_str("import os\n")
        .expect("write cache");

    // Not included by pyproject
    tmp.child("src/gamma/__init__.py")
        .write_str("import os\n")
        .expect("write gamma");

    tmp
}
