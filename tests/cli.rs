// End-to-end runs of the `awl` binary against throwaway package trees.
use assert_fs::prelude::*;
use predicates::prelude::*;
use serde_json::Value;

mod util;
use util::{awl, hatch_project, single_package};

#[test]
fn single_file_gets_declaration_then_is_stable()
{
    let tmp = single_package("from .foo import bar\nimport os.path\n");

    awl(&tmp)
        .arg("pkg/__init__.py")
        .assert()
        .success()
        .stdout(predicate::str::contains("➕ Added __all__ to pkg/__init__.py"));

    tmp.child("pkg/__init__.py")
        .assert("from .foo import bar\nimport os.path\n__all__ = [\"bar\", \"os\"]\n");

    awl(&tmp)
        .arg("pkg/__init__.py")
        .assert()
        .success()
        .stdout(predicate::str::contains("✅ pkg/__init__.py is up to date"));
}

#[test]
fn existing_declaration_is_updated_in_place()
{
    let tmp = single_package("\"\"\"Pkg.\"\"\"\nfrom .a import b\n__all__ = [\n    'zzz',\n]\nVERSION = '1'\n");

    awl(&tmp)
        .arg("pkg/__init__.py")
        .assert()
        .success()
        .stdout(predicate::str::contains("🔁 Updated __all__ in pkg/__init__.py"));

    tmp.child("pkg/__init__.py")
        .assert("\"\"\"Pkg.\"\"\"\nfrom .a import b\n__all__ = [\"b\"]\nVERSION = '1'\n");
}

#[test]
fn dry_run_with_diff_writes_nothing()
{
    let tmp = single_package("from .foo import bar\n");

    awl(&tmp)
        .args(["pkg/__init__.py", "--dry-run", "--diff"])
        .assert()
        .success()
        .stdout(predicate::str::contains("+__all__ = [\"bar\"]"))
        .stdout(predicate::str::contains("📝 Dry run: no changes written to pkg/__init__.py"));

    tmp.child("pkg/__init__.py")
        .assert("from .foo import bar\n");
}

#[test]
fn dry_run_preview_uses_the_wrap_width()
{
    let tmp = single_package("from .a import alpha, beta\n");

    awl(&tmp)
        .args(["--dry-run", "--max-width", "10", "pkg/__init__.py"])
        .assert()
        .success()
        .stdout(predicate::str::contains("__all__ = [\n    \"alpha\",\n    \"beta\",\n]"));
}

#[test]
fn typed_declaration_syncs_in_place()
{
    let body = "from .a import b\n__all__: list[str]\n__all__ = [\"b\"]\n";
    let tmp = single_package(body);

    awl(&tmp)
        .arg("pkg/__init__.py")
        .assert()
        .success()
        .stdout(predicate::str::contains("✅ pkg/__init__.py is up to date"));

    tmp.child("pkg/__init__.py")
        .assert(body);
}

#[test]
fn verbose_shows_old_and_new()
{
    let tmp = single_package("from .foo import bar\n__all__ = get()\n");

    awl(&tmp)
        .args(["-V", "--dry-run", "pkg/__init__.py"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Old __all__: unavailable"))
        .stdout(predicate::str::contains("New __all__: [\"bar\"]"));
}

#[test]
fn missing_input_fails()
{
    let tmp = assert_fs::TempDir::new().unwrap();

    awl(&tmp)
        .arg("nope.py")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: Input file does not exist: nope.py"));
}

#[test]
fn input_flag_wins_with_warning()
{
    let tmp = single_package("from .foo import bar\n");
    tmp.child("other.py")
        .write_str("from .x import y\n")
        .unwrap();

    awl(&tmp)
        .args(["other.py", "-i", "pkg/__init__.py"])
        .assert()
        .success()
        .stderr(predicate::str::contains("using --input"));

    tmp.child("other.py")
        .assert("from .x import y\n");
    tmp.child("pkg/__init__.py")
        .assert(predicate::str::contains("__all__ = [\"bar\"]"));
}

#[test]
fn stdin_round_trip()
{
    let tmp = assert_fs::TempDir::new().unwrap();

    awl(&tmp)
        .arg("-")
        .write_stdin("from .foo import bar\n")
        .assert()
        .success()
        .stdout("from .foo import bar\n__all__ = [\"bar\"]\n")
        .stderr(predicate::str::contains("➕ Added __all__ to <stdin>"));
}

#[test]
fn wildcard_and_ignore_are_skipped()
{
    let tmp = single_package("from .foo import *\n");
    tmp.child("ign/__init__.py")
        .write_str("# awl:ignore\nfrom .foo import bar\n")
        .unwrap();

    awl(&tmp)
        .arg("pkg/__init__.py")
        .assert()
        .success()
        .stdout(predicate::str::contains("⚠️  Skipped pkg/__init__.py (Wildcard import)"));

    awl(&tmp)
        .arg("ign/__init__.py")
        .assert()
        .success()
        .stdout(predicate::str::contains("🚫 Skipped ign/__init__.py (file ignored by directive)"));

    tmp.child("ign/__init__.py")
        .assert("# awl:ignore\nfrom .foo import bar\n");
}

#[test]
fn line_directives_steer_names()
{
    // Directives inside the first five lines would apply file-wide
    let tmp = single_package(
        "\"\"\"Package.\n\nLong description.\n\"\"\"\n\n\
         from .a import _private  # awl:include-private\n\
         from .b import Public  # awl:exclude-public\n\
         from .c import skipped  # awl:ignore\n\
         from .d import kept\n",
    );

    awl(&tmp)
        .arg("pkg/__init__.py")
        .assert()
        .success();

    tmp.child("pkg/__init__.py")
        .assert(predicate::str::ends_with("__all__ = [\"_private\", \"kept\"]\n"));
}

#[test]
fn conflicting_declarations_fail_without_writing()
{
    let body = "from .a import b\n__all__ = []\n__all__ = ['b']\n";
    let tmp = single_package(body);

    awl(&tmp)
        .arg("pkg/__init__.py")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("❌ pkg/__init__.py: Multiple __all__ assignments"));

    tmp.child("pkg/__init__.py")
        .assert(body);
}

#[test]
fn syntax_error_is_a_diagnostic()
{
    let body = "from .a import b\ndef broken(:\n";
    let tmp = single_package(body);

    awl(&tmp)
        .arg("pkg/__init__.py")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid Python syntax"));

    tmp.child("pkg/__init__.py")
        .assert(body);
}

#[test]
fn max_width_flag_and_config_wrap()
{
    let tmp = single_package("from .a import alpha, beta\n");

    awl(&tmp)
        .args(["--max-width", "10", "pkg/__init__.py"])
        .assert()
        .success();
    tmp.child("pkg/__init__.py")
        .assert("from .a import alpha, beta\n__all__ = [\n    \"alpha\",\n    \"beta\",\n]\n");

    let tmp = single_package("from .a import alpha, beta\n");
    tmp.child("awl.toml")
        .write_str("max_width = 10\n")
        .unwrap();

    awl(&tmp)
        .arg("pkg/__init__.py")
        .assert()
        .success();
    tmp.child("pkg/__init__.py")
        .assert(predicate::str::contains("    \"alpha\",\n"));
}

#[test]
fn batch_follows_pyproject()
{
    let tmp = hatch_project();

    let out = awl(&tmp)
        .arg("--json")
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let reports: Vec<Value> = String::from_utf8(out.stdout)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    let summary: Vec<(String, String)> = reports
        .iter()
        .map(|r| {
            let file = r["file"].as_str().unwrap().replace('\\', "/");
            let rel = file
                .split("/src/")
                .last()
                .unwrap()
                .to_string();
            (rel, r["status"].as_str().unwrap().to_string())
        })
        .collect();

    assert_eq!(
        summary,
        vec![
            ("alpha/__init__.py".to_string(), "unchanged".to_string()),
            ("alpha/sub/__init__.py".to_string(), "changed".to_string()),
            ("beta/__init__.py".to_string(), "skip".to_string()),
        ]
    );
    assert_eq!(reports[1]["action"], "added");
    assert_eq!(reports[1]["new_all"], serde_json::json!(["run"]));
    assert_eq!(reports[2]["reason"], "wildcard");

    tmp.child("src/alpha/sub/__init__.py")
        .assert("from .impl import run, _helper\n__all__ = [\"run\"]\n");
    tmp.child("src/gamma/__init__.py")
        .assert("import os\n");
    tmp.child("src/beta/__pycache__/__init__.py")
        .assert("import os\n");
}

#[test]
fn batch_without_pyproject_fails()
{
    let tmp = assert_fs::TempDir::new().unwrap();

    awl(&tmp)
        .arg("--json")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"reason\":\"no-pyproject\""));
}

#[test]
fn quiet_hides_successes()
{
    let tmp = single_package("from .foo import bar\n");

    awl(&tmp)
        .args(["-q", "pkg/__init__.py"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn lowercase_v_prints_version()
{
    let tmp = assert_fs::TempDir::new().unwrap();

    awl(&tmp)
        .arg("-v")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn completions_for_bash()
{
    let tmp = assert_fs::TempDir::new().unwrap();

    awl(&tmp)
        .args(["--completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_awl"));
}
