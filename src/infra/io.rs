//! Whole-file I/O for the sync pipeline.
//!
//! Discipline: read the entire file, compute, then replace the entire
//! file atomically. No partial writes.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::trace;

/// Read a source file as UTF-8.
pub fn read_source(path: &Path) -> io::Result<String> {
    let text = fs::read_to_string(path)?;
    trace!(path = %path.display(), bytes = text.len(), "read source");
    Ok(text)
}

/// Atomic write with robust temp file strategy
pub fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    // Same-dir tempfile keeps the final rename on one filesystem
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    // Preserve original permissions
    let perms = fs::metadata(path).map(|m| m.permissions()).ok();

    let mut tmp = match NamedTempFile::new_in(dir) {
        Ok(t) => t,
        Err(_) => NamedTempFile::new()?, // fallback to /tmp
    };

    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;

    if let Some(perms) = perms {
        fs::set_permissions(tmp.path(), perms)?;
    }

    // Atomically replace the destination
    match tmp.persist(path) {
        Ok(_) => {}
        Err(e) => {
            // Different filesystem? Fall back to a plain copy
            fs::copy(e.file.path(), path)?;
        }
    }

    // fsync parent dir to ensure durability on Unix
    #[cfg(unix)]
    {
        if let Ok(parent) = fs::File::open(dir) {
            let _ = parent.sync_all();
        }
    }

    trace!(path = %path.display(), bytes = data.len(), "wrote file");
    Ok(())
}

/// Copy `reader` into a scratch file that is removed when dropped.
pub fn capture_to_tempfile<R: Read>(mut reader: R) -> io::Result<NamedTempFile> {
    let mut tmp = NamedTempFile::new()?;
    let copied = io::copy(&mut reader, &mut tmp)?;
    tmp.flush()?;
    trace!(bytes = copied, path = %tmp.path().display(), "captured input");
    Ok(tmp)
}

/// Capture stdin into a scratch file.
pub fn capture_stdin() -> io::Result<NamedTempFile> {
    capture_to_tempfile(io::stdin().lock())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_atomic_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("__init__.py");
        fs::write(&file, "old\n").unwrap();

        write_atomic(&file, b"new\n").unwrap();

        assert_eq!(read_source(&file).unwrap(), "new\n");
        // No stray temp files left behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn write_atomic_keeps_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("mod.py");
        fs::write(&file, "x = 1\n").unwrap();
        fs::set_permissions(&file, fs::Permissions::from_mode(0o640)).unwrap();

        write_atomic(&file, b"x = 2\n").unwrap();

        let mode = fs::metadata(&file).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[test]
    fn capture_copies_everything() {
        let data = "from .a import b\n".repeat(1000);
        let tmp = capture_to_tempfile(data.as_bytes()).unwrap();

        assert_eq!(read_source(tmp.path()).unwrap(), data);
    }

    #[test]
    fn captured_file_is_removed_on_drop() {
        let tmp = capture_to_tempfile("x".as_bytes()).unwrap();
        let path = tmp.path().to_path_buf();
        drop(tmp);
        assert!(!path.exists());
    }
}
