//! Capability-scoped file reads for adapters loaded at startup.

use std::io;
use std::path::Path;

use cap_std::{ambient_authority, fs::Dir};

/// Read the whole file at `path` through a directory capability on its
/// parent.
///
/// # Errors
///
/// Returns an I/O error when the path has no file name or the file cannot
/// be opened or read.
pub fn read_file(path: &Path) -> io::Result<Vec<u8>> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "path must name a file")
    })?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.read(Path::new(file_name))
}
