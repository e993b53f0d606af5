//! Shared filesystem helpers for override loading.

use std::io;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};

/// Read `name` inside `dir` through `cap-std`.
///
/// Returns `Ok(None)` when either the directory or the file does not exist.
///
/// # Errors
///
/// Returns any other I/O error raised while opening or reading.
pub(crate) fn read_optional(dir: &Utf8Path, name: &str) -> io::Result<Option<String>> {
    let handle = match Dir::open_ambient_dir(dir, ambient_authority()) {
        Ok(handle) => handle,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err),
    };
    match handle.read_to_string(name) {
        Ok(data) => Ok(Some(data)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}
