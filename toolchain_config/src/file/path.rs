//! Path comparison helpers used when deciding whether a resolution runs at
//! the project root.

use std::path::{Path, PathBuf};

use camino::Utf8Path;

/// Canonicalise `p` using platform-specific rules.
///
/// On Windows the [`dunce`](https://docs.rs/dunce/latest/dunce/) crate is used
/// to avoid introducing UNC prefixes.
///
/// # Errors
///
/// Returns the underlying I/O error if canonicalisation fails.
pub(crate) fn canonicalise(p: &Path) -> std::io::Result<PathBuf> {
    #[cfg(windows)]
    {
        dunce::canonicalize(p)
    }
    #[cfg(not(windows))]
    {
        std::fs::canonicalize(p)
    }
}

/// Normalise a canonical path for comparison on case-insensitive
/// filesystems.
///
/// Windows folds ASCII only; macOS folds full Unicode case. Elsewhere the path
/// is returned unchanged.
fn normalise_key(path: &Path) -> PathBuf {
    #[cfg(windows)]
    {
        use std::ffi::OsString;
        use std::os::windows::ffi::{OsStrExt, OsStringExt};

        let lowered: Vec<u16> = path
            .as_os_str()
            .encode_wide()
            .map(|unit| {
                if (u16::from(b'A')..=u16::from(b'Z')).contains(&unit) {
                    unit + 32
                } else {
                    unit
                }
            })
            .collect();
        PathBuf::from(OsString::from_wide(&lowered))
    }

    #[cfg(target_os = "macos")]
    {
        path.to_str()
            .map_or_else(|| path.to_path_buf(), |text| PathBuf::from(text.to_lowercase()))
    }

    #[cfg(not(any(windows, target_os = "macos")))]
    {
        path.to_path_buf()
    }
}

/// Returns `true` when `a` and `b` name the same directory.
///
/// Both paths are canonicalised when possible so symlinks and `..` segments
/// do not cause spurious mismatches; paths that cannot be canonicalised are
/// compared as given.
#[must_use]
pub(crate) fn same_location(a: &Utf8Path, b: &Utf8Path) -> bool {
    let key = |p: &Utf8Path| {
        let resolved = canonicalise(p.as_std_path()).unwrap_or_else(|_| p.as_std_path().to_path_buf());
        normalise_key(&resolved)
    };
    key(a) == key(b)
}
