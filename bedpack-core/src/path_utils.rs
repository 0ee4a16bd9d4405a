//! Cross-platform path helpers
//!
//! The synchronizer has to reason about paths from two worlds at once when
//! running under WSL: Linux paths (`/mnt/c/...`) and Windows paths (`C:\...`).

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

/// Does this Linux path sit on a WSL drive mount (`/mnt/<letter>/...`)?
pub fn looks_like_wsl_mount(path: &Path) -> bool {
    static MOUNT: OnceLock<Regex> = OnceLock::new();
    let re = MOUNT.get_or_init(|| Regex::new(r"(?i)^/mnt/[a-z]/").unwrap());
    re.is_match(&path.to_string_lossy())
}

/// Does this string start with a Windows drive letter (`C:`)?
pub fn is_windows_drive_path(path: &str) -> bool {
    static DRIVE: OnceLock<Regex> = OnceLock::new();
    let re = DRIVE.get_or_init(|| Regex::new(r"^[a-zA-Z]:").unwrap());
    re.is_match(path)
}

/// Render a directory path with exactly one trailing `/`.
///
/// rsync copies the *contents* of `src/` but the directory itself for `src`.
pub fn with_trailing_slash(path: &Path) -> String {
    let s = path.to_string_lossy();
    if s.ends_with('/') {
        s.into_owned()
    } else {
        format!("{}/", s)
    }
}

/// Resolve `path` against `root` unless it is already absolute
pub fn resolve_against(root: &Path, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
