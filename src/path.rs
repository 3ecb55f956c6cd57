//! Separator-agnostic path helpers.
//!
//! INI files written on one platform routinely carry paths with the other platform's separator,
//! so both `/` and `\` are accepted everywhere and rewritten to [`MAIN_SEPARATOR`].

use std::fs;
use std::io;
use std::path::{MAIN_SEPARATOR, MAIN_SEPARATOR_STR, Path, PathBuf};

const SEPARATORS: [char; 2] = ['/', '\\'];

#[must_use]
pub fn normalize_separators(path: &str) -> String {
    path.replace(SEPARATORS, MAIN_SEPARATOR_STR)
}

/// Join path fragments, each of which may use either separator, start or end with separators, or
/// contain doubled separators.
///
/// A leading separator on the first fragment keeps the result rooted; leading separators on later
/// fragments are dropped so they never replace what came before.
pub fn combine<I, S>(fragments: I) -> PathBuf
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut path = PathBuf::new();

    for (i, fragment) in fragments.into_iter().enumerate() {
        let fragment = fragment.as_ref();

        if i == 0 && fragment.starts_with(SEPARATORS) {
            path.push(MAIN_SEPARATOR_STR);
        }

        for component in fragment.split(SEPARATORS).filter(|c| !c.is_empty()) {
            if path.as_os_str().is_empty() && component.ends_with(':') {
                // Drive prefix; without a trailing separator it would be drive-relative.
                path.push(format!("{component}{MAIN_SEPARATOR}"));
            } else {
                path.push(component);
            }
        }
    }

    path
}

/// Directory containing `path`; empty (the current directory) for bare file names.
#[must_use]
pub fn directory_of(path: &Path) -> &Path {
    path.parent().unwrap_or_else(|| Path::new(""))
}

/// Returns whether a file was actually removed.
pub fn delete_file_if_exists(path: &Path) -> io::Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}
