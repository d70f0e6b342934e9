// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Mapping between storage keys and filesystem paths.

use std::path::{Path, PathBuf};

use storage_backend::{Error, Result};

/// Prefix that marks a file as an entry rather than a directory.
pub(crate) const ENTRY_FILE_PREFIX: char = '_';

fn validate_segments<'a>(what: &str, value: &'a str) -> Result<Vec<&'a str>> {
    let segments: Vec<&str> = value.split('/').collect();
    if segments.iter().any(|s| s.is_empty() || *s == "." || *s == "..") {
        return Err(Error::backend(format!("invalid {what} {value:?}: empty, '.' or '..' segment")));
    }
    Ok(segments)
}

/// Returns the file that stores `key` below `root`.
pub(crate) fn entry_path(root: &Path, key: &str) -> Result<PathBuf> {
    let segments = validate_segments("key", key)?;
    let (name, dirs) = segments
        .split_last()
        .ok_or_else(|| Error::backend("invalid key: empty"))?;

    let mut path = dirs.iter().fold(root.to_path_buf(), |path, dir| path.join(dir));
    path.push(format!("{ENTRY_FILE_PREFIX}{name}"));
    Ok(path)
}

/// Returns the directory whose children are listed for `prefix`.
///
/// A single trailing `/` is accepted, so `"a/b"` and `"a/b/"` name the same
/// directory. The empty prefix is the root itself.
pub(crate) fn prefix_dir(root: &Path, prefix: &str) -> Result<PathBuf> {
    let trimmed = prefix.strip_suffix('/').unwrap_or(prefix);
    if trimmed.is_empty() {
        return Ok(root.to_path_buf());
    }

    let segments = validate_segments("prefix", trimmed)?;
    Ok(segments.iter().fold(root.to_path_buf(), |path, dir| path.join(dir)))
}

/// Converts a directory entry name back into a list child name.
///
/// Directories list as `"name/"` and entry files as their key segment. Files
/// without the entry prefix are not ours and are skipped.
pub(crate) fn child_name(file_name: &str, is_dir: bool) -> Option<String> {
    if is_dir {
        return Some(format!("{file_name}/"));
    }
    file_name
        .strip_prefix(ENTRY_FILE_PREFIX)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
}
