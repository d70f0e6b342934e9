// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::BTreeSet;

/// Collapses a set of keys into the names directly beneath `prefix`.
///
/// Keys that do not start with `prefix` are skipped. For the rest, the prefix is
/// stripped; a remainder without `/` is returned as is, otherwise only its first
/// segment is returned, with a trailing `/`. The result is sorted and free of
/// duplicates.
///
/// # Examples
///
/// ```
/// use storage_backend::list_children;
///
/// let keys = ["app/a", "app/b/c", "app/b/d", "other"];
/// assert_eq!(list_children("app/", keys), vec!["a", "b/"]);
/// assert_eq!(list_children("", keys), vec!["app/", "other"]);
/// ```
pub fn list_children<'a>(prefix: &str, keys: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    keys.into_iter()
        .filter_map(|key| key.strip_prefix(prefix))
        .filter(|rest| !rest.is_empty())
        .map(|rest| match rest.find('/') {
            Some(idx) => &rest[..=idx],
            None => rest,
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}
