// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use bytes::Bytes;

/// A key and its opaque value, the unit of storage.
///
/// Values are held as [`Bytes`], so cloning an entry never copies the payload.
///
/// # Examples
///
/// ```
/// use storage_backend::Entry;
///
/// let entry = Entry::new("config/feature", "enabled");
/// assert_eq!(entry.key(), "config/feature");
/// assert_eq!(entry.value().as_ref(), b"enabled");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Entry {
    key: String,
    value: Bytes,
}

impl Entry {
    /// Creates a new entry.
    ///
    /// # Examples
    ///
    /// ```
    /// use bytes::Bytes;
    /// use storage_backend::Entry;
    ///
    /// let entry = Entry::new("key", Bytes::from_static(b"value"));
    /// assert_eq!(entry.value(), &Bytes::from_static(b"value"));
    /// ```
    pub fn new(key: impl Into<String>, value: impl Into<Bytes>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Returns the key of this entry.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the value of this entry.
    #[must_use]
    pub fn value(&self) -> &Bytes {
        &self.value
    }

    /// Consumes the entry and returns its key and value.
    #[must_use]
    pub fn into_parts(self) -> (String, Bytes) {
        (self.key, self.value)
    }
}
