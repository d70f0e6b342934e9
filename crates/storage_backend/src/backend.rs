// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The core trait for key-value storage backends.
//!
//! [`Backend`] is the contract shared by remote durable stores, the in-memory
//! local store, and the caching replica that composes the two.

use crate::{Entry, Error};

/// Trait for key-value storage backends.
///
/// All four methods are required. Implementations are expected to be safe for
/// concurrent use from many callers; the trait takes `&self` everywhere and the
/// returned futures must be `Send`.
///
/// # Contract
///
/// - `get` returns `Ok(None)` for a key that is not stored. Absence is never an error.
/// - `delete` of a key that is not stored succeeds.
/// - `list` returns the names directly beneath `prefix`, relative to it and sorted.
///   Keys nested deeper collapse into a single `"child/"` name. [`list_children`]
///   implements these rules for backends that can enumerate their keys.
///
/// [`list_children`]: crate::list_children
#[cfg_attr(
    any(test, feature = "dynamic-backend"),
    dynosaur::dynosaur(pub(crate) DynBackend = dyn(box) Backend, bridge(none))
)]
pub trait Backend: Send + Sync {
    /// Stores an entry, overwriting any previous value for its key.
    fn put(&self, entry: Entry) -> impl Future<Output = Result<(), Error>> + Send;

    /// Retrieves the entry stored under `key`, if any.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<Entry>, Error>> + Send;

    /// Removes the entry stored under `key`.
    fn delete(&self, key: &str) -> impl Future<Output = Result<(), Error>> + Send;

    /// Lists the names stored directly beneath `prefix`.
    fn list(&self, prefix: &str) -> impl Future<Output = Result<Vec<String>, Error>> + Send;
}
