// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Dynamic backend wrapper for type erasure.

use std::{fmt::Debug, sync::Arc};

use crate::{Backend, Entry, Error, backend::DynBackend};

/// Extension trait for converting any `Backend` into a `DynamicBackend`.
///
/// This trait is automatically implemented for all types that implement `Backend`.
///
/// # Examples
///
/// ```
/// use storage_backend::{Backend, BackendExt, DynamicBackend};
///
/// fn erase<B>(backend: B) -> DynamicBackend
/// where
///     B: Backend + 'static,
/// {
///     backend.into_dynamic()
/// }
/// ```
pub trait BackendExt: Sized {
    /// Converts this backend into a `DynamicBackend`.
    fn into_dynamic(self) -> DynamicBackend;
}

impl<B> BackendExt for B
where
    B: Backend + 'static,
{
    fn into_dynamic(self) -> DynamicBackend {
        DynamicBackend::new(self)
    }
}

/// A clonable backend with type erasure.
///
/// `DynamicBackend` wraps a trait object in an `Arc`, so clones share the same
/// underlying store. Backend registries return this type so that backends chosen
/// by name at runtime have a single concrete type.
pub struct DynamicBackend(Arc<DynBackend<'static>>);

impl DynamicBackend {
    /// Creates a new dynamic backend from any `Backend` implementation.
    pub(crate) fn new<B>(backend: B) -> Self
    where
        B: Backend + 'static,
    {
        Self(DynBackend::new_arc(backend))
    }
}

impl Debug for DynamicBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicBackend").finish()
    }
}

impl Clone for DynamicBackend {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl Backend for DynamicBackend {
    async fn put(&self, entry: Entry) -> Result<(), Error> {
        self.0.put(entry).await
    }

    async fn get(&self, key: &str) -> Result<Option<Entry>, Error> {
        self.0.get(key).await
    }

    async fn delete(&self, key: &str) -> Result<(), Error> {
        self.0.delete(key).await
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, Error> {
        self.0.list(prefix).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockBackend;

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        futures::executor::block_on(f)
    }

    #[test]
    fn dynamic_backend_forwards_all_operations() {
        block_on(async {
            let mock = MockBackend::new();
            let dynamic = mock.clone().into_dynamic();

            dynamic.put(Entry::new("dir/key", "value")).await.expect("put failed");
            let entry = dynamic.get("dir/key").await.expect("get failed").expect("entry should exist");
            assert_eq!(entry.value().as_ref(), b"value");
            assert_eq!(dynamic.list("dir/").await.expect("list failed"), vec!["key"]);
            dynamic.delete("dir/key").await.expect("delete failed");

            assert!(!mock.contains_key("dir/key"));
            assert_eq!(mock.operations().len(), 4);
        });
    }

    #[test]
    fn dynamic_backend_clones_share_state() {
        block_on(async {
            let dynamic = MockBackend::new().into_dynamic();
            let clone = dynamic.clone();

            dynamic.put(Entry::new("k", "v")).await.expect("put failed");
            assert!(clone.get("k").await.expect("get failed").is_some());
        });
    }

    #[test]
    fn dynamic_backend_debug() {
        let dynamic = MockBackend::new().into_dynamic();
        assert_eq!(format!("{dynamic:?}"), "DynamicBackend");
    }
}
