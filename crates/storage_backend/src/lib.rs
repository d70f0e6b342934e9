// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! The key-value storage contract for local replica backends.
//!
//! This crate defines the [`Backend`] trait that every store must satisfy, along
//! with [`Entry`] for the stored key/value pairs and [`Error`] for fallible
//! operations.
//!
//! # Overview
//!
//! A backend stores opaque byte values under string keys and supports four
//! operations: `put`, `get`, `delete` and `list`. Remote durable stores, the
//! in-memory local store and the caching replica in front of them all speak this
//! same contract, so any of them can stand in for another.
//!
//! # Implementing a Backend
//!
//! ```
//! use std::collections::BTreeMap;
//! use std::sync::RwLock;
//!
//! use storage_backend::{Backend, Entry, Error};
//!
//! struct SimpleBackend(RwLock<BTreeMap<String, Entry>>);
//!
//! impl Backend for SimpleBackend {
//!     async fn put(&self, entry: Entry) -> Result<(), Error> {
//!         self.0.write().unwrap().insert(entry.key().to_owned(), entry);
//!         Ok(())
//!     }
//!
//!     async fn get(&self, key: &str) -> Result<Option<Entry>, Error> {
//!         Ok(self.0.read().unwrap().get(key).cloned())
//!     }
//!
//!     async fn delete(&self, key: &str) -> Result<(), Error> {
//!         self.0.write().unwrap().remove(key);
//!         Ok(())
//!     }
//!
//!     async fn list(&self, prefix: &str) -> Result<Vec<String>, Error> {
//!         let keys = self.0.read().unwrap().keys().cloned().collect::<Vec<_>>();
//!         Ok(storage_backend::list_children(prefix, keys.iter().map(String::as_str)))
//!     }
//! }
//! ```
//!
//! # Dynamic Dispatch
//!
//! Enable the `dynamic-backend` feature for [`DynamicBackend`], which wraps any
//! `Backend` in a clonable, type-erased container. Registries that pick a backend
//! by name at runtime hand these out.

mod entry;
pub mod error;
mod listing;
#[cfg(any(feature = "test-util", test))]
pub mod testing;
pub(crate) mod backend;

#[cfg(any(test, feature = "dynamic-backend"))]
mod dynamic;

#[doc(inline)]
pub use backend::Backend;
#[cfg(any(test, feature = "dynamic-backend"))]
#[doc(inline)]
pub use dynamic::{BackendExt, DynamicBackend};
#[doc(inline)]
pub use entry::Entry;
#[doc(inline)]
pub use error::{Error, ErrorKind, Result};
#[doc(inline)]
pub use listing::list_children;
