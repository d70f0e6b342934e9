// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! In-memory key-value backend.
//!
//! This crate provides [`InMemoryBackend`], an ordered, concurrent map that
//! implements the [`Backend`](storage_backend::Backend) contract. The local
//! replica uses it as its fast local store; it is also registered as the
//! `inmem` remote backend type, which is handy for tests and single-process
//! setups.
//!
//! # Quick Start
//!
//! ```
//! use storage_backend::{Backend, Entry};
//! use storage_backend_memory::InMemoryBackend;
//!
//! # futures::executor::block_on(async {
//! let backend = InMemoryBackend::new();
//!
//! backend.put(Entry::new("key", "value")).await?;
//! let entry = backend.get("key").await?;
//! assert_eq!(entry.unwrap().value().as_ref(), b"value");
//! # Ok::<(), storage_backend::Error>(())
//! # }).unwrap();
//! ```

mod backend;

#[doc(inline)]
pub use backend::InMemoryBackend;
