// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! File-per-entry key-value backend.
//!
//! [`FileBackend`] keeps every entry in its own file below a root directory.
//! Key segments separated by `/` become directories, and the final segment
//! becomes a file whose name carries a `_` prefix so that an entry `a/b` and a
//! directory holding `a/b/c` never collide on disk:
//!
//! ```text
//! <root>/a/_b      entry "a/b"
//! <root>/a/b/_c    entry "a/b/c"
//! ```
//!
//! All I/O goes through `tokio::fs`, so the backend must be driven from a Tokio
//! runtime.
//!
//! # Configuration
//!
//! When constructed from a flat configuration map, the backend reads a single
//! key, `path`, naming the root directory. The directory is created lazily on
//! the first write.

mod backend;
mod path;

#[doc(inline)]
pub use backend::FileBackend;
