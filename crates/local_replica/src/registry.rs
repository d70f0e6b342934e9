// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Selection of the remote backend by type tag.

use std::{collections::HashMap, fmt, sync::Arc};

use ohno::EnrichableExt;
use storage_backend::{BackendExt, DynamicBackend, Error, ErrorKind, Result};
use storage_backend_memory::InMemoryBackend;

use crate::config::ReplicaConfig;

/// Builds a remote backend from its configuration keys.
///
/// Factories report their own failures, by convention with
/// [`ErrorKind::BackendConstruction`].
pub type BackendFactory = Arc<dyn Fn(HashMap<String, String>) -> Result<DynamicBackend> + Send + Sync>;

/// Maps backend type tags to the factories that build them.
///
/// [`BackendRegistry::default()`] knows `inmem` and, with the `file` feature,
/// `file`. Network backends are added by the application with
/// [`register`](Self::register).
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
///
/// use local_replica::BackendRegistry;
/// use storage_backend::{BackendExt, Error, ErrorKind};
/// use storage_backend_memory::InMemoryBackend;
///
/// let mut registry = BackendRegistry::default();
/// registry.register("etcd", |config| {
///     let endpoint = config.get("address").ok_or_else(|| Error::missing_config("address"))?;
///     // A real factory would connect to `endpoint` here.
///     let _ = endpoint;
///     Ok(InMemoryBackend::new().into_dynamic())
/// });
///
/// let config = HashMap::from([
///     ("storage_type".to_string(), "etcd".to_string()),
///     ("address".to_string(), "127.0.0.1:2379".to_string()),
/// ]);
/// let (_remote, local) = registry.construct(config)?;
/// assert!(local.is_empty());
///
/// let unknown = HashMap::from([("storage_type".to_string(), "consul".to_string())]);
/// assert_eq!(registry.construct(unknown).unwrap_err().kind(), ErrorKind::UnsupportedBackend);
/// # Ok::<(), storage_backend::Error>(())
/// ```
#[derive(Clone)]
pub struct BackendRegistry {
    factories: HashMap<String, BackendFactory>,
}

impl BackendRegistry {
    /// Creates a registry with no backend types.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registers `factory` under `storage_type`, replacing any earlier registration.
    pub fn register<F>(&mut self, storage_type: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(HashMap<String, String>) -> Result<DynamicBackend> + Send + Sync + 'static,
    {
        self.factories.insert(storage_type.into(), Arc::new(factory));
        self
    }

    /// Returns `true` if `storage_type` has a factory.
    #[must_use]
    pub fn is_supported(&self, storage_type: &str) -> bool {
        self.factories.contains_key(storage_type)
    }

    /// Returns the registered type tags in sorted order.
    #[must_use]
    pub fn supported_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }

    /// Builds the remote backend of type `storage_type` from its own configuration keys.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::UnsupportedBackend`] for an unknown type; factory
    /// errors are returned unchanged.
    pub fn create(&self, storage_type: &str, backend_config: HashMap<String, String>) -> Result<DynamicBackend> {
        let factory = self.factories.get(storage_type).ok_or_else(|| {
            Error::from_kind(ErrorKind::UnsupportedBackend).enrich(format!(
                "unsupported storage type {storage_type:?}, expected one of {:?}",
                self.supported_types()
            ))
        })?;
        factory(backend_config)
    }

    /// Builds the remote backend named by `storage_type` in `config`, and a
    /// fresh in-memory local store.
    ///
    /// `storage_type` and `cache_lifetime` are removed from the map; the rest
    /// is handed to the factory.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::MissingConfig`] if `storage_type` is absent.
    /// - [`ErrorKind::InvalidConfig`] if `cache_lifetime` does not parse.
    /// - [`ErrorKind::UnsupportedBackend`] if no factory is registered for the type.
    /// - whatever the factory returns.
    pub fn construct(&self, config: HashMap<String, String>) -> Result<(DynamicBackend, InMemoryBackend)> {
        self.construct_from(ReplicaConfig::from_map(config)?)
    }

    pub(crate) fn construct_from(&self, config: ReplicaConfig) -> Result<(DynamicBackend, InMemoryBackend)> {
        let (storage_type, backend_config) = config.into_parts();
        let remote = self.create(&storage_type, backend_config)?;
        Ok((remote, InMemoryBackend::new()))
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("inmem", |_| Ok(InMemoryBackend::new().into_dynamic()));

        #[cfg(feature = "file")]
        registry.register("file", |config| {
            Ok(storage_backend_file::FileBackend::from_config(&config)?.into_dynamic())
        });

        registry
    }
}

impl fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendRegistry")
            .field("supported_types", &self.supported_types())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_supports_builtin_types() {
        let registry = BackendRegistry::default();
        assert!(registry.is_supported("inmem"));
        #[cfg(feature = "file")]
        assert_eq!(registry.supported_types(), vec!["file", "inmem"]);
    }

    #[test]
    fn empty_registry_supports_nothing() {
        let registry = BackendRegistry::empty();
        assert!(registry.supported_types().is_empty());
        let error = registry.create("inmem", HashMap::new()).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::UnsupportedBackend);
    }

    #[test]
    fn unsupported_error_names_requested_type() {
        let registry = BackendRegistry::default();
        let error = registry.create("dynamodb", HashMap::new()).unwrap_err();
        assert!(error.to_string().contains("\"dynamodb\""), "got: {error}");
    }

    #[test]
    fn register_replaces_existing_factory() {
        let mut registry = BackendRegistry::empty();
        registry
            .register("custom", |_| Err(Error::construction("first")))
            .register("custom", |_| Ok(InMemoryBackend::new().into_dynamic()));

        assert_eq!(registry.supported_types(), vec!["custom"]);
        registry.create("custom", HashMap::new()).unwrap();
    }

    #[test]
    fn debug_lists_types() {
        let registry = BackendRegistry::default();
        assert!(format!("{registry:?}").contains("inmem"));
    }
}
