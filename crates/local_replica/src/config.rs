// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Parsing of the flat replica configuration map.

use std::{collections::HashMap, time::Duration};

use jiff::SignedDuration;
use ohno::EnrichableExt;
use storage_backend::{Error, ErrorKind, Result};

/// Key selecting the remote backend type.
pub const STORAGE_TYPE_KEY: &str = "storage_type";

/// Key overriding the freshness window.
pub const CACHE_LIFETIME_KEY: &str = "cache_lifetime";

/// How long a synced key is served from the local store when no lifetime is configured.
pub const DEFAULT_CACHE_LIFETIME: Duration = Duration::from_secs(5 * 60);

/// Replica settings parsed from a flat string map.
///
/// The replica-level keys `storage_type` and `cache_lifetime` are taken out of
/// the map; everything else is kept verbatim for the remote backend's factory.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use std::time::Duration;
///
/// use local_replica::ReplicaConfig;
///
/// let config = ReplicaConfig::from_map(HashMap::from([
///     ("storage_type".to_string(), "file".to_string()),
///     ("cache_lifetime".to_string(), "90s".to_string()),
///     ("path".to_string(), "/var/lib/replica".to_string()),
/// ]))?;
///
/// assert_eq!(config.storage_type(), "file");
/// assert_eq!(config.cache_lifetime(), Duration::from_secs(90));
/// assert_eq!(config.backend_config().len(), 1);
/// # Ok::<(), storage_backend::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicaConfig {
    storage_type: String,
    cache_lifetime: Duration,
    backend: HashMap<String, String>,
}

impl ReplicaConfig {
    /// Parses the replica settings out of `config`.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::MissingConfig`] if `storage_type` is absent.
    /// - [`ErrorKind::InvalidConfig`] if `cache_lifetime` is not a positive duration.
    pub fn from_map(mut config: HashMap<String, String>) -> Result<Self> {
        let storage_type = config
            .remove(STORAGE_TYPE_KEY)
            .ok_or_else(|| Error::missing_config(STORAGE_TYPE_KEY))?;

        let cache_lifetime = config
            .remove(CACHE_LIFETIME_KEY)
            .map(|value| parse_cache_lifetime(&value))
            .transpose()?
            .unwrap_or(DEFAULT_CACHE_LIFETIME);

        Ok(Self {
            storage_type,
            cache_lifetime,
            backend: config,
        })
    }

    /// Returns the remote backend type tag.
    #[must_use]
    pub fn storage_type(&self) -> &str {
        &self.storage_type
    }

    /// Returns the freshness window.
    #[must_use]
    pub fn cache_lifetime(&self) -> Duration {
        self.cache_lifetime
    }

    /// Returns the keys meant for the remote backend.
    #[must_use]
    pub fn backend_config(&self) -> &HashMap<String, String> {
        &self.backend
    }

    pub(crate) fn into_parts(self) -> (String, HashMap<String, String>) {
        (self.storage_type, self.backend)
    }
}

/// Parses a cache lifetime such as `"PT5M"`, `"5m"` or `"90s"`.
///
/// # Errors
///
/// Returns [`ErrorKind::InvalidConfig`] if the value is not a duration or is not positive.
pub fn parse_cache_lifetime(value: &str) -> Result<Duration> {
    let invalid = |cause: Box<dyn std::error::Error + Send + Sync>| {
        Error::with_cause(ErrorKind::InvalidConfig, cause).enrich(format!("invalid {CACHE_LIFETIME_KEY} {value:?}"))
    };

    let parsed: SignedDuration = value.trim().parse().map_err(|e: jiff::Error| invalid(e.into()))?;
    if !parsed.is_positive() {
        return Err(invalid("cache lifetime must be positive".into()));
    }

    Duration::try_from(parsed).map_err(|e| invalid(e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test]
    fn storage_type_is_required() {
        let error = ReplicaConfig::from_map(map(&[("path", "/tmp")])).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::MissingConfig);
        assert!(error.to_string().contains(STORAGE_TYPE_KEY));
    }

    #[test]
    fn replica_keys_are_removed_from_backend_config() {
        let config = ReplicaConfig::from_map(map(&[
            ("storage_type", "inmem"),
            ("cache_lifetime", "1m"),
            ("region", "west"),
        ]))
        .unwrap();

        assert_eq!(config.storage_type(), "inmem");
        assert_eq!(config.backend_config(), &map(&[("region", "west")]));
    }

    #[test]
    fn cache_lifetime_defaults_to_five_minutes() {
        let config = ReplicaConfig::from_map(map(&[("storage_type", "inmem")])).unwrap();
        assert_eq!(config.cache_lifetime(), DEFAULT_CACHE_LIFETIME);
        assert_eq!(DEFAULT_CACHE_LIFETIME, Duration::from_secs(300));
    }

    #[test]
    fn parse_cache_lifetime_accepts_iso_and_friendly_formats() {
        assert_eq!(parse_cache_lifetime("PT5M").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_cache_lifetime("5m").unwrap(), Duration::from_secs(300));
        assert_eq!(parse_cache_lifetime("90s").unwrap(), Duration::from_secs(90));
        assert_eq!(parse_cache_lifetime(" 1h 30m ").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_cache_lifetime("250ms").unwrap(), Duration::from_millis(250));
    }

    #[test]
    fn parse_cache_lifetime_rejects_garbage_zero_and_negative() {
        for value in ["", "soon", "0s", "PT0S", "-5m"] {
            let error = parse_cache_lifetime(value).expect_err(value);
            assert_eq!(error.kind(), ErrorKind::InvalidConfig, "value {value:?}");
        }
    }

    #[test]
    fn invalid_lifetime_fails_config_parsing() {
        let error = ReplicaConfig::from_map(map(&[("storage_type", "inmem"), ("cache_lifetime", "forever")])).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InvalidConfig);
        assert!(error.to_string().contains("forever"));
    }
}
