use std::time::Duration;

use smartroute_core::prelude::{NetworkCache, NetworkLoader, NetworkSourceConfig, OsmPbfLoader};

use crate::config::ServerConfig;

/// Shared by all handlers behind an `Arc`
pub struct AppState {
    pub cache: NetworkCache,
    /// Upper bound for loading and searching in one request
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(cache: NetworkCache, request_timeout: Duration) -> Self {
        Self {
            cache,
            request_timeout,
        }
    }

    /// State with an in-memory loader, mostly for tests and fixtures
    pub fn with_loader(loader: impl NetworkLoader + 'static, request_timeout: Duration) -> Self {
        Self::new(NetworkCache::new(loader), request_timeout)
    }

    /// State reading OSM extracts as described by `config`
    pub fn from_config(config: &ServerConfig) -> Self {
        let source = config.places.iter().fold(
            NetworkSourceConfig::new(config.data_dir.clone()),
            |source, (place, path)| source.with_place(place.clone(), path.clone()),
        );

        let mut cache = NetworkCache::new(OsmPbfLoader::new(source));
        if let Some(capacity) = config.cache_capacity {
            tracing::info!("Road network cache limited to {capacity} places");
            cache = cache.with_capacity(capacity);
        }

        Self::new(cache, Duration::from_secs(config.request_timeout_secs))
    }
}
