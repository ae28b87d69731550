use tracing::{debug, error, info, instrument, warn};

use super::{Cache, CacheStorage, Lifecycle, Network};
use crate::{
    config::WorkerConfig,
    error::{ActivateError, InstallError, PlatformError, ServeError},
    model::{CacheId, RequestIdentity},
};

/// Populates the configured cache with every asset
///
/// Skip waiting is requested up front, like the browser handler does before it
/// waits on the cache. A failure there is logged but doesn't fail the install.
/// Nothing is cleaned up if populating fails part way.
#[instrument(skip_all, fields(cache_id = %config.cache_id, assets = config.assets.len()))]
pub async fn install<S, L>(
    storage: &S,
    lifecycle: &L,
    config: &WorkerConfig,
) -> Result<(), InstallError>
where
    S: CacheStorage,
    L: Lifecycle,
{
    if let Err(e) = lifecycle.skip_waiting() {
        warn!("skip_waiting failed: {e}");
    }

    let cache_id = &config.cache_id;
    let cache = storage
        .open(cache_id)
        .await
        .map_err(|source| InstallError::Open { cache_id: cache_id.clone(), source })?;

    if let Err(source) = cache.add_all(&config.assets).await {
        error!("Failed to cache assets: {source}");
        return Err(InstallError::Populate {
            cache_id: cache_id.clone(),
            asset_count: config.assets.len(),
            source,
        });
    }

    info!("Install successful");
    Ok(())
}

/// Answers a request from the caches, falling back to the network
///
/// Network responses are returned as-is and never stored. If the cache lookup
/// itself fails the request is treated as a miss.
pub async fn serve<S, N>(
    storage: &S,
    network: &N,
    request: &S::Request,
) -> Result<S::Response, ServeError>
where
    S: CacheStorage,
    S::Request: RequestIdentity,
    N: Network<Request = S::Request, Response = S::Response>,
{
    let url = request.url();

    if request.is_cacheable() {
        match storage.match_request(request).await {
            Ok(Some(cached)) => {
                debug!("HIT: {url}");
                return Ok(cached);
            }
            Ok(None) => debug!("MISS: {url}"),
            Err(e) => warn!("Cache lookup for {url} failed, using network: {e}"),
        }
    } else {
        debug!("BYPASS: {} {url}", request.method());
    }

    network.fetch(request).await.map_err(|source| {
        error!("Network fetch for {url} failed: {source}");
        ServeError::Network { url: url.to_string(), source }
    })
}

/// Claims the open clients so a freshly installed version controls them
pub async fn activate<L: Lifecycle>(lifecycle: &L) -> Result<(), ActivateError> {
    lifecycle.claim_clients().await.map_err(|source| ActivateError::Claim { source })?;
    debug!("Claimed clients");
    Ok(())
}

/// Owns the cache storage and network handles for the worker's lifetime
#[derive(Debug, Clone)]
pub struct AssetCacheManager<S, N> {
    storage: S,
    network: N,
}

impl<S, N> AssetCacheManager<S, N>
where
    S: CacheStorage,
    S::Request: RequestIdentity,
    N: Network<Request = S::Request, Response = S::Response>,
{
    pub fn new(storage: S, network: N) -> Self {
        Self { storage, network }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    pub async fn install<L: Lifecycle>(
        &self,
        lifecycle: &L,
        config: &WorkerConfig,
    ) -> Result<(), InstallError> {
        install(&self.storage, lifecycle, config).await
    }

    pub async fn serve(&self, request: &S::Request) -> Result<S::Response, ServeError> {
        serve(&self.storage, &self.network, request).await
    }

    pub async fn activate<L: Lifecycle>(&self, lifecycle: &L) -> Result<(), ActivateError> {
        activate(lifecycle).await
    }

    /// Urls stored in one cache. Opening creates the cache if it's missing.
    pub async fn cached_urls(&self, cache_id: &CacheId) -> Result<Vec<String>, PlatformError> {
        self.storage.open(cache_id).await?.urls().await
    }
}
