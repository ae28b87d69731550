//! In-memory cache storage, network and lifecycle
//!
//! Behaves like the browser versions closely enough to drive
//! [`crate::cache::install`] and [`crate::cache::serve`] outside of a worker.
//! Failures can be switched on to exercise the error paths.

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

use dashmap::DashMap;
use futures::future::try_join_all;
use url::Url;

use crate::{
    cache::{Cache, CacheStorage, Lifecycle, Network},
    error::PlatformError,
    model::{AssetRequest, AssetResponse, CacheId, RequestIdentity},
};

#[derive(Debug, Clone)]
pub struct MemoryCache<N> {
    /// Position in creation order, which is the order storage matches in
    created: usize,
    scope: Url,
    network: N,
    entries: Arc<DashMap<Url, AssetResponse>>,
}

impl<N> MemoryCache<N> {
    fn lookup(&self, request: &AssetRequest) -> Option<AssetResponse> {
        if !request.is_cacheable() {
            return None;
        }
        self.entries.get(&request.url).map(|r| r.value().clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N> Cache for MemoryCache<N>
where
    N: Network<Request = AssetRequest, Response = AssetResponse>,
{
    type Request = AssetRequest;
    type Response = AssetResponse;

    async fn add_all(&self, paths: &[String]) -> Result<(), PlatformError> {
        let requests = paths
            .iter()
            .map(|path| {
                AssetRequest::resolve(&self.scope, path)
                    .map_err(|e| PlatformError::new(format!("Invalid asset path {path}: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let responses = try_join_all(requests.iter().map(|request| async move {
            let response = self.network.fetch(request).await?;
            if !response.is_ok() {
                return Err(PlatformError::new(format!(
                    "{} returned {}",
                    request.url, response.status
                )));
            }
            Ok(response)
        }))
        .await?;

        // Only written once every fetch succeeded
        for (request, response) in requests.into_iter().zip(responses) {
            self.entries.insert(request.url, response);
        }
        Ok(())
    }

    async fn match_request(
        &self,
        request: &AssetRequest,
    ) -> Result<Option<AssetResponse>, PlatformError> {
        Ok(self.lookup(request))
    }

    async fn urls(&self) -> Result<Vec<String>, PlatformError> {
        let mut urls: Vec<String> = self.entries.iter().map(|e| e.key().to_string()).collect();
        urls.sort();
        Ok(urls)
    }
}

/// Cache storage whose caches fetch through `N` when populated
#[derive(Debug, Clone)]
pub struct MemoryCacheStorage<N> {
    scope: Url,
    network: N,
    caches: Arc<DashMap<CacheId, MemoryCache<N>>>,
    fail_open: Arc<AtomicBool>,
    fail_match: Arc<AtomicBool>,
    created: Arc<AtomicUsize>,
}

impl<N: Clone> MemoryCacheStorage<N> {
    /// `scope` is the worker script url that asset paths are relative to
    pub fn new(scope: Url, network: N) -> Self {
        Self {
            scope,
            network,
            caches: Default::default(),
            fail_open: Default::default(),
            fail_match: Default::default(),
            created: Default::default(),
        }
    }

    pub fn fail_open(&self, fail: bool) {
        self.fail_open.store(fail, Ordering::SeqCst);
    }

    pub fn fail_match(&self, fail: bool) {
        self.fail_match.store(fail, Ordering::SeqCst);
    }

    /// Caches oldest first, the order `caches.match` and `caches.keys` use
    fn caches_by_creation(&self) -> Vec<(CacheId, MemoryCache<N>)> {
        let mut caches: Vec<_> =
            self.caches.iter().map(|e| (e.key().clone(), e.value().clone())).collect();
        caches.sort_by_key(|(_, cache)| cache.created);
        caches
    }
}

impl<N> CacheStorage for MemoryCacheStorage<N>
where
    N: Network<Request = AssetRequest, Response = AssetResponse> + Clone,
{
    type Request = AssetRequest;
    type Response = AssetResponse;
    type Cache = MemoryCache<N>;

    async fn open(&self, cache_id: &CacheId) -> Result<MemoryCache<N>, PlatformError> {
        if self.fail_open.load(Ordering::SeqCst) {
            return Err(PlatformError::new(format!("Unable to open cache {cache_id}")));
        }

        let cache = self
            .caches
            .entry(cache_id.clone())
            .or_insert_with(|| MemoryCache {
                created: self.created.fetch_add(1, Ordering::SeqCst),
                scope: self.scope.clone(),
                network: self.network.clone(),
                entries: Default::default(),
            })
            .value()
            .clone();
        Ok(cache)
    }

    async fn match_request(
        &self,
        request: &AssetRequest,
    ) -> Result<Option<AssetResponse>, PlatformError> {
        if self.fail_match.load(Ordering::SeqCst) {
            return Err(PlatformError::new("Cache storage unavailable"));
        }

        Ok(self.caches_by_creation().iter().find_map(|(_, cache)| cache.lookup(request)))
    }

    async fn cache_ids(&self) -> Result<Vec<CacheId>, PlatformError> {
        Ok(self.caches_by_creation().into_iter().map(|(id, _)| id).collect())
    }
}

/// Serves canned responses and counts every fetch
#[derive(Debug, Clone)]
pub struct MemoryNetwork {
    scope: Url,
    routes: Arc<DashMap<Url, AssetResponse>>,
    fetches: Arc<AtomicUsize>,
}

impl MemoryNetwork {
    pub fn new(scope: Url) -> Self {
        Self { scope, routes: Default::default(), fetches: Default::default() }
    }

    /// Makes `path` (relative to the scope) reachable
    ///
    /// Panics if `path` doesn't resolve against the scope
    pub fn route(&self, path: &str, response: AssetResponse) {
        let url = self.scope.join(path).expect("route path should resolve against the scope");
        self.routes.insert(url, response);
    }

    pub fn unroute(&self, path: &str) {
        if let Ok(url) = self.scope.join(path) {
            self.routes.remove(&url);
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl Network for MemoryNetwork {
    type Request = AssetRequest;
    type Response = AssetResponse;

    async fn fetch(&self, request: &AssetRequest) -> Result<AssetResponse, PlatformError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        self.routes
            .get(&request.url)
            .map(|r| r.value().clone())
            .ok_or_else(|| PlatformError::new(format!("Failed to fetch {}", request.url)))
    }
}

/// Records calls to the lifecycle hooks
#[derive(Debug, Default)]
pub struct MemoryLifecycle {
    skip_waiting_calls: AtomicUsize,
    claim_calls: AtomicUsize,
    fail_skip_waiting: AtomicBool,
    fail_claim: AtomicBool,
}

impl MemoryLifecycle {
    pub fn skip_waiting_calls(&self) -> usize {
        self.skip_waiting_calls.load(Ordering::SeqCst)
    }

    pub fn claim_calls(&self) -> usize {
        self.claim_calls.load(Ordering::SeqCst)
    }

    pub fn fail_skip_waiting(&self, fail: bool) {
        self.fail_skip_waiting.store(fail, Ordering::SeqCst);
    }

    pub fn fail_claim(&self, fail: bool) {
        self.fail_claim.store(fail, Ordering::SeqCst);
    }
}

impl Lifecycle for MemoryLifecycle {
    fn skip_waiting(&self) -> Result<(), PlatformError> {
        self.skip_waiting_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_skip_waiting.load(Ordering::SeqCst) {
            return Err(PlatformError::new("skip_waiting rejected"));
        }
        Ok(())
    }

    async fn claim_clients(&self) -> Result<(), PlatformError> {
        self.claim_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_claim.load(Ordering::SeqCst) {
            return Err(PlatformError::new("clients.claim rejected"));
        }
        Ok(())
    }
}
