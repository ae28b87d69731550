use std::borrow::Cow;

use js_sys::{Array, JsString};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, Response, ServiceWorkerGlobalScope};

use crate::{
    cache::{Cache, CacheStorage, Lifecycle, Network},
    error::PlatformError,
    model::{CacheId, RequestIdentity},
};

impl RequestIdentity for Request {
    fn method(&self) -> Cow<'_, str> {
        Cow::Owned(Request::method(self))
    }

    fn url(&self) -> Cow<'_, str> {
        Cow::Owned(Request::url(self))
    }
}

/// `cache.match` resolves to a Response or undefined
fn into_response(value: JsValue) -> Result<Option<Response>, PlatformError> {
    if value.is_undefined() {
        return Ok(None);
    }
    value.dyn_into::<Response>().map(Some).map_err(|v| {
        PlatformError::new(format!("match returned something other than a Response: {v:?}"))
    })
}

#[derive(Debug, Clone)]
pub struct BrowserCache(web_sys::Cache);

impl Cache for BrowserCache {
    type Request = Request;
    type Response = Response;

    async fn add_all(&self, paths: &[String]) -> Result<(), PlatformError> {
        let paths: Array = paths.iter().map(|p| JsString::from(p.as_str())).collect();
        JsFuture::from(self.0.add_all_with_str_sequence(&paths)).await?;
        Ok(())
    }

    async fn match_request(&self, request: &Request) -> Result<Option<Response>, PlatformError> {
        into_response(JsFuture::from(self.0.match_with_request(request)).await?)
    }

    async fn urls(&self) -> Result<Vec<String>, PlatformError> {
        let keys: Array = JsFuture::from(self.0.keys()).await?.into();
        Ok(keys.into_iter().map(|k| Request::from(k).url()).collect())
    }
}

#[derive(Debug, Clone)]
pub struct BrowserCacheStorage(web_sys::CacheStorage);

impl BrowserCacheStorage {
    pub fn new(sw: &ServiceWorkerGlobalScope) -> Result<Self, PlatformError> {
        Ok(Self(sw.caches()?))
    }
}

impl CacheStorage for BrowserCacheStorage {
    type Request = Request;
    type Response = Response;
    type Cache = BrowserCache;

    async fn open(&self, cache_id: &CacheId) -> Result<BrowserCache, PlatformError> {
        let cache: web_sys::Cache = JsFuture::from(self.0.open(cache_id.as_str())).await?.into();
        Ok(BrowserCache(cache))
    }

    async fn match_request(&self, request: &Request) -> Result<Option<Response>, PlatformError> {
        into_response(JsFuture::from(self.0.match_with_request(request)).await?)
    }

    async fn cache_ids(&self) -> Result<Vec<CacheId>, PlatformError> {
        let keys: Array = JsFuture::from(self.0.keys()).await?.into();
        keys.into_iter()
            .filter_map(|k| k.as_string())
            .map(|k| CacheId::new(k).map_err(|e| PlatformError::new(e.to_string())))
            .collect()
    }
}

/// The worker's own `fetch`
#[derive(Debug, Clone)]
pub struct BrowserNetwork(ServiceWorkerGlobalScope);

impl BrowserNetwork {
    pub fn new(sw: ServiceWorkerGlobalScope) -> Self {
        Self(sw)
    }
}

impl Network for BrowserNetwork {
    type Request = Request;
    type Response = Response;

    async fn fetch(&self, request: &Request) -> Result<Response, PlatformError> {
        let response = JsFuture::from(self.0.fetch_with_request(request)).await?;
        response.dyn_into::<Response>().map_err(|v| {
            PlatformError::new(format!("Fetch returned something other than a Response: {v:?}"))
        })
    }
}

#[derive(Debug, Clone)]
pub struct BrowserLifecycle(ServiceWorkerGlobalScope);

impl BrowserLifecycle {
    pub fn new(sw: ServiceWorkerGlobalScope) -> Self {
        Self(sw)
    }
}

impl Lifecycle for BrowserLifecycle {
    fn skip_waiting(&self) -> Result<(), PlatformError> {
        // MDN states the promise returned can be safely ignored
        let _ = self.0.skip_waiting()?;
        Ok(())
    }

    async fn claim_clients(&self) -> Result<(), PlatformError> {
        JsFuture::from(self.0.clients().claim()).await?;
        Ok(())
    }
}
