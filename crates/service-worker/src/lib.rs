use console_error_panic_hook::set_once as set_panic_hook;
use shared::{
    cache,
    platform::wasm::{BrowserCacheStorage, BrowserLifecycle, BrowserNetwork},
    utils::tracing::configure_tracing_once as configure_tracing,
    WorkerConfig,
};
use tracing::{debug, error, info};
use wasm_bindgen::{prelude::wasm_bindgen, JsValue};
use wasm_bindgen_futures::future_to_promise;
use web_sys::{
    js_sys::{Promise, JSON},
    Request, ServiceWorkerGlobalScope,
};

/// The config baked into the worker script, or the bundled default when the
/// script passes nothing
fn worker_config(value: &JsValue) -> Result<WorkerConfig, JsValue> {
    let json = if value.is_undefined() || value.is_null() {
        None
    } else {
        Some(String::from(JSON::stringify(value)?))
    };
    Ok(WorkerConfig::from_optional_json(json.as_deref())?)
}

async fn install(sw: ServiceWorkerGlobalScope, config: WorkerConfig) -> Result<JsValue, JsValue> {
    let storage = BrowserCacheStorage::new(&sw)?;
    let lifecycle = BrowserLifecycle::new(sw);

    cache::install(&storage, &lifecycle, &config).await?;

    if let Ok(ids) = cache::CacheStorage::cache_ids(&storage).await {
        debug!("Caches after install: {ids:?}");
    }

    Ok(JsValue::undefined())
}

/// Handles the install event. The returned promise goes to `event.waitUntil`;
/// rejecting it makes the browser discard this worker version.
#[wasm_bindgen]
pub fn worker_install(sw: ServiceWorkerGlobalScope, config: JsValue) -> Result<Promise, JsValue> {
    set_panic_hook();
    configure_tracing();

    let config = worker_config(&config).inspect_err(|e| error!("Invalid worker config: {e:?}"))?;
    info!("Installing {} ({} assets)", config.cache_id, config.assets.len());

    Ok(future_to_promise(install(sw, config)))
}

async fn activate(sw: ServiceWorkerGlobalScope) -> Result<JsValue, JsValue> {
    // Claim the clients so pages opened before the install are served too
    cache::activate(&BrowserLifecycle::new(sw)).await?;

    Ok(JsValue::undefined())
}

#[wasm_bindgen]
pub fn worker_activate(sw: ServiceWorkerGlobalScope) -> Promise {
    set_panic_hook();
    configure_tracing();

    future_to_promise(activate(sw))
}

async fn fetch(sw: ServiceWorkerGlobalScope, request: Request) -> Result<JsValue, JsValue> {
    let storage = BrowserCacheStorage::new(&sw)?;
    let network = BrowserNetwork::new(sw);

    let response = cache::serve(&storage, &network, &request).await?;

    Ok(JsValue::from(&response))
}

/// Handles the fetch event. The returned promise goes to `event.respondWith`.
#[wasm_bindgen]
pub fn worker_fetch(sw: ServiceWorkerGlobalScope, request: Request) -> Promise {
    set_panic_hook();
    configure_tracing();

    future_to_promise(fetch(sw, request))
}
