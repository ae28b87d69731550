use std::{path::PathBuf, sync::Arc};

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue},
    response::IntoResponse,
    routing::get,
    Router,
};
use shared::{WorkerConfig, SERVICE_WORKER_SCRIPT};
use tower::ServiceBuilder;
use tower_http::{
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, Level};

use crate::{render_worker_script, AppError};

#[derive(Debug, Clone)]
pub struct AppState {
    pub worker_script: PathBuf,
    pub worker_config: Arc<WorkerConfig>,
}

/// Serves the worker script with the config baked in and everything else
/// straight from `assets_dir`
pub fn router(assets_dir: PathBuf, state: AppState) -> Router {
    Router::new()
        .route(
            &format!("/{SERVICE_WORKER_SCRIPT}"),
            get(worker_script).layer(
                ServiceBuilder::new()
                    // Browsers must always revalidate the worker or updates are missed
                    .layer(SetResponseHeaderLayer::overriding(
                        header::CACHE_CONTROL,
                        HeaderValue::from_static("no-cache"),
                    ))
                    .layer(SetResponseHeaderLayer::if_not_present(
                        HeaderName::from_static("service-worker-allowed"),
                        HeaderValue::from_static("/"),
                    )),
            ),
        )
        .fallback_service(ServeDir::new(assets_dir))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

async fn worker_script(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let path = &state.worker_script;
    let script = match tokio::fs::read_to_string(path).await {
        Ok(script) => script,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AppError::WorkerScriptNotFound(path.clone()));
        }
        Err(source) => return Err(AppError::WorkerScriptRead { path: path.clone(), source }),
    };

    let rendered = render_worker_script(&script, &state.worker_config)?;
    debug!("Serving worker for cache {}", state.worker_config.cache_id);

    Ok(([(header::CONTENT_TYPE, mime::APPLICATION_JAVASCRIPT.as_ref())], rendered))
}

#[cfg(test)]
mod test {
    use std::fs::write;

    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use shared::{CacheId, WORKER_CONFIG_PLACEHOLDER};
    use tower::ServiceExt;

    use super::*;

    fn app(dir: &std::path::Path, config: WorkerConfig) -> Router {
        let state = AppState {
            worker_script: dir.join(SERVICE_WORKER_SCRIPT),
            worker_config: Arc::new(config),
        };
        router(dir.to_path_buf(), state)
    }

    async fn get(app: Router, uri: &str) -> axum::response::Response {
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap()).await.unwrap()
    }

    #[tokio::test]
    async fn test_worker_script_has_config_and_headers() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path().join(SERVICE_WORKER_SCRIPT),
            format!("{WORKER_CONFIG_PLACEHOLDER}\nself.addEventListener('fetch', () => {{}});\n"),
        )
        .unwrap();
        let config = WorkerConfig::new(CacheId::new("v2").unwrap(), ["./"]);

        let response = get(app(dir.path(), config), "/service-worker.js").await;

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::CACHE_CONTROL], "no-cache");
        assert_eq!(headers["service-worker-allowed"], "/");
        assert_eq!(headers[header::CONTENT_TYPE], "application/javascript");

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert!(body.starts_with(r#"const WORKER_CONFIG = {"cache_id":"v2","assets":["./"]};"#));
    }

    #[tokio::test]
    async fn test_missing_worker_script_is_not_found() {
        let dir = tempfile::tempdir().unwrap();

        let response = get(app(dir.path(), WorkerConfig::default()), "/service-worker.js").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_script_without_placeholder_is_server_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path().join(SERVICE_WORKER_SCRIPT), "self.x = 1;\n").unwrap();

        let response = get(app(dir.path(), WorkerConfig::default()), "/service-worker.js").await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"Internal Server Error");
    }

    #[tokio::test]
    async fn test_assets_are_served_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path().join("index.html"), "<h1>sensors</h1>").unwrap();
        write(dir.path().join("manifest.json"), "{}").unwrap();

        let app = app(dir.path(), WorkerConfig::default());

        let index = get(app.clone(), "/").await;
        assert_eq!(index.status(), StatusCode::OK);
        let body = to_bytes(index.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"<h1>sensors</h1>");

        assert_eq!(get(app.clone(), "/manifest.json").await.status(), StatusCode::OK);
        assert_eq!(get(app, "/icons/icon-192.png").await.status(), StatusCode::NOT_FOUND);
    }
}
