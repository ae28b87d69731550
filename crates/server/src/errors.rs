use std::{io, path::PathBuf};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

/// Why the worker script couldn't be baked
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("worker script has no `{0}` line to replace")]
    MissingPlaceholder(&'static str),
    #[error("serializing worker config: {0}")]
    Config(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("worker script {0:?} hasn't been built")]
    WorkerScriptNotFound(PathBuf),
    #[error("reading worker script {path:?}: {source}")]
    WorkerScriptRead { path: PathBuf, source: io::Error },
    #[error("rendering worker script: {0}")]
    WorkerScriptRender(#[from] RenderError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::WorkerScriptNotFound(_) => StatusCode::NOT_FOUND,
            AppError::WorkerScriptRead { .. } | AppError::WorkerScriptRender(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// Details stay in the log, the client only gets the status text
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{self}");
        }

        let body = status.canonical_reason().unwrap_or("error").to_string();
        (status, body).into_response()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_errors_map_to_status() {
        let not_found = AppError::WorkerScriptNotFound("service-worker.js".into());
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let read = AppError::WorkerScriptRead {
            path: "service-worker.js".into(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(read.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let render = AppError::from(RenderError::MissingPlaceholder("const X;"));
        assert_eq!(render.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_response_body_hides_details() {
        let read = AppError::WorkerScriptRead {
            path: "/srv/secret/service-worker.js".into(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };

        let response = read.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(body, "Internal Server Error");
        assert!(!body.contains("secret"));
    }
}
