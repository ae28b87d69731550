use http::{HeaderMap, HeaderValue, StatusCode};

/// A snapshot of a response: status, headers and body
#[derive(Debug, Clone, PartialEq)]
pub struct AssetResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl AssetResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self { status, headers: HeaderMap::new(), body: body.into() }
    }

    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::new(StatusCode::OK, body)
    }

    pub fn with_content_type(mut self, content_type: &'static str) -> Self {
        self.headers.insert(http::header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        self
    }

    /// Same rule as `Response.ok`: any 2xx status
    pub fn is_ok(&self) -> bool {
        self.status.is_success()
    }
}
