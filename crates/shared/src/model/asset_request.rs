use std::borrow::Cow;

use http::Method;
use url::Url;

use super::RequestIdentity;

/// A request outside of the browser: a method and an absolute url
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetRequest {
    pub method: Method,
    pub url: Url,
}

impl AssetRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self { method, url }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    /// Resolves `path` against `scope` the way the browser resolves asset paths
    /// against the worker location
    pub fn resolve(scope: &Url, path: &str) -> Result<Self, url::ParseError> {
        Ok(Self::get(scope.join(path)?))
    }
}

impl RequestIdentity for AssetRequest {
    fn method(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.method.as_str())
    }

    fn url(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.url.as_str())
    }
}
