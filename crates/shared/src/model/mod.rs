mod asset_request;
pub use asset_request::*;

mod asset_response;
pub use asset_response::*;

mod cache_id;
pub use cache_id::*;

use std::borrow::Cow;

use http::Method;

/// The parts of a request that decide whether it matches a cache entry
pub trait RequestIdentity {
    fn method(&self) -> Cow<'_, str>;
    fn url(&self) -> Cow<'_, str>;

    /// Only GET requests can be answered from the cache
    fn is_cacheable(&self) -> bool {
        self.method().eq_ignore_ascii_case(Method::GET.as_str())
    }
}
