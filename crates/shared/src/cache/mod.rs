//! The collaborators the worker talks to and the manager that drives them
//!
//! The browser provides all of these as globals. They are traits here so the
//! install and fetch handling can run against the in-memory versions in
//! [`crate::platform::memory`].
#![allow(async_fn_in_trait)]

mod manager;
pub use manager::*;

use crate::{error::PlatformError, model::CacheId};

/// A single named cache bucket
pub trait Cache {
    type Request;
    type Response;

    /// Fetches every path and stores the responses. Either all paths are
    /// stored or the call fails.
    async fn add_all(&self, paths: &[String]) -> Result<(), PlatformError>;

    async fn match_request(
        &self,
        request: &Self::Request,
    ) -> Result<Option<Self::Response>, PlatformError>;

    /// Urls of the stored entries
    async fn urls(&self) -> Result<Vec<String>, PlatformError>;
}

/// The set of caches available to the worker
pub trait CacheStorage {
    type Request;
    type Response;
    type Cache: Cache<Request = Self::Request, Response = Self::Response>;

    /// Opens the cache, creating it if it doesn't exist
    async fn open(&self, cache_id: &CacheId) -> Result<Self::Cache, PlatformError>;

    /// Looks for a match in every cache
    async fn match_request(
        &self,
        request: &Self::Request,
    ) -> Result<Option<Self::Response>, PlatformError>;

    async fn cache_ids(&self) -> Result<Vec<CacheId>, PlatformError>;
}

pub trait Network {
    type Request;
    type Response;

    async fn fetch(&self, request: &Self::Request) -> Result<Self::Response, PlatformError>;
}

/// Hooks the host gives the worker over its own lifecycle
pub trait Lifecycle {
    /// Activate as soon as install finishes instead of waiting for open clients
    /// of the previous version to close
    fn skip_waiting(&self) -> Result<(), PlatformError>;

    /// Take control of clients that are already open
    async fn claim_clients(&self) -> Result<(), PlatformError>;
}
