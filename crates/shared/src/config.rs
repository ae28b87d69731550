use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, model::CacheId};

pub const DEFAULT_CACHE_ID: &str = "sensor-pwa-v1";

/// Assets cached at install, relative to the worker script
pub const DEFAULT_ASSETS: [&str; 5] = [
    "./",
    "./index.html",
    "./manifest.json",
    "./icons/icon-192.png",
    "./icons/icon-512.png",
];

/// What the worker caches and under which name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerConfig {
    pub cache_id: CacheId,
    #[serde(default)]
    pub assets: Vec<String>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            cache_id: CacheId::new(DEFAULT_CACHE_ID).expect("DEFAULT_CACHE_ID is not empty"),
            assets: DEFAULT_ASSETS.iter().map(|a| a.to_string()).collect(),
        }
    }
}

impl WorkerConfig {
    pub fn new<T: Into<String>>(cache_id: CacheId, assets: impl IntoIterator<Item = T>) -> Self {
        Self { cache_id, assets: assets.into_iter().map(Into::into).collect() }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Config handed over by the worker script. Nothing, or a JSON `null`,
    /// means the bundled default.
    pub fn from_optional_json(json: Option<&str>) -> Result<Self, ConfigError> {
        match json.map(str::trim) {
            None | Some("null") => Ok(Self::default()),
            Some(json) => Self::from_json(json),
        }
    }
}
