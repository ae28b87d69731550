use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Names a cache bucket. Bumping it is the only way to replace stored assets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CacheId(String);

impl CacheId {
    pub fn new<T: Into<String>>(id: T) -> Result<Self, ConfigError> {
        Self::try_from(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for CacheId {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().is_empty() {
            return Err(ConfigError::EmptyCacheId);
        }
        Ok(Self(value))
    }
}

impl From<CacheId> for String {
    fn from(value: CacheId) -> Self {
        value.0
    }
}

impl AsRef<str> for CacheId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_blank_cache_id_is_rejected() {
        assert!(matches!(CacheId::new(""), Err(ConfigError::EmptyCacheId)));
        assert!(matches!(CacheId::new("  "), Err(ConfigError::EmptyCacheId)));
    }

    #[test]
    fn test_cache_id_deserializes_from_string() {
        let id: CacheId = serde_json::from_str("\"sensor-pwa-v2\"").unwrap();
        assert_eq!(id.as_str(), "sensor-pwa-v2");
        assert!(serde_json::from_str::<CacheId>("\"\"").is_err());
    }
}
