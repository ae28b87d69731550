use thiserror::Error;

use crate::model::CacheId;

#[cfg(feature = "wasm")]
pub use wasm::*;

#[cfg(feature = "wasm")]
mod wasm {
    use thiserror::Error;
    use wasm_bindgen::{JsCast, JsValue};
    use web_sys::js_sys::{
        Error as GenericJsError, RangeError as JsRangeError, ReferenceError as JsReferenceError,
        SyntaxError as JsSyntaxError, TypeError as JsTypeError, UriError as JsUriError,
    };

    use super::PlatformError;

    #[derive(Debug, Clone, Error)]
    pub enum JsError {
        #[error("GenericJs Error: {0:?}")]
        GenericJs(GenericJsError),
        #[error("JsRange Error: {0:?}")]
        JsRange(JsRangeError),
        #[error("JsReference Error: {0:?}")]
        JsReference(JsReferenceError),
        #[error("JsSyntax Error: {0:?}")]
        JsSyntax(JsSyntaxError),
        #[error("JsType Error: {0:?}")]
        JsType(JsTypeError),
        #[error("JsUri Error: {0:?}")]
        JsUri(JsUriError),
        #[error("UnknownJsValue Error: {0:?}")]
        UnknownJsValue(String),
    }

    impl From<JsValue> for JsError {
        fn from(err: JsValue) -> JsError {
            if err.is_instance_of::<JsRangeError>() {
                return JsError::JsRange(err.into());
            }
            if err.is_instance_of::<JsReferenceError>() {
                return JsError::JsReference(err.into());
            }
            if err.is_instance_of::<JsSyntaxError>() {
                return JsError::JsSyntax(err.into());
            }
            if err.is_instance_of::<JsTypeError>() {
                return JsError::JsType(err.into());
            }
            if err.is_instance_of::<JsUriError>() {
                return JsError::JsUri(err.into());
            }
            // Checked last, the specific errors above are all instances of Error too
            if err.is_instance_of::<GenericJsError>() {
                return JsError::GenericJs(err.into());
            }
            JsError::UnknownJsValue(format!("{:?}", err))
        }
    }

    impl From<JsValue> for PlatformError {
        fn from(value: JsValue) -> Self {
            PlatformError::new(JsError::from(value).to_string())
        }
    }

    impl From<PlatformError> for JsValue {
        fn from(value: PlatformError) -> Self {
            JsValue::from(GenericJsError::new(&value.message))
        }
    }
}

/// A failure reported by one of the host collaborators (cache storage, network
/// or lifecycle hooks)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct PlatformError {
    pub message: String,
}

impl PlatformError {
    pub fn new<T: Into<String>>(message: T) -> Self {
        Self { message: message.into() }
    }
}

#[derive(Debug, Clone, Error)]
pub enum InstallError {
    #[error("Opening cache {cache_id}: {source}")]
    Open { cache_id: CacheId, source: PlatformError },
    #[error("Populating cache {cache_id} with {asset_count} assets: {source}")]
    Populate { cache_id: CacheId, asset_count: usize, source: PlatformError },
}

#[derive(Debug, Clone, Error)]
pub enum ServeError {
    #[error("Fetching {url} from the network: {source}")]
    Network { url: String, source: PlatformError },
}

#[derive(Debug, Clone, Error)]
pub enum ActivateError {
    #[error("Claiming clients: {source}")]
    Claim { source: PlatformError },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cache identifier must not be empty")]
    EmptyCacheId,
    #[error("Invalid worker config: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(feature = "wasm")]
mod js_conversions {
    use wasm_bindgen::JsValue;
    use web_sys::js_sys::Error as GenericJsError;

    use super::{ActivateError, ConfigError, InstallError, ServeError};

    macro_rules! into_js_error {
        ($($t:ty),+) => {
            $(
                impl From<$t> for JsValue {
                    fn from(value: $t) -> Self {
                        JsValue::from(GenericJsError::new(&value.to_string()))
                    }
                }
            )+
        };
    }

    into_js_error!(InstallError, ServeError, ActivateError, ConfigError);
}
