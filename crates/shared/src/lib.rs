pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod platform;
pub mod utils;

pub use cache::{install, serve, AssetCacheManager};
pub use config::WorkerConfig;
pub use model::*;

/// Path the worker script is served from, relative to the app root
pub const SERVICE_WORKER_SCRIPT: &str = "service-worker.js";

/// Line in the worker script that the host replaces with the deployment's
/// `WorkerConfig`
pub const WORKER_CONFIG_PLACEHOLDER: &str = "const WORKER_CONFIG = undefined;";
