use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[clap(name = "sensor pwa server")]
pub struct Cli {
    #[clap(long, env, default_value = "assets")]
    pub assets_dir: PathBuf,
    /// wasm-bindgen output with the listener snippet appended. Relative paths
    /// are resolved against the assets dir.
    #[clap(long, env, default_value = shared::SERVICE_WORKER_SCRIPT)]
    pub worker_script: PathBuf,
    /// JSON WorkerConfig to bake into the worker script instead of the bundled
    /// asset list
    #[clap(long, env)]
    pub worker_config: Option<PathBuf>,
    #[clap(long, env, default_value = "8080")]
    pub port: u16,
    #[clap(long, env, default_value = "127.0.0.1")]
    pub bind_addr: String,
}

impl Cli {
    pub fn worker_script_path(&self) -> PathBuf {
        self.assets_dir.join(&self.worker_script)
    }
}
