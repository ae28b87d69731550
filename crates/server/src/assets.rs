use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

use anyhow::Context;
use shared::{WorkerConfig, WORKER_CONFIG_PLACEHOLDER};

use crate::RenderError;

/// Reads the config from a json file, or falls back to the bundled one
pub fn load_worker_config(path: Option<&Path>) -> Result<WorkerConfig, anyhow::Error> {
    let Some(path) = path else {
        return Ok(WorkerConfig::default());
    };

    let json = read_to_string(path).with_context(|| format!("Reading worker config {path:?}"))?;
    WorkerConfig::from_json(&json).with_context(|| format!("Parsing worker config {path:?}"))
}

/// The file ServeDir answers an asset path with
pub fn asset_file(assets_dir: &Path, asset: &str) -> PathBuf {
    let relative = asset.trim_start_matches("./").trim_start_matches('/');

    if relative.is_empty() || relative.ends_with('/') {
        assets_dir.join(relative).join("index.html")
    } else {
        assets_dir.join(relative)
    }
}

/// Assets the worker will fail to cache because nothing serves them
pub fn missing_assets(assets_dir: &Path, config: &WorkerConfig) -> Vec<String> {
    config.assets.iter().filter(|a| !asset_file(assets_dir, a).is_file()).cloned().collect()
}

/// Swaps the placeholder config line in the worker script for `config`
pub fn render_worker_script(script: &str, config: &WorkerConfig) -> Result<String, RenderError> {
    if !script.contains(WORKER_CONFIG_PLACEHOLDER) {
        return Err(RenderError::MissingPlaceholder(WORKER_CONFIG_PLACEHOLDER));
    }

    let json = serde_json::to_string(config)?;
    Ok(script.replacen(WORKER_CONFIG_PLACEHOLDER, &format!("const WORKER_CONFIG = {json};"), 1))
}

#[cfg(test)]
mod test {
    use std::fs::{create_dir_all, write};

    use shared::CacheId;

    use super::*;

    #[test]
    fn test_asset_file_maps_directories_to_index() {
        let dir = Path::new("assets");
        assert_eq!(asset_file(dir, "./"), dir.join("index.html"));
        assert_eq!(asset_file(dir, "./icons/"), dir.join("icons/index.html"));
        assert_eq!(asset_file(dir, "./manifest.json"), dir.join("manifest.json"));
        assert_eq!(asset_file(dir, "/icons/icon-192.png"), dir.join("icons/icon-192.png"));
    }

    #[test]
    fn test_missing_assets_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path().join("index.html"), "<html></html>").unwrap();
        create_dir_all(dir.path().join("icons")).unwrap();
        write(dir.path().join("icons/icon-192.png"), [0u8; 4]).unwrap();

        let missing = missing_assets(dir.path(), &WorkerConfig::default());

        assert_eq!(missing, vec!["./manifest.json", "./icons/icon-512.png"]);
    }

    #[test]
    fn test_load_worker_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("worker.json");
        write(&path, r#"{ "cache_id": "sensor-pwa-v2", "assets": ["./"] }"#).unwrap();

        let config = load_worker_config(Some(&path)).unwrap();
        assert_eq!(config.cache_id, CacheId::new("sensor-pwa-v2").unwrap());
        assert_eq!(config.assets, vec!["./"]);

        assert_eq!(load_worker_config(None).unwrap(), WorkerConfig::default());
        assert!(load_worker_config(Some(&dir.path().join("missing.json"))).is_err());
    }

    #[test]
    fn test_render_worker_script_bakes_in_config() {
        let script = format!("var wasm_bindgen;\n{WORKER_CONFIG_PLACEHOLDER}\nself.x = 1;\n");
        let config = WorkerConfig::new(CacheId::new("v1").unwrap(), ["./", "./index.html"]);

        let rendered = render_worker_script(&script, &config).unwrap();

        assert!(!rendered.contains(WORKER_CONFIG_PLACEHOLDER));
        assert!(rendered
            .contains(r#"const WORKER_CONFIG = {"cache_id":"v1","assets":["./","./index.html"]};"#));
        assert!(matches!(
            render_worker_script("self.x = 1;", &config),
            Err(RenderError::MissingPlaceholder(_))
        ));
    }
}
