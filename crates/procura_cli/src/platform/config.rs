use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use engine_logging::{engine_info, engine_warn};
use procura_engine::{AtomicFileWriter, DEFAULT_BASE_URL};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcuraConfig {
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub stream_idle_timeout_secs: Option<u64>,
    pub output_dir: PathBuf,
    pub vendor: String,
    pub ship_to: String,
}

impl Default for ProcuraConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
            stream_idle_timeout_secs: None,
            output_dir: PathBuf::from("orders"),
            vendor: "Tech Company R US".to_string(),
            ship_to: "Cendral AI".to_string(),
        }
    }
}

/// Load the config file. A missing file silently yields defaults; an
/// unreadable or malformed one is logged and also yields defaults.
pub(crate) fn load_config(path: &Path) -> ProcuraConfig {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return ProcuraConfig::default();
        }
        Err(err) => {
            engine_warn!("Failed to read config from {:?}: {}", path, err);
            return ProcuraConfig::default();
        }
    };

    match ron::from_str(&content) {
        Ok(config) => {
            engine_info!("Loaded config from {:?}", path);
            config
        }
        Err(err) => {
            engine_warn!("Failed to parse config from {:?}: {}", path, err);
            ProcuraConfig::default()
        }
    }
}

pub(crate) fn save_config(path: &Path, config: &ProcuraConfig) -> anyhow::Result<PathBuf> {
    let pretty = ron::ser::PrettyConfig::new();
    let content = ron::ser::to_string_pretty(config, pretty).context("serializing config")?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("config path {path:?} has no file name"))?;

    let written = AtomicFileWriter::new(dir)
        .write(filename, &content)
        .with_context(|| format!("writing config to {path:?}"))?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = load_config(&temp.path().join("procura.ron"));
        assert_eq!(config, ProcuraConfig::default());
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("procura.ron");
        fs::write(
            &path,
            r#"(base_url: "http://127.0.0.1:9000", stream_idle_timeout_secs: Some(45))"#,
        )
        .unwrap();

        let config = load_config(&path);
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.stream_idle_timeout_secs, Some(45));
        assert_eq!(config.vendor, "Tech Company R US");
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("procura.ron");
        fs::write(&path, "(base_url: ").unwrap();
        assert_eq!(load_config(&path), ProcuraConfig::default());
    }

    #[test]
    fn saved_config_loads_back() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("procura.ron");
        let config = ProcuraConfig {
            ship_to: "Warehouse 9".to_string(),
            ..ProcuraConfig::default()
        };

        let written = save_config(&path, &config).unwrap();
        assert_eq!(written, path);
        assert_eq!(load_config(&path), config);
    }
}
