use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::http::lifecycle::DEFAULT_KEEP_ALIVE_TIMEOUT;
use crate::http::writer::DEFAULT_CHUNK_SIZE;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    /// Upper bound on concurrently served connections; 0 means unbounded
    pub max_connections: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            max_connections: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    pub document_root: PathBuf,
    pub keep_alive_timeout_secs: u64,
    pub chunk_size: usize,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            document_root: PathBuf::from("."),
            keep_alive_timeout_secs: DEFAULT_KEEP_ALIVE_TIMEOUT.as_secs(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl StaticFilesConfig {
    pub fn keep_alive_timeout(&self) -> Duration {
        Duration::from_secs(self.keep_alive_timeout_secs)
    }
}

impl Config {
    /// Defaults, overlaid by the YAML file at `path` (if any), then by the
    /// `LISTEN` and `DOCUMENT_ROOT` environment variables.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut cfg = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Ok(listen_addr) = std::env::var("LISTEN") {
            cfg.server.listen_addr = listen_addr;
        }
        if let Ok(root) = std::env::var("DOCUMENT_ROOT") {
            cfg.static_files.document_root = PathBuf::from(root);
        }

        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_yaml(&raw).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let root = &self.static_files.document_root;
        if !root.is_dir() {
            anyhow::bail!("document root {} is not a directory", root.display());
        }
        if self.static_files.chunk_size == 0 {
            anyhow::bail!("static_files.chunk_size must be greater than zero");
        }
        if self.static_files.keep_alive_timeout_secs == 0 {
            anyhow::bail!("static_files.keep_alive_timeout_secs must be greater than zero");
        }
        Ok(())
    }
}
