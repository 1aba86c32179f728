use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::content::ContentConfig;
use crate::theme::ThemeTree;

const PROJECT_CONFIG_FILE: &str = "stylecfg.json";

/// Top-level keys the resolved config writes itself; pass-through options
/// may not reuse them.
const RESERVED_OPTION_KEYS: [&str; 3] = ["colors", "keyframes", "animations"];

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read project config: {path}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse project config")]
    Parse(#[from] serde_json::Error),
    #[error("top-level key `{key}` is reserved for resolved output")]
    ReservedKey { key: String },
}

/// A project configuration exactly as the author wrote it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawConfig {
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub theme: ThemeTree,
    #[serde(default)]
    pub plugins: Vec<serde_json::Value>,
    /// Every other top-level key (`darkMode`, `prefix`, ...).
    #[serde(flatten)]
    pub options: IndexMap<String, serde_json::Value>,
}

pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_CONFIG_FILE)
}

pub fn load_raw_config(path: &Path) -> ConfigResult<RawConfig> {
    let serialized = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_raw_config(&serialized)?;
    tracing::debug!(?path, patterns = config.content.files().len(), "loaded project config");
    Ok(config)
}

pub fn parse_raw_config(serialized: &str) -> ConfigResult<RawConfig> {
    let config: RawConfig = serde_json::from_str(serialized)?;
    if let Some(key) = config
        .options
        .keys()
        .find(|key| RESERVED_OPTION_KEYS.contains(&key.as_str()))
    {
        return Err(ConfigError::ReservedKey { key: key.clone() });
    }
    Ok(config)
}
