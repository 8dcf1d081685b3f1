//! Template location.
//!
//! The template path is resolved from, in order: an explicit path, the
//! `LOADORDER_TEMPLATE` environment variable, a `loadorder.json` config file in
//! the platform config directory, and finally `lotemplate.txt` in the working
//! directory.

use crate::error::{Result, SorterError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File name of the load order template.
pub const LOAD_ORDER_TEMPLATE_FILE: &str = "lotemplate.txt";

/// Environment variable overriding the template path.
pub const TEMPLATE_ENV_VAR: &str = "LOADORDER_TEMPLATE";

const CONFIG_FILE: &str = "loadorder.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SorterConfig {
    pub template_path: PathBuf,
}

impl Default for SorterConfig {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from(LOAD_ORDER_TEMPLATE_FILE),
        }
    }
}

impl SorterConfig {
    pub fn new(template_path: impl Into<PathBuf>) -> Self {
        Self {
            template_path: template_path.into(),
        }
    }

    /// Resolves the template location, preferring `explicit` when given.
    pub fn resolve(explicit: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = explicit {
            return Ok(Self::new(path));
        }
        if let Some(path) = std::env::var_os(TEMPLATE_ENV_VAR) {
            return Ok(Self::new(path));
        }
        if let Some(dir) = get_config_dir() {
            if let Some(config) = Self::from_file(&dir.join(CONFIG_FILE))? {
                return Ok(config);
            }
        }
        Ok(Self::default())
    }

    /// Reads a JSON config file. Returns `Ok(None)` if it does not exist.
    pub fn from_file(path: &Path) -> Result<Option<Self>> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SorterError::ReadConfig {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config = serde_json::from_str(&content).map_err(|source| SorterError::ParseConfig {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded sorter config");
        Ok(Some(config))
    }
}

/// Get the directory holding `loadorder.json` for the current platform
fn get_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        let home = std::env::var_os("HOME")?;
        Some(PathBuf::from(home).join("Library/Application Support/loadorder"))
    }

    #[cfg(target_os = "windows")]
    {
        let appdata = std::env::var_os("APPDATA")?;
        Some(PathBuf::from(appdata).join("loadorder"))
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg).join("loadorder"));
        }
        let home = std::env::var_os("HOME")?;
        Some(PathBuf::from(home).join(".config/loadorder"))
    }
}
