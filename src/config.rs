//! Optional config file. The first of ./ao3meta.toml and
//! $XDG_CONFIG_HOME/ao3meta/config.toml (or ~/.config/ao3meta/config.toml) that exists wins.

use serde::Deserialize;
use std::path::{Path, PathBuf};

const LOCAL_FILE: &str = "ao3meta.toml";
const APP_DIR: &str = "ao3meta";

/// Settings a config file may set. Absent keys fall back to CLI defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where downloads go when -o is not given. Relative paths are against the CWD.
    pub output_dir: Option<PathBuf>,
    pub user_agent: Option<String>,
    pub request_delay_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    /// Attempts per request, including the first.
    pub retry_count: Option<u32>,
    pub retry_backoff_secs: Option<Vec<u64>>,
}

/// Candidate config files in lookup order.
fn candidate_paths(cwd: &Path, config_dir: Option<&Path>) -> Vec<PathBuf> {
    std::iter::once(cwd.join(LOCAL_FILE))
        .chain(config_dir.map(|d| d.join(APP_DIR).join("config.toml")))
        .collect()
}

/// Read and parse one config file.
pub fn load_from(path: &Path) -> Result<Config, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
    toml::from_str(&text).map_err(|e| format!("Invalid config {}: {}", path.display(), e))
}

/// `Ok(None)` when no config file exists. A file that exists but can't be read or parsed is an error.
pub fn load_config() -> Result<Option<Config>, String> {
    let cwd = std::env::current_dir()
        .map_err(|e| format!("Cannot determine current directory: {}", e))?;
    let config_dir = dirs::config_dir();
    match candidate_paths(&cwd, config_dir.as_deref())
        .into_iter()
        .find(|p| p.is_file())
    {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            load_from(&path).map(Some)
        }
        None => Ok(None),
    }
}
