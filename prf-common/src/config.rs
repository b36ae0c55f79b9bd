//! Configuration file resolution and TOML loading
//!
//! Config file resolution follows this priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. Per-user config file (`<config dir>/prf/config.toml`), if present
//! 4. None: callers fall back to compiled defaults
//!
//! A missing config file never aborts startup. It is logged and the
//! compiled defaults are used instead. A file that exists but cannot be
//! parsed is an error.

use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default environment variable consulted for the config file path
pub const CONFIG_ENV_VAR: &str = "PRF_CONFIG";

/// Directory name under the platform config dir
const APP_DIR: &str = "prf";

/// Config file name inside [`APP_DIR`]
const CONFIG_FILE_NAME: &str = "config.toml";

/// Resolve which config file to use, if any.
pub fn resolve_config_file(cli_arg: Option<&Path>, env_var_name: &str) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        debug!(path = %path.display(), "Config file from command line");
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            debug!(path = %path, env = env_var_name, "Config file from environment");
            return Some(PathBuf::from(path));
        }
    }

    // Priority 3: Per-user config file
    default_config_path().filter(|path| path.exists())
}

/// Platform location of the per-user config file
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE_NAME))
}

/// Parse a TOML file into `T`
pub fn load_toml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Parse a TOML file into `T`, degrading to `T::default()` when no file
/// was resolved or the resolved file does not exist.
pub fn load_toml_or_default<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    match path {
        None => {
            debug!("No config file resolved, using compiled defaults");
            Ok(T::default())
        }
        Some(path) if !path.exists() => {
            warn!(
                path = %path.display(),
                "Config file not found, using compiled defaults"
            );
            Ok(T::default())
        }
        Some(path) => load_toml(path),
    }
}
