// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::ConfigFile;
use crate::engine::BuildOptions;
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw
/// [`ConfigFile`].
///
/// This only performs TOML deserialization; it does **not** perform
/// semantic validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: ConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file and turn it into checked [`BuildOptions`].
///
/// This is the recommended entry point:
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks worker-pool size and poll interval sanity.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<BuildOptions> {
    let raw = load_from_path(&path)?;
    let options = BuildOptions::try_from(raw)?;
    Ok(options)
}

/// Helper to resolve a default config path.
///
/// Currently this just returns `Filedag.toml` in the current working
/// directory; it exists so callers can later respect an env var or search
/// multiple locations without changing call sites.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Filedag.toml")
}
