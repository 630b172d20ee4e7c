// src/config/model.rs

use serde::Deserialize;

use crate::engine::FailurePolicy;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [build]
/// max_attempts = 3
/// on_failure = "print"
/// workers = 4
/// poll_interval_ms = 100
/// ```
///
/// All fields are optional and have the same defaults as
/// [`crate::engine::BuildOptions`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub build: BuildSection,
}

/// `[build]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildSection {
    /// Maximum times a build step is attempted before giving up.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// `"raise"`, `"print"` or `"ignore"`.
    #[serde(default)]
    pub on_failure: FailurePolicy,

    /// Worker-pool size. Omitted means host parallelism.
    #[serde(default)]
    pub workers: Option<usize>,

    /// Supervisor sleep between frontier sweeps that found nothing new.
    /// Increasing this on large graphs means fewer cycles spent planning.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_max_attempts() -> u32 {
    1
}

fn default_poll_interval_ms() -> u64 {
    100
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            on_failure: FailurePolicy::default(),
            workers: None,
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}
