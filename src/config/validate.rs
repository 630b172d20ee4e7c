// src/config/validate.rs

use std::time::Duration;

use crate::config::model::ConfigFile;
use crate::engine::{default_workers, BuildOptions};
use crate::errors::{FiledagError, Result};

impl TryFrom<ConfigFile> for BuildOptions {
    type Error = FiledagError;

    fn try_from(raw: ConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_build_section(&raw)?;

        Ok(BuildOptions {
            max_attempts: raw.build.max_attempts,
            on_failure: raw.build.on_failure,
            workers: raw.build.workers.unwrap_or_else(default_workers),
            poll_interval: Duration::from_millis(raw.build.poll_interval_ms),
            ignore: Vec::new(),
        })
    }
}

fn validate_build_section(cfg: &ConfigFile) -> Result<()> {
    // on_failure is strongly typed and validated during deserialization,
    // so it needs no check here.

    if cfg.build.workers == Some(0) {
        return Err(FiledagError::ConfigError(
            "[build].workers must be >= 1 (got 0)".to_string(),
        ));
    }

    if cfg.build.poll_interval_ms == 0 {
        return Err(FiledagError::ConfigError(
            "[build].poll_interval_ms must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(())
}
