// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FiledagError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Circular dependency in graph involving '{node}'")]
    CircularDependency { node: String },

    #[error("Build cannot be satisfied: '{node}' does not exist and has no dependencies")]
    BuildUnsatisfiable { node: String },

    #[error("Unknown attribute '{key}' on dataset '{node}'")]
    UnknownAttribute { node: String, key: String },

    #[error("Build step for '{node}' failed after {attempts} attempt(s)")]
    StepFailed {
        node: String,
        attempts: u32,
        #[source]
        source: anyhow::Error,
    },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, FiledagError>;
