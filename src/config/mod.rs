// src/config/mod.rs

//! Orchestrator configuration.
//!
//! - [`model`] is the serde mapping of the TOML file.
//! - [`loader`] reads and deserializes it.
//! - [`validate`] turns the raw model into checked [`crate::engine::BuildOptions`].

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{BuildSection, ConfigFile};
