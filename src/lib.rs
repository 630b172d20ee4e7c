// src/lib.rs

//! Incremental build engine for file-backed data-processing pipelines.
//!
//! Datasets are nodes in a dependency graph; staleness is decided purely by
//! file existence and modification times. The crate plans which datasets
//! need rebuilding (lazily per call with [`plan::build_next`], or as a
//! complete staged plan with [`plan::build_all`]) and drives a
//! caller-supplied build action concurrently over the plan with
//! [`engine::orchestrate`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use filedag::{DepGraph, engine::{orchestrate, BuildOptions}};
//!
//! # async fn example(delegator: Arc<dyn filedag::exec::Delegator>) -> filedag::Result<()> {
//! let mut graph = DepGraph::new();
//! let raw = graph.add_dataset("data/raw.csv");
//! let clean = graph.add_dataset("data/clean.csv");
//! graph.depends_on(clean, [raw]);
//!
//! let _report = orchestrate(
//!     Arc::new(graph),
//!     clean,
//!     delegator,
//!     BuildOptions::default(),
//! )
//! .await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod graph;
pub mod logging;
pub mod plan;
pub mod report;

pub use engine::{orchestrate, BuildOptions, BuildReport, FailurePolicy};
pub use errors::{FiledagError, Result};
pub use exec::Delegator;
pub use fs::{FileStat, RealFileSystem};
pub use graph::{DepGraph, NodeId};
pub use plan::{build_all, build_next, BuildStep, Reason, Stage};
