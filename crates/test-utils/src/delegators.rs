#![allow(dead_code)]

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use filedag::errors::Result;
use filedag::exec::Delegator;
use filedag::plan::Reason;
use filedag::{DepGraph, NodeId};

use crate::fixture::makefile;

/// A delegator that "builds" a dataset by creating every file it names,
/// and records which nodes it was invoked for.
#[derive(Debug, Clone, Default)]
pub struct TouchDelegator {
    executed: Arc<Mutex<Vec<String>>>,
}

impl TouchDelegator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the nodes built so far, in invocation order.
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

impl Delegator for TouchDelegator {
    fn build(
        &self,
        graph: Arc<DepGraph>,
        node: NodeId,
        _reason: Reason,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> {
        let executed = Arc::clone(&self.executed);

        Box::pin(async move {
            executed.lock().unwrap().push(graph.name(node).to_string());
            for path in graph.paths(node) {
                makefile(path);
            }
            Ok(())
        })
    }
}

/// A delegator that always fails, recording per-node invocation counts so
/// tests can assert retry behaviour.
#[derive(Debug, Clone, Default)]
pub struct FailingDelegator {
    calls: Arc<Mutex<HashMap<String, u32>>>,
}

impl FailingDelegator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Times the delegator was invoked for the given node name.
    pub fn calls_for(&self, name: &str) -> u32 {
        self.calls.lock().unwrap().get(name).copied().unwrap_or(0)
    }
}

impl Delegator for FailingDelegator {
    fn build(
        &self,
        graph: Arc<DepGraph>,
        node: NodeId,
        _reason: Reason,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> {
        let calls = Arc::clone(&self.calls);

        Box::pin(async move {
            let name = graph.name(node).to_string();
            *calls.lock().unwrap().entry(name.clone()).or_insert(0) += 1;
            Err(anyhow::anyhow!("refusing to build {name}").into())
        })
    }
}

/// A delegator whose first invocation per node fails and whose second
/// succeeds, for exercising retries.
#[derive(Debug, Clone, Default)]
pub struct FlakyDelegator {
    calls: Arc<Mutex<HashMap<String, u32>>>,
}

impl FlakyDelegator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls_for(&self, name: &str) -> u32 {
        self.calls.lock().unwrap().get(name).copied().unwrap_or(0)
    }
}

impl Delegator for FlakyDelegator {
    fn build(
        &self,
        graph: Arc<DepGraph>,
        node: NodeId,
        _reason: Reason,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> {
        let calls = Arc::clone(&self.calls);

        Box::pin(async move {
            let name = graph.name(node).to_string();
            let attempt = {
                let mut guard = calls.lock().unwrap();
                let entry = guard.entry(name.clone()).or_insert(0);
                *entry += 1;
                *entry
            };

            if attempt == 1 {
                return Err(anyhow::anyhow!("transient failure building {name}").into());
            }
            for path in graph.paths(node) {
                makefile(path);
            }
            Ok(())
        })
    }
}
