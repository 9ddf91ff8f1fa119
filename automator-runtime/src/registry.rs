//! Name-keyed collections of automation entities
//!
//! Registries are built once at startup and never change shape afterwards,
//! so lookups need no lock of their own. All mutation happens inside the
//! entities, each behind its own lock.

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

use automator_core::{
    AutomatorError, AutomatorResult, EntityKind, ProcessSnapshot, TaskSnapshot,
};

use crate::{AutomationProcess, AutomationTask};

/// An entity that can live in a [`Registry`]
#[async_trait]
pub trait RegistryEntry: Send + Sync + 'static {
    /// Snapshot type returned to callers
    type Snapshot: Send;

    /// Kind reported in lookup errors
    const KIND: EntityKind;

    fn name(&self) -> &str;

    async fn snapshot(&self) -> Self::Snapshot;
}

#[async_trait]
impl RegistryEntry for AutomationProcess {
    type Snapshot = ProcessSnapshot;
    const KIND: EntityKind = EntityKind::Process;

    fn name(&self) -> &str {
        AutomationProcess::name(self)
    }

    async fn snapshot(&self) -> ProcessSnapshot {
        AutomationProcess::snapshot(self).await
    }
}

#[async_trait]
impl RegistryEntry for AutomationTask {
    type Snapshot = TaskSnapshot;
    const KIND: EntityKind = EntityKind::Task;

    fn name(&self) -> &str {
        AutomationTask::name(self)
    }

    async fn snapshot(&self) -> TaskSnapshot {
        AutomationTask::snapshot(self).await
    }
}

/// Ordered, fixed set of uniquely named entities
#[derive(Debug)]
pub struct Registry<E> {
    entries: Vec<Arc<E>>,
}

pub type ProcessRegistry = Registry<AutomationProcess>;
pub type TaskRegistry = Registry<AutomationTask>;

impl<E: RegistryEntry> Registry<E> {
    /// Build a registry, keeping the given order
    pub fn new(entries: impl IntoIterator<Item = E>) -> AutomatorResult<Self> {
        let mut seen = HashSet::new();
        let mut registered = Vec::new();

        for entry in entries {
            if !seen.insert(entry.name().to_string()) {
                return Err(AutomatorError::DuplicateName {
                    kind: E::KIND,
                    name: entry.name().to_string(),
                });
            }
            registered.push(Arc::new(entry));
        }

        Ok(Self {
            entries: registered,
        })
    }

    /// Look up an entity by name
    pub fn get(&self, name: &str) -> AutomatorResult<Arc<E>> {
        self.entries
            .iter()
            .find(|entry| entry.name() == name)
            .cloned()
            .ok_or_else(|| AutomatorError::not_found(E::KIND, name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<E>> {
        self.entries.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshots of every entity, in registration order.
    ///
    /// Each snapshot is consistent on its own; there is no ordering between
    /// entities.
    pub async fn list(&self) -> Vec<E::Snapshot> {
        let mut snapshots = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            snapshots.push(entry.snapshot().await);
        }
        snapshots
    }

    /// Snapshot of a single entity
    pub async fn snapshot_of(&self, name: &str) -> AutomatorResult<E::Snapshot> {
        Ok(self.get(name)?.snapshot().await)
    }
}

impl ProcessRegistry {
    /// Start every process, returning how many were not already running
    pub async fn start_all(&self) -> usize {
        let mut started = 0;
        for process in self.iter() {
            if !process.snapshot().await.status.is_running() {
                process.start().await;
                started += 1;
            }
        }
        info!(started, "Started registered processes");
        started
    }

    /// Signal every running process to stop, returning how many were running
    pub async fn stop_all(&self) -> usize {
        let mut stopped = 0;
        for process in self.iter() {
            if process.snapshot().await.status.is_running() {
                process.stop().await;
                stopped += 1;
            }
        }
        info!(stopped, "Stopped registered processes");
        stopped
    }
}
