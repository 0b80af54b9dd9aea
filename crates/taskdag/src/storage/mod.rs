//! Storage abstraction layer for taskdag.
//!
//! The storage trait is the seam between the dependency-graph engine and
//! whatever holds the data. Two backends exist:
//!
//! - **In-memory**: HashMap + petgraph, ephemeral
//! - **JSONL**: the in-memory backend wrapped with file persistence
//!
//! The trait is async and object-safe (`Box<dyn TaskStorage>`), mirroring
//! the shape a future database backend would need. Every mutating method
//! runs its whole pipeline (validation, cycle check, commit, status
//! cascade) under one lock acquisition, so a mutation and its propagation
//! are never interleaved with another writer.

use crate::domain::{
    Dependency, GraphExport, NewTask, Task, TaskFilter, TaskId, TaskUpdate,
};
use crate::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

pub mod in_memory;

/// Core storage trait for task management.
///
/// # Method Categories
///
/// - **CRUD**: `create`, `get`, `update`, `delete`
/// - **Dependencies**: `add_dependency`, `remove_dependency`,
///   `get_dependencies`, `get_dependents`, `would_create_cycle`
/// - **Queries**: `list`, `export_graph`
/// - **Batch**: `import_tasks`, `export_all`
/// - **Persistence**: `save`, `reload`
///
/// Dependency mutations and status-changing updates return the ids of
/// tasks whose status was re-derived by the cascade, so callers can report
/// propagation effects.
#[async_trait]
pub trait TaskStorage: Send + Sync {
    // ========== CRUD Operations ==========

    /// Create a new task.
    ///
    /// Generates a unique id, validates any initial dependencies (targets
    /// must exist, no duplicates) and derives the initial status from them.
    ///
    /// # Errors
    ///
    /// - `Error::Storage` if title validation fails
    /// - `Error::TaskNotFound` if a dependency target doesn't exist
    /// - `Error::DuplicateDependency` if the same target is listed twice
    async fn create(&mut self, task: NewTask) -> Result<Task>;

    /// Get a task by id. Returns `None` if it doesn't exist.
    async fn get(&self, id: &TaskId) -> Result<Option<Task>>;

    /// Update an existing task.
    ///
    /// Only fields present in `updates` are modified. A user status change
    /// to `completed` or `blocked` cascades to dependent tasks; the second
    /// element of the result lists every task the cascade changed.
    ///
    /// # Errors
    ///
    /// Returns `Error::TaskNotFound` if the task doesn't exist.
    async fn update(&mut self, id: &TaskId, updates: TaskUpdate) -> Result<(Task, Vec<TaskId>)>;

    /// Delete a task.
    ///
    /// Removes the task and its outgoing dependency edges. Refuses when
    /// other tasks depend on this one.
    ///
    /// # Errors
    ///
    /// - `Error::TaskNotFound` if the task doesn't exist
    /// - `Error::HasDependents` if other tasks depend on it
    async fn delete(&mut self, id: &TaskId) -> Result<()>;

    // ========== Dependency Management ==========

    /// Add a dependency edge: `from` depends on `to`.
    ///
    /// The full add pipeline: existence checks, self-dependency check,
    /// duplicate check, cycle check, then commit followed by a status
    /// recompute on `from` and a cascade. Returns every task whose status
    /// changed (possibly including `from` itself).
    ///
    /// # Errors
    ///
    /// - `Error::TaskNotFound` if either task doesn't exist
    /// - `Error::SelfDependency` if `from == to`
    /// - `Error::DuplicateDependency` if the edge already exists
    /// - `Error::CircularDependency` (with the offending path) if the edge
    ///   would create a cycle
    async fn add_dependency(&mut self, from: &TaskId, to: &TaskId) -> Result<Vec<TaskId>>;

    /// Remove a dependency edge.
    ///
    /// Triggers a status recompute on `from` and a cascade. Removing the
    /// last dependency leaves `from`'s status as-is (it becomes
    /// user-controlled again, whatever it was).
    ///
    /// # Errors
    ///
    /// - `Error::TaskNotFound` if either task doesn't exist
    /// - `Error::DependencyNotFound` if the edge doesn't exist
    async fn remove_dependency(&mut self, from: &TaskId, to: &TaskId) -> Result<Vec<TaskId>>;

    /// Get the tasks `id` depends on, in edge-insertion order.
    async fn get_dependencies(&self, id: &TaskId) -> Result<Vec<Dependency>>;

    /// Get the ids of tasks that depend on `id`.
    async fn get_dependents(&self, id: &TaskId) -> Result<Vec<TaskId>>;

    /// Check whether adding `from -> to` would create a cycle.
    ///
    /// Returns the cycle path when it would, `None` when the edge is safe.
    /// Read-only; never commits anything.
    async fn would_create_cycle(&self, from: &TaskId, to: &TaskId) -> Result<Option<Vec<TaskId>>>;

    // ========== Queries ==========

    /// List tasks matching the given filter, most recent first.
    async fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>>;

    /// Export the whole graph as `{nodes, edges}` for visualization.
    ///
    /// An edge `{from, to}` means "from depends on to". The export is a
    /// consistent snapshot; it never observes a cascade mid-flight.
    async fn export_graph(&self) -> Result<GraphExport>;

    // ========== Batch Operations ==========

    /// Import tasks in bulk (JSONL load). Dependency edges are resolved
    /// after all tasks exist; orphaned or cycle-forming edges are dropped.
    async fn import_tasks(&mut self, tasks: Vec<Task>) -> Result<()>;

    /// Export all tasks, suitable for JSONL serialization.
    async fn export_all(&self) -> Result<Vec<Task>>;

    // ========== Persistence ==========

    /// Save to persistent storage. No-op for the plain in-memory backend.
    ///
    /// Takes `&self` so saves can run from shared references; backends use
    /// interior mutability.
    async fn save(&self) -> Result<()>;

    /// Reload from persistent storage, discarding unsaved in-memory
    /// changes. No-op for the plain in-memory backend.
    async fn reload(&mut self) -> Result<()>;
}

/// Storage backend configuration.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    /// In-memory storage (ephemeral)
    InMemory,

    /// JSONL file storage (persistent)
    Jsonl(PathBuf),
}

/// Wrapper that adds JSONL file persistence to the in-memory backend.
///
/// `save()` writes all tasks to the JSONL file atomically; `reload()`
/// rebuilds the in-memory state from disk.
struct JsonlBackedStorage {
    inner: Box<dyn TaskStorage>,
    path: PathBuf,
    prefix: String,
}

#[async_trait]
impl TaskStorage for JsonlBackedStorage {
    async fn create(&mut self, task: NewTask) -> Result<Task> {
        self.inner.create(task).await
    }

    async fn get(&self, id: &TaskId) -> Result<Option<Task>> {
        self.inner.get(id).await
    }

    async fn update(&mut self, id: &TaskId, updates: TaskUpdate) -> Result<(Task, Vec<TaskId>)> {
        self.inner.update(id, updates).await
    }

    async fn delete(&mut self, id: &TaskId) -> Result<()> {
        self.inner.delete(id).await
    }

    async fn add_dependency(&mut self, from: &TaskId, to: &TaskId) -> Result<Vec<TaskId>> {
        self.inner.add_dependency(from, to).await
    }

    async fn remove_dependency(&mut self, from: &TaskId, to: &TaskId) -> Result<Vec<TaskId>> {
        self.inner.remove_dependency(from, to).await
    }

    async fn get_dependencies(&self, id: &TaskId) -> Result<Vec<Dependency>> {
        self.inner.get_dependencies(id).await
    }

    async fn get_dependents(&self, id: &TaskId) -> Result<Vec<TaskId>> {
        self.inner.get_dependents(id).await
    }

    async fn would_create_cycle(&self, from: &TaskId, to: &TaskId) -> Result<Option<Vec<TaskId>>> {
        self.inner.would_create_cycle(from, to).await
    }

    async fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        self.inner.list(filter).await
    }

    async fn export_graph(&self) -> Result<GraphExport> {
        self.inner.export_graph().await
    }

    async fn import_tasks(&mut self, tasks: Vec<Task>) -> Result<()> {
        self.inner.import_tasks(tasks).await
    }

    async fn export_all(&self) -> Result<Vec<Task>> {
        self.inner.export_all().await
    }

    async fn save(&self) -> Result<()> {
        in_memory::save_to_jsonl(self.inner.as_ref(), &self.path).await
    }

    async fn reload(&mut self) -> Result<()> {
        if self.path.exists() {
            let (new_storage, warnings) =
                in_memory::load_from_jsonl(&self.path, self.prefix.clone()).await?;
            for warning in &warnings {
                tracing::warn!(warning = ?warning, "JSONL reload warning");
            }
            self.inner = new_storage;
        } else {
            // File is gone - reset to empty storage
            self.inner = in_memory::new_in_memory_storage(self.prefix.clone());
        }
        Ok(())
    }
}

/// Create a storage instance for the given backend.
///
/// # Arguments
///
/// * `backend` - The storage backend to use
/// * `prefix` - The prefix for generated task ids (e.g., "task")
///
/// # Errors
///
/// - `Error::Io` if file operations fail (JSONL backend)
/// - `Error::Storage` for backend-specific initialization errors
pub async fn create_storage(
    backend: StorageBackend,
    prefix: String,
) -> Result<Box<dyn TaskStorage>> {
    match backend {
        StorageBackend::InMemory => Ok(in_memory::new_in_memory_storage(prefix)),
        StorageBackend::Jsonl(path) => {
            let inner = if path.exists() {
                let (storage, warnings) = in_memory::load_from_jsonl(&path, prefix.clone()).await?;
                for warning in &warnings {
                    tracing::warn!(warning = ?warning, "JSONL load warning");
                }
                storage
            } else {
                // First run - start from empty storage
                in_memory::new_in_memory_storage(prefix.clone())
            };
            Ok(Box::new(JsonlBackedStorage {
                inner,
                path,
                prefix,
            }))
        }
    }
}
