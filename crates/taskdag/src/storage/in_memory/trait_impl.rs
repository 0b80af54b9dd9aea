//! TaskStorage trait implementation for in-memory storage.

use super::inner::InMemoryStorageInner;
use super::InMemoryStorage;
use crate::domain::{
    Dependency, GraphEdge, GraphExport, GraphNode, NewTask, Task, TaskFilter, TaskId, TaskStatus,
    TaskUpdate,
};
use crate::engine::{self, GraphAccessor};
use crate::error::{Error, Result};
use crate::storage::TaskStorage;
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;

/// Re-derive `origin`'s status from its dependencies, then cascade to its
/// dependents. Returns every task whose status changed, origin first.
fn apply_propagation(inner: &mut InMemoryStorageInner, origin: &TaskId) -> Result<Vec<TaskId>> {
    let mut changed = Vec::new();

    if engine::recompute_status(inner, origin)?.is_some() {
        changed.push(origin.clone());
    }

    for id in engine::cascade_from(inner, origin)? {
        if !changed.contains(&id) {
            changed.push(id);
        }
    }

    Ok(changed)
}

#[async_trait]
impl TaskStorage for InMemoryStorage {
    async fn create(&mut self, new_task: NewTask) -> Result<Task> {
        let mut inner = self.lock().await;

        // === Phase 1: All validations (no mutations) ===
        new_task
            .validate()
            .map_err(|e| Error::Storage(format!("Validation failed: {}", e)))?;

        for depends_on_id in &new_task.dependencies {
            if !inner.tasks.contains_key(depends_on_id) {
                return Err(Error::TaskNotFound(depends_on_id.clone()));
            }
        }

        // === Phase 2: ID generation ===
        let id = inner.generate_id(&new_task)?;

        // A fresh task has no dependents, so its dependencies can never
        // close a cycle. Duplicate targets are still rejected.
        let mut seen = HashSet::new();
        for depends_on_id in &new_task.dependencies {
            if !seen.insert(depends_on_id.clone()) {
                return Err(Error::DuplicateDependency {
                    from: id.clone(),
                    to: depends_on_id.clone(),
                });
            }
        }

        // === Phase 3: Create the task ===
        let now = Utc::now();
        let task = Task {
            id: id.clone(),
            title: new_task.title,
            description: new_task.description,
            status: new_task.status.unwrap_or(TaskStatus::Pending),
            dependencies: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        inner.add_node(&id);
        inner.tasks.insert(id.clone(), task);

        for depends_on_id in &new_task.dependencies {
            inner.add_edge_unchecked(&id, depends_on_id);
        }

        // Initial dependencies feed straight into the status derivation.
        if !new_task.dependencies.is_empty() {
            engine::recompute_status(&mut *inner, &id)?;
        }

        inner
            .tasks
            .get(&id)
            .cloned()
            .ok_or_else(|| Error::TaskNotFound(id))
    }

    async fn get(&self, id: &TaskId) -> Result<Option<Task>> {
        let inner = self.lock().await;
        Ok(inner.tasks.get(id).cloned())
    }

    async fn update(&mut self, id: &TaskId, updates: TaskUpdate) -> Result<(Task, Vec<TaskId>)> {
        let mut inner = self.lock().await;

        let task = inner
            .tasks
            .get_mut(id)
            .ok_or_else(|| Error::TaskNotFound(id.clone()))?;

        // Apply updates
        if let Some(title) = updates.title {
            task.title = title;
        }
        if let Some(description) = updates.description {
            task.description = description;
        }
        if let Some(status) = updates.status {
            task.status = status;
        }

        task.validate()
            .map_err(|e| Error::Storage(format!("Validation failed: {}", e)))?;

        task.updated_at = Utc::now();

        // A user moving a task to completed or blocked can unblock or block
        // the tasks that depend on it; other statuses have no downstream
        // effect.
        let changed = match updates.status {
            Some(TaskStatus::Completed | TaskStatus::Blocked) => {
                engine::cascade_from(&mut *inner, id)?
            }
            _ => Vec::new(),
        };

        let task = inner
            .tasks
            .get(id)
            .cloned()
            .ok_or_else(|| Error::TaskNotFound(id.clone()))?;

        Ok((task, changed))
    }

    async fn delete(&mut self, id: &TaskId) -> Result<()> {
        let mut inner = self.lock().await;

        if !inner.tasks.contains_key(id) {
            return Err(Error::TaskNotFound(id.clone()));
        }

        let dependents = inner.direct_dependents(id);
        if !dependents.is_empty() {
            return Err(Error::HasDependents {
                task_id: id.clone(),
                count: dependents.len(),
                dependents,
            });
        }

        // Removing the node drops the task's outgoing edges with it.
        inner.remove_node(id);
        inner.tasks.remove(id);

        Ok(())
    }

    async fn add_dependency(&mut self, from: &TaskId, to: &TaskId) -> Result<Vec<TaskId>> {
        let mut inner = self.lock().await;

        // Validation pipeline; nothing is committed until every check passes.
        if !inner.tasks.contains_key(from) {
            return Err(Error::TaskNotFound(from.clone()));
        }
        if !inner.tasks.contains_key(to) {
            return Err(Error::TaskNotFound(to.clone()));
        }
        if from == to {
            return Err(Error::SelfDependency(from.clone()));
        }
        if inner.has_edge(from, to) {
            return Err(Error::DuplicateDependency {
                from: from.clone(),
                to: to.clone(),
            });
        }
        if let Some(path) = engine::find_cycle(&*inner, from, to)? {
            return Err(Error::CircularDependency {
                from: from.clone(),
                to: to.clone(),
                path,
            });
        }

        inner.add_edge_unchecked(from, to);

        apply_propagation(&mut inner, from)
    }

    async fn remove_dependency(&mut self, from: &TaskId, to: &TaskId) -> Result<Vec<TaskId>> {
        let mut inner = self.lock().await;

        inner.remove_edge(from, to)?;

        // If that was the last dependency, the recompute is a no-op and the
        // task keeps its current status.
        apply_propagation(&mut inner, from)
    }

    async fn get_dependencies(&self, id: &TaskId) -> Result<Vec<Dependency>> {
        let inner = self.lock().await;

        let task = inner
            .tasks
            .get(id)
            .ok_or_else(|| Error::TaskNotFound(id.clone()))?;

        Ok(task.dependencies.clone())
    }

    async fn get_dependents(&self, id: &TaskId) -> Result<Vec<TaskId>> {
        let inner = self.lock().await;

        if !inner.tasks.contains_key(id) {
            return Err(Error::TaskNotFound(id.clone()));
        }

        Ok(inner.direct_dependents(id))
    }

    async fn would_create_cycle(&self, from: &TaskId, to: &TaskId) -> Result<Option<Vec<TaskId>>> {
        let inner = self.lock().await;
        engine::find_cycle(&*inner, from, to)
    }

    async fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        let inner = self.lock().await;

        let mut tasks: Vec<Task> = inner
            .tasks
            .values()
            .filter(|task| {
                if let Some(status) = filter.status {
                    if task.status != status {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();

        // Sort by created_at (most recent first)
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        if let Some(limit) = filter.limit {
            tasks.truncate(limit);
        }

        Ok(tasks)
    }

    async fn export_graph(&self) -> Result<GraphExport> {
        let inner = self.lock().await;

        let mut tasks: Vec<&Task> = inner.tasks.values().collect();
        tasks.sort_by(|a, b| a.id.cmp(&b.id));

        let nodes = tasks
            .iter()
            .map(|task| GraphNode {
                id: task.id.clone(),
                title: task.title.clone(),
                status: task.status,
            })
            .collect();

        let edges = tasks
            .iter()
            .flat_map(|task| {
                task.dependencies.iter().map(|dep| GraphEdge {
                    from: task.id.clone(),
                    to: dep.depends_on_id.clone(),
                })
            })
            .collect();

        Ok(GraphExport { nodes, edges })
    }

    async fn import_tasks(&mut self, tasks: Vec<Task>) -> Result<()> {
        let mut inner = self.lock().await;

        // First pass: add all tasks and create nodes. Dependency vectors are
        // emptied and rebuilt edge-by-edge so the stored vector never lists
        // an edge the graph rejected.
        for task in &tasks {
            inner.add_node(&task.id);
            let mut stored = task.clone();
            stored.dependencies = Vec::new();
            inner.tasks.insert(task.id.clone(), stored);
            inner.id_generator.register_id(task.id.as_str().to_string());
        }

        // Second pass: reconstruct dependency edges now that every target
        // can be resolved.
        for task in &tasks {
            for dep in &task.dependencies {
                if !inner.tasks.contains_key(&dep.depends_on_id) {
                    tracing::warn!(
                        from = %task.id,
                        to = %dep.depends_on_id,
                        "skipping orphaned dependency during import"
                    );
                    continue;
                }
                if inner.has_edge(&task.id, &dep.depends_on_id) {
                    continue;
                }
                if engine::find_cycle(&*inner, &task.id, &dep.depends_on_id)?.is_some() {
                    tracing::warn!(
                        from = %task.id,
                        to = %dep.depends_on_id,
                        "skipping cycle-forming dependency during import"
                    );
                    continue;
                }

                let from_node = inner.node_map[&task.id];
                let to_node = inner.node_map[&dep.depends_on_id];
                inner.graph.add_edge(from_node, to_node, ());
                if let Some(stored) = inner.tasks.get_mut(&task.id) {
                    stored.dependencies.push(dep.clone());
                }
            }
        }

        Ok(())
    }

    async fn export_all(&self) -> Result<Vec<Task>> {
        let inner = self.lock().await;
        Ok(inner.tasks.values().cloned().collect())
    }

    async fn save(&self) -> Result<()> {
        // In-memory storage doesn't persist to disk
        Ok(())
    }

    async fn reload(&mut self) -> Result<()> {
        // In-memory storage has no backing store to reload from
        Ok(())
    }
}
