//! Core in-memory storage data structures.
//!
//! The inner structure holds all data and is wrapped in `Arc<Mutex<>>` for
//! thread safety. It is also the storage-side implementation of the
//! engine's [`GraphAccessor`] contract.

use crate::domain::{Dependency, NewTask, Task, TaskId, TaskStatus};
use crate::engine::GraphAccessor;
use crate::error::{Error, Result};
use crate::id_generation::{IdGenerator, IdGeneratorConfig};
use chrono::Utc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::HashMap;

/// Inner storage structure (not thread-safe on its own).
///
/// # Graph Representation
///
/// The dependency graph is kept twice, deliberately:
///
/// - Each task's `dependencies` vector holds its outgoing edges in
///   insertion order. This is the deterministic order the engine traverses.
/// - A petgraph `DiGraph` mirrors the same edges (source depends on
///   target) for O(d) reverse-edge queries and duplicate checks.
///
/// Every mutation keeps the two in sync.
pub(crate) struct InMemoryStorageInner {
    /// Tasks indexed by id for O(1) lookups
    pub(super) tasks: HashMap<TaskId, Task>,

    /// Dependency graph. Edge direction: source (dependent) -> target
    /// (dependency).
    pub(super) graph: DiGraph<TaskId, ()>,

    /// Mapping from TaskId to graph NodeIndex. Every task in `tasks` has
    /// an entry here.
    pub(super) node_map: HashMap<TaskId, NodeIndex>,

    /// Id generator for new tasks
    pub(super) id_generator: IdGenerator,

    /// Prefix for task ids (e.g., "task")
    prefix: String,
}

impl InMemoryStorageInner {
    /// Create a new empty storage instance
    pub(crate) fn new(prefix: String) -> Self {
        let config = IdGeneratorConfig {
            prefix: prefix.clone(),
            database_size: 0,
        };

        Self {
            tasks: HashMap::new(),
            graph: DiGraph::new(),
            node_map: HashMap::new(),
            id_generator: IdGenerator::new(config),
            prefix,
        }
    }

    /// Update the id generator when the task count crosses a length
    /// threshold (500 and 1500). Avoids O(n) re-registration on every
    /// create.
    fn update_id_generator_if_needed(&mut self) {
        let current_size = self.tasks.len();
        let old_size = self.id_generator.database_size();

        let needs_update = match (old_size, current_size) {
            (0..=500, 501..) => true,
            (0..=1500, 1501..) => true,
            (501.., 0..=500) => true,
            (1501.., 0..=1500) => true,
            _ => false,
        };

        if needs_update {
            self.id_generator = IdGenerator::new(IdGeneratorConfig {
                prefix: self.prefix.clone(),
                database_size: current_size,
            });
            for id in self.tasks.keys() {
                self.id_generator.register_id(id.as_str().to_string());
            }
        }
    }

    /// Generate a new unique id for a task
    pub(super) fn generate_id(&mut self, new_task: &NewTask) -> Result<TaskId> {
        self.update_id_generator_if_needed();

        let id_str = self
            .id_generator
            .generate(&new_task.title, &new_task.description)
            .map_err(|e| Error::Storage(format!("id generation failed: {}", e)))?;

        Ok(TaskId::new(id_str))
    }

    /// Add a node for a task id to the graph and node map.
    pub(super) fn add_node(&mut self, id: &TaskId) -> NodeIndex {
        let node = self.graph.add_node(id.clone());
        self.node_map.insert(id.clone(), node);
        node
    }

    /// Remove a task's node from the graph, keeping `node_map` consistent.
    ///
    /// petgraph's `remove_node` moves the last node into the freed slot,
    /// so the displaced task's index must be re-recorded.
    pub(super) fn remove_node(&mut self, id: &TaskId) {
        if let Some(node) = self.node_map.remove(id) {
            self.graph.remove_node(node);
            if let Some(moved) = self.graph.node_weight(node) {
                self.node_map.insert(moved.clone(), node);
            }
        }
    }

    /// Commit an already-validated edge to both representations.
    pub(super) fn add_edge_unchecked(&mut self, from: &TaskId, to: &TaskId) {
        let from_node = self.node_map[from];
        let to_node = self.node_map[to];
        self.graph.add_edge(from_node, to_node, ());

        if let Some(task) = self.tasks.get_mut(from) {
            task.dependencies.push(Dependency {
                depends_on_id: to.clone(),
                created_at: Utc::now(),
            });
            task.updated_at = Utc::now();
        }
    }

    /// Remove an edge from both representations.
    ///
    /// # Errors
    ///
    /// Returns `Error::DependencyNotFound` if the edge doesn't exist.
    pub(super) fn remove_edge(&mut self, from: &TaskId, to: &TaskId) -> Result<()> {
        let from_node = self
            .node_map
            .get(from)
            .ok_or_else(|| Error::TaskNotFound(from.clone()))?;
        let to_node = self
            .node_map
            .get(to)
            .ok_or_else(|| Error::TaskNotFound(to.clone()))?;

        let edge = self.graph.find_edge(*from_node, *to_node).ok_or_else(|| {
            Error::DependencyNotFound {
                from: from.clone(),
                to: to.clone(),
            }
        })?;
        self.graph.remove_edge(edge);

        if let Some(task) = self.tasks.get_mut(from) {
            task.dependencies.retain(|dep| dep.depends_on_id != *to);
            task.updated_at = Utc::now();
        }

        Ok(())
    }

    /// Whether the edge `from -> to` already exists.
    pub(super) fn has_edge(&self, from: &TaskId, to: &TaskId) -> bool {
        match (self.node_map.get(from), self.node_map.get(to)) {
            (Some(f), Some(t)) => self.graph.find_edge(*f, *t).is_some(),
            _ => false,
        }
    }
}

impl GraphAccessor for InMemoryStorageInner {
    fn contains(&self, id: &TaskId) -> bool {
        self.tasks.contains_key(id)
    }

    fn direct_dependencies(&self, id: &TaskId) -> Vec<TaskId> {
        self.tasks
            .get(id)
            .map(|task| {
                task.dependencies
                    .iter()
                    .map(|dep| dep.depends_on_id.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn direct_dependents(&self, id: &TaskId) -> Vec<TaskId> {
        let Some(&node) = self.node_map.get(id) else {
            return Vec::new();
        };

        self.graph
            .edges_directed(node, Direction::Incoming)
            .map(|edge| self.graph[edge.source()].clone())
            .collect()
    }

    fn status(&self, id: &TaskId) -> Option<TaskStatus> {
        self.tasks.get(id).map(|task| task.status)
    }

    fn set_status(&mut self, id: &TaskId, status: TaskStatus) {
        if let Some(task) = self.tasks.get_mut(id) {
            task.status = status;
            task.updated_at = Utc::now();
        }
    }
}
