//! JSONL persistence for in-memory storage.
//!
//! Loading is resilient: malformed lines, orphaned dependency edges and
//! cycle-forming edges are skipped with a warning instead of failing the
//! whole load, so one bad line never locks a user out of their data.

use super::inner::InMemoryStorageInner;
use crate::domain::{Task, TaskId};
use crate::error::{Error, Result};
use crate::storage::TaskStorage;
use std::path::Path;
use std::sync::Arc;
use taskdag_jsonl::{read_jsonl_resilient, write_jsonl_atomic, Warning as JsonlWarning};
use tokio::sync::Mutex;

/// Non-fatal problems encountered while loading a JSONL file.
///
/// The load continues past each of these; the problematic line or edge is
/// dropped. Callers should surface them to the user, since each one means
/// the file holds data the storage refused.
#[derive(Debug, Clone)]
pub enum LoadWarning {
    /// A line that couldn't be parsed as JSON. The line is skipped.
    MalformedJson {
        /// 1-based line number in the file
        line_number: usize,
        /// Parser error message
        error: String,
    },

    /// A dependency referencing a task that isn't in the file. The edge is
    /// skipped; both tasks (where present) still load.
    OrphanedDependency {
        /// The dependent task
        from: TaskId,
        /// The missing target
        to: TaskId,
    },

    /// A dependency that would close a cycle. The edge is skipped to keep
    /// the loaded graph acyclic.
    CircularDependency {
        /// The dependent task
        from: TaskId,
        /// The dependency target
        to: TaskId,
    },

    /// A task that parsed but failed validation. The whole task is skipped.
    InvalidTaskData {
        /// The offending task
        task_id: TaskId,
        /// 1-based record index among successfully parsed lines
        line_number: usize,
        /// Validation error message
        error: String,
    },
}

fn map_jsonl_err(err: taskdag_jsonl::Error) -> Error {
    match err {
        taskdag_jsonl::Error::Io(io_err) => Error::Io(io_err),
        taskdag_jsonl::Error::Json(json_err) => Error::Json(json_err),
        taskdag_jsonl::Error::InvalidFormat(msg) => Error::Storage(msg),
    }
}

/// Load storage from a JSONL file, one serialized [`Task`] per line.
///
/// Rebuilds both the task map and the dependency graph. Edges are only
/// committed once both endpoints exist and the edge is verified not to
/// close a cycle, so the loaded graph satisfies the acyclic invariant even
/// when the file doesn't.
///
/// Returns the storage together with all warnings gathered along the way.
pub async fn load_from_jsonl(
    path: &Path,
    prefix: String,
) -> Result<(Box<dyn TaskStorage>, Vec<LoadWarning>)> {
    let (parsed_tasks, jsonl_warnings) = read_jsonl_resilient::<Task, _>(path)
        .await
        .map_err(map_jsonl_err)?;

    let mut warnings = Vec::new();
    for warning in jsonl_warnings {
        match warning {
            JsonlWarning::MalformedJson { line_number, error } => {
                warnings.push(LoadWarning::MalformedJson { line_number, error });
            }
        }
    }

    // Drop tasks that parsed but carry invalid data.
    let mut tasks = Vec::new();
    for (index, task) in parsed_tasks.into_iter().enumerate() {
        if let Err(validation_error) = task.validate() {
            warnings.push(LoadWarning::InvalidTaskData {
                task_id: task.id.clone(),
                line_number: index + 1,
                error: validation_error,
            });
            continue;
        }
        tasks.push(task);
    }

    let storage = Arc::new(Mutex::new(InMemoryStorageInner::new(prefix)));
    let mut inner = storage.lock().await;

    // First pass: tasks and graph nodes. Dependency vectors start empty and
    // are rebuilt edge-by-edge below, so the stored vector never lists an
    // edge the graph rejected.
    for task in &tasks {
        inner.add_node(&task.id);
        let mut stored = task.clone();
        stored.dependencies = Vec::new();
        inner.tasks.insert(task.id.clone(), stored);
        inner.id_generator.register_id(task.id.as_str().to_string());
    }

    // Second pass: dependency edges, checked against the graph built so far.
    for task in &tasks {
        for dep in &task.dependencies {
            if !inner.tasks.contains_key(&dep.depends_on_id) {
                warnings.push(LoadWarning::OrphanedDependency {
                    from: task.id.clone(),
                    to: dep.depends_on_id.clone(),
                });
                continue;
            }
            if inner.has_edge(&task.id, &dep.depends_on_id) {
                continue;
            }
            if crate::engine::find_cycle(&*inner, &task.id, &dep.depends_on_id)?.is_some() {
                warnings.push(LoadWarning::CircularDependency {
                    from: task.id.clone(),
                    to: dep.depends_on_id.clone(),
                });
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

    drop(inner);

    Ok((Box::new(storage), warnings))
}

/// Save storage to a JSONL file with an atomic write-then-rename.
///
/// Tasks are written oldest-first so successive saves of the same state
/// produce the same file. Dependency order within a task is preserved
/// as-is; it is the order the engine traverses.
pub async fn save_to_jsonl(storage: &dyn TaskStorage, path: &Path) -> Result<()> {
    let mut tasks = storage.export_all().await?;
    tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

    write_jsonl_atomic(path, &tasks).await.map_err(map_jsonl_err)
}
