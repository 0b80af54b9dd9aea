//! In-memory storage implementation for taskdag.
//!
//! This module provides a fast, **ephemeral** storage implementation where
//! all data lives in process memory. It is the data structure behind the
//! JSONL backend too, which adds file persistence around it.
//!
//! # Implementation
//!
//! - `HashMap<TaskId, Task>` for O(1) task lookups
//! - petgraph `DiGraph` mirroring the dependency edges, for O(d) dependent
//!   queries and duplicate-edge checks
//! - Each task's `dependencies` vector keeps its outgoing edges in
//!   insertion order, which is the order the engine traverses
//!
//! # Thread Safety
//!
//! The storage is wrapped in `Arc<Mutex<InMemoryStorageInner>>`. Every
//! mutating operation runs its full pipeline (validation, cycle check,
//! commit, status propagation) under a single lock acquisition, so readers
//! never observe a cascade mid-flight.

mod inner;
mod jsonl;
mod trait_impl;

use crate::storage::TaskStorage;
use inner::InMemoryStorageInner;
use std::sync::Arc;
use tokio::sync::Mutex;

pub use jsonl::{load_from_jsonl, save_to_jsonl, LoadWarning};

/// Thread-safe in-memory storage.
///
/// Implements [`TaskStorage`] via the trait implementation in
/// `trait_impl.rs`; the engine sees the inner structure through its graph
/// accessor contract.
pub(crate) type InMemoryStorage = Arc<Mutex<InMemoryStorageInner>>;

/// Create a new empty in-memory storage.
///
/// # Arguments
///
/// * `prefix` - The prefix for generated task ids (e.g., "task")
pub fn new_in_memory_storage(prefix: String) -> Box<dyn TaskStorage> {
    Box::new(Arc::new(Mutex::new(InMemoryStorageInner::new(prefix))))
}
