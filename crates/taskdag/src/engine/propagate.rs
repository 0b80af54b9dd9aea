//! Status propagation across the dependency graph.
//!
//! [`recompute_status`] re-derives a single task's status from its direct
//! dependencies; [`cascade_from`] pushes that recomputation across every
//! task that transitively depends on a changed one. The cascade uses an
//! explicit worklist rather than recursion, with a defensive depth ceiling:
//! the acyclic invariant guarantees termination, so hitting the ceiling is
//! an internal anomaly, logged and surfaced as an error.

use super::GraphAccessor;
use crate::domain::{TaskId, TaskStatus};
use crate::error::{Error, Result};
use std::collections::VecDeque;
use tracing::error;

/// Hard ceiling on cascade depth. Propagation over an acyclic graph
/// terminates well before this; exceeding it means the graph invariant was
/// violated somewhere.
pub const MAX_CASCADE_DEPTH: usize = 50;

/// Re-derive `id`'s status from its direct dependencies.
///
/// Rules, in order:
///
/// 1. No direct dependencies: the status is user-controlled; do nothing.
/// 2. Any dependency `blocked`: the task becomes `blocked`, unconditionally.
///    Blocking dominates every other state, including finished work.
/// 3. All dependencies `completed`: the task becomes `in_progress`, unless
///    it is already `completed` or `in_progress` (never demote settled work).
/// 4. Otherwise (mixed, none blocked): the task becomes `pending`, with the
///    same settled-work exception.
///
/// Only looks at immediate dependencies; transitive effects come from
/// [`cascade_from`]. Idempotent: a second call with no intervening graph
/// change is a no-op.
///
/// Returns `Some(new_status)` when the status actually changed.
///
/// # Errors
///
/// Returns [`Error::TaskNotFound`] if `id` or one of its dependencies does
/// not exist.
pub fn recompute_status<G: GraphAccessor>(
    graph: &mut G,
    id: &TaskId,
) -> Result<Option<TaskStatus>> {
    let current = graph
        .status(id)
        .ok_or_else(|| Error::TaskNotFound(id.clone()))?;

    let deps = graph.direct_dependencies(id);
    if deps.is_empty() {
        return Ok(None);
    }

    let mut statuses = Vec::with_capacity(deps.len());
    for dep in &deps {
        statuses.push(
            graph
                .status(dep)
                .ok_or_else(|| Error::TaskNotFound(dep.clone()))?,
        );
    }

    let next = if statuses.contains(&TaskStatus::Blocked) {
        TaskStatus::Blocked
    } else if current.is_settled() {
        current
    } else if statuses.iter().all(|s| *s == TaskStatus::Completed) {
        TaskStatus::InProgress
    } else {
        TaskStatus::Pending
    };

    if next == current {
        return Ok(None);
    }

    graph.set_status(id, next);
    Ok(Some(next))
}

/// Cascade status recomputation from `origin` to everything depending on it.
///
/// Recomputes every direct dependent of `origin`; dependents whose status
/// changed have their own dependents enqueued in turn. Each recomputation
/// reads statuses live through the accessor, so later recomputations see
/// earlier updates from the same cascade. Only tasks reachable via
/// depended-on-by edges from `origin` are ever touched.
///
/// Returns the ids whose status changed, in first-change order.
///
/// # Errors
///
/// Returns [`Error::TaskNotFound`] for a missing origin and
/// [`Error::CascadeDepthExceeded`] if the defensive depth ceiling is hit;
/// in the latter case updates already applied are kept.
pub fn cascade_from<G: GraphAccessor>(graph: &mut G, origin: &TaskId) -> Result<Vec<TaskId>> {
    if !graph.contains(origin) {
        return Err(Error::TaskNotFound(origin.clone()));
    }

    let mut changed: Vec<TaskId> = Vec::new();
    let mut queue: VecDeque<(TaskId, usize)> = graph
        .direct_dependents(origin)
        .into_iter()
        .map(|id| (id, 1))
        .collect();

    while let Some((id, depth)) = queue.pop_front() {
        if depth > MAX_CASCADE_DEPTH {
            error!(
                origin = %origin,
                task = %id,
                depth,
                "status cascade exceeded depth ceiling; aborting propagation"
            );
            return Err(Error::CascadeDepthExceeded {
                origin: origin.clone(),
                depth,
            });
        }

        if recompute_status(graph, &id)?.is_some() {
            if !changed.contains(&id) {
                changed.push(id.clone());
            }
            for dependent in graph.direct_dependents(&id) {
                queue.push_back((dependent, depth + 1));
            }
        }
    }

    Ok(changed)
}
