//! Cycle detection for candidate dependency edges.
//!
//! Given a candidate edge "`task` depends on `depends_on`", decides whether
//! committing it would close a cycle, and if so returns the exact cycle
//! path. This is the gate that keeps the dependency graph acyclic: an edge
//! is only ever committed after this check passes.

use super::GraphAccessor;
use crate::domain::TaskId;
use crate::error::{Error, Result};
use std::collections::HashSet;

/// A DFS frame: a node on the current path and a cursor into its
/// dependency list.
struct Frame {
    id: TaskId,
    deps: Vec<TaskId>,
    next: usize,
}

/// Check whether adding the edge `task -> depends_on` would create a cycle.
///
/// Performs an iterative depth-first traversal starting at `depends_on`,
/// following existing depends-on edges. Reaching `task` again means the
/// candidate edge would close a cycle.
///
/// Returns `Some(path)` with the cycle path on detection, `None` when the
/// edge is safe. The path starts at `depends_on`, runs through the
/// traversal to the rediscovered `task`, and closes back on `depends_on` -
/// e.g. with existing edges `3 -> 5 -> 7`, adding "7 depends on 3" yields
/// `[3, 5, 7, 3]`. The degenerate self-dependency yields `[task, task]`.
///
/// Ties between multiple reachable cycles are broken by edge-insertion
/// order, so the result is deterministic. Nodes proven cycle-free are
/// memoized within the call; the traversal is O(V+E) and never mutates the
/// graph.
///
/// # Errors
///
/// Returns [`Error::TaskNotFound`] if either id does not exist. This is a
/// precondition violation, not a cycle-detection result.
pub fn find_cycle<G: GraphAccessor>(
    graph: &G,
    task: &TaskId,
    depends_on: &TaskId,
) -> Result<Option<Vec<TaskId>>> {
    if !graph.contains(task) {
        return Err(Error::TaskNotFound(task.clone()));
    }
    if !graph.contains(depends_on) {
        return Err(Error::TaskNotFound(depends_on.clone()));
    }

    // Self-dependency is always a degenerate two-element cycle; decided
    // before any traversal.
    if task == depends_on {
        return Ok(Some(vec![task.clone(), task.clone()]));
    }

    // Nodes fully explored with no cycle found. Shared subgraphs are
    // visited once per call.
    let mut explored: HashSet<TaskId> = HashSet::new();
    // Nodes on the current DFS path. Under the acyclic invariant a
    // traversal can only re-reach the path at `task` itself.
    let mut on_path: HashSet<TaskId> = HashSet::new();

    let mut stack = vec![Frame {
        id: depends_on.clone(),
        deps: graph.direct_dependencies(depends_on),
        next: 0,
    }];
    on_path.insert(depends_on.clone());

    while let Some(frame) = stack.last_mut() {
        if frame.next < frame.deps.len() {
            let candidate = frame.deps[frame.next].clone();
            frame.next += 1;

            if candidate == *task {
                // Cycle found: the current path, the rediscovered task,
                // closed on the candidate dependency.
                let mut path: Vec<TaskId> = stack.iter().map(|f| f.id.clone()).collect();
                path.push(task.clone());
                path.push(depends_on.clone());
                return Ok(Some(path));
            }

            if explored.contains(&candidate) || on_path.contains(&candidate) {
                continue;
            }

            on_path.insert(candidate.clone());
            let deps = graph.direct_dependencies(&candidate);
            stack.push(Frame {
                id: candidate,
                deps,
                next: 0,
            });
        } else if let Some(done) = stack.pop() {
            on_path.remove(&done.id);
            explored.insert(done.id);
        }
    }

    Ok(None)
}
