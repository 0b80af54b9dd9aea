//! Integration tests for in-memory storage.
//!
//! These tests verify the full functionality of the in-memory storage backend,
//! including CRUD operations, dependency management, cycle detection, and
//! status propagation across the dependency graph.

use taskdag::domain::{NewTask, TaskFilter, TaskId, TaskStatus, TaskUpdate};
use taskdag::error::Error;
use taskdag::storage::in_memory::new_in_memory_storage;
use taskdag::storage::TaskStorage;

fn create_test_task(title: &str) -> NewTask {
    NewTask {
        title: title.to_string(),
        description: "Test description".to_string(),
        status: None,
        dependencies: vec![],
    }
}

fn create_task_with_deps(title: &str, deps: Vec<TaskId>) -> NewTask {
    NewTask {
        title: title.to_string(),
        description: String::new(),
        status: None,
        dependencies: deps,
    }
}

// ========== Basic CRUD Tests ==========

#[tokio::test]
async fn test_create_task() {
    let mut storage = new_in_memory_storage("test".to_string());

    let task = storage.create(create_test_task("Test Task")).await.unwrap();

    assert!(task.id.as_str().starts_with("test-"));
    assert_eq!(task.title, "Test Task");
    assert_eq!(task.status, TaskStatus::Pending);
    assert!(task.dependencies.is_empty());
}

#[tokio::test]
async fn test_create_task_with_explicit_status() {
    let mut storage = new_in_memory_storage("test".to_string());

    let new_task = NewTask {
        status: Some(TaskStatus::InProgress),
        ..create_test_task("Started already")
    };
    let task = storage.create(new_task).await.unwrap();

    assert_eq!(task.status, TaskStatus::InProgress);
}

#[tokio::test]
async fn test_create_rejects_missing_dependency() {
    let mut storage = new_in_memory_storage("test".to_string());

    let new_task = create_task_with_deps("Orphan", vec![TaskId::new("test-nonexistent")]);
    let result = storage.create(new_task).await;

    assert!(matches!(result, Err(Error::TaskNotFound(_))));
}

#[tokio::test]
async fn test_get_task() {
    let mut storage = new_in_memory_storage("test".to_string());

    let created = storage.create(create_test_task("Test Task")).await.unwrap();

    let retrieved = storage.get(&created.id).await.unwrap();
    assert!(retrieved.is_some());
    assert_eq!(retrieved.unwrap().title, "Test Task");

    let non_existing = storage.get(&TaskId::new("test-nonexistent")).await.unwrap();
    assert!(non_existing.is_none());
}

#[tokio::test]
async fn test_update_task_fields() {
    let mut storage = new_in_memory_storage("test".to_string());

    let created = storage
        .create(create_test_task("Original Title"))
        .await
        .unwrap();

    let updates = TaskUpdate {
        title: Some("Updated Title".to_string()),
        description: Some("New description".to_string()),
        status: None,
    };

    let (updated, changed) = storage.update(&created.id, updates).await.unwrap();
    assert_eq!(updated.title, "Updated Title");
    assert_eq!(updated.description, "New description");
    assert!(changed.is_empty());
}

#[tokio::test]
async fn test_update_nonexistent_task() {
    let mut storage = new_in_memory_storage("test".to_string());

    let result = storage
        .update(&TaskId::new("test-nope"), TaskUpdate::default())
        .await;
    assert!(matches!(result, Err(Error::TaskNotFound(_))));
}

#[tokio::test]
async fn test_delete_task() {
    let mut storage = new_in_memory_storage("test".to_string());

    let created = storage.create(create_test_task("To Delete")).await.unwrap();

    storage.delete(&created.id).await.unwrap();

    let retrieved = storage.get(&created.id).await.unwrap();
    assert!(retrieved.is_none());
}

#[tokio::test]
async fn test_delete_with_dependents() {
    let mut storage = new_in_memory_storage("test".to_string());

    let base = storage.create(create_test_task("Base")).await.unwrap();
    let dependent = storage.create(create_test_task("Dependent")).await.unwrap();

    storage
        .add_dependency(&dependent.id, &base.id)
        .await
        .unwrap();

    // Deleting the base should fail because another task depends on it
    let result = storage.delete(&base.id).await;
    assert!(matches!(result, Err(Error::HasDependents { .. })));

    // Deleting the dependent first works, then the base becomes deletable
    storage.delete(&dependent.id).await.unwrap();
    storage.delete(&base.id).await.unwrap();
}

// ========== Dependency Tests ==========

#[tokio::test]
async fn test_add_dependency() {
    let mut storage = new_in_memory_storage("test".to_string());

    let a = storage.create(create_test_task("A")).await.unwrap();
    let b = storage.create(create_test_task("B")).await.unwrap();

    storage.add_dependency(&a.id, &b.id).await.unwrap();

    let deps = storage.get_dependencies(&a.id).await.unwrap();
    assert_eq!(deps.len(), 1);
    assert_eq!(deps[0].depends_on_id, b.id);

    let dependents = storage.get_dependents(&b.id).await.unwrap();
    assert_eq!(dependents, vec![a.id]);
}

#[tokio::test]
async fn test_add_dependency_missing_endpoints() {
    let mut storage = new_in_memory_storage("test".to_string());

    let a = storage.create(create_test_task("A")).await.unwrap();
    let ghost = TaskId::new("test-ghost");

    let result = storage.add_dependency(&a.id, &ghost).await;
    assert!(matches!(result, Err(Error::TaskNotFound(_))));

    let result = storage.add_dependency(&ghost, &a.id).await;
    assert!(matches!(result, Err(Error::TaskNotFound(_))));
}

#[tokio::test]
async fn test_add_self_dependency() {
    let mut storage = new_in_memory_storage("test".to_string());

    let a = storage.create(create_test_task("A")).await.unwrap();

    let result = storage.add_dependency(&a.id, &a.id).await;
    assert!(matches!(result, Err(Error::SelfDependency(_))));
}

#[tokio::test]
async fn test_add_duplicate_dependency() {
    let mut storage = new_in_memory_storage("test".to_string());

    let a = storage.create(create_test_task("A")).await.unwrap();
    let b = storage.create(create_test_task("B")).await.unwrap();

    storage.add_dependency(&a.id, &b.id).await.unwrap();
    let result = storage.add_dependency(&a.id, &b.id).await;
    assert!(matches!(result, Err(Error::DuplicateDependency { .. })));
}

#[tokio::test]
async fn test_remove_dependency() {
    let mut storage = new_in_memory_storage("test".to_string());

    let a = storage.create(create_test_task("A")).await.unwrap();
    let b = storage.create(create_test_task("B")).await.unwrap();

    storage.add_dependency(&a.id, &b.id).await.unwrap();
    storage.remove_dependency(&a.id, &b.id).await.unwrap();

    let deps = storage.get_dependencies(&a.id).await.unwrap();
    assert!(deps.is_empty());

    // Removing again reports the missing edge
    let result = storage.remove_dependency(&a.id, &b.id).await;
    assert!(matches!(result, Err(Error::DependencyNotFound { .. })));
}

// ========== Cycle Detection Tests ==========

#[tokio::test]
async fn test_direct_cycle_rejected() {
    let mut storage = new_in_memory_storage("test".to_string());

    let a = storage.create(create_test_task("A")).await.unwrap();
    let b = storage.create(create_test_task("B")).await.unwrap();

    storage.add_dependency(&a.id, &b.id).await.unwrap();

    let result = storage.add_dependency(&b.id, &a.id).await;
    assert!(matches!(result, Err(Error::CircularDependency { .. })));

    // Rejected edge leaves no trace
    let deps = storage.get_dependencies(&b.id).await.unwrap();
    assert!(deps.is_empty());
}

#[tokio::test]
async fn test_transitive_cycle_rejected_with_path() {
    let mut storage = new_in_memory_storage("test".to_string());

    // 3 depends on 5, 5 depends on 7; adding 7 -> 3 closes the loop
    let t3 = storage.create(create_test_task("Three")).await.unwrap();
    let t5 = storage.create(create_test_task("Five")).await.unwrap();
    let t7 = storage.create(create_test_task("Seven")).await.unwrap();

    storage.add_dependency(&t3.id, &t5.id).await.unwrap();
    storage.add_dependency(&t5.id, &t7.id).await.unwrap();

    let result = storage.add_dependency(&t7.id, &t3.id).await;
    match result {
        Err(Error::CircularDependency { from, to, path }) => {
            assert_eq!(from, t7.id);
            assert_eq!(to, t3.id);
            // Closed walk starting and ending at the candidate dependency
            assert_eq!(
                path,
                vec![t3.id.clone(), t5.id.clone(), t7.id.clone(), t3.id.clone()]
            );
        }
        other => panic!("Expected CircularDependency, got {:?}", other),
    }
}

#[tokio::test]
async fn test_would_create_cycle_is_side_effect_free() {
    let mut storage = new_in_memory_storage("test".to_string());

    let a = storage.create(create_test_task("A")).await.unwrap();
    let b = storage.create(create_test_task("B")).await.unwrap();

    storage.add_dependency(&a.id, &b.id).await.unwrap();

    let cycle = storage.would_create_cycle(&b.id, &a.id).await.unwrap();
    assert_eq!(cycle, Some(vec![a.id.clone(), b.id.clone(), a.id.clone()]));

    // Check is read-only: the edge can still be queried and the graph is intact
    let no_cycle = storage.would_create_cycle(&a.id, &b.id).await.unwrap();
    assert!(no_cycle.is_none());
    assert_eq!(storage.get_dependencies(&b.id).await.unwrap().len(), 0);
}

// ========== Status Propagation Tests ==========

#[tokio::test]
async fn test_completing_dependency_advances_chain() {
    let mut storage = new_in_memory_storage("test".to_string());

    // A depends on B, B depends on C
    let c = storage.create(create_test_task("C")).await.unwrap();
    let b = storage
        .create(create_task_with_deps("B", vec![c.id.clone()]))
        .await
        .unwrap();
    let a = storage
        .create(create_task_with_deps("A", vec![b.id.clone()]))
        .await
        .unwrap();

    let update = TaskUpdate {
        status: Some(TaskStatus::Completed),
        ..Default::default()
    };
    let (_, changed) = storage.update(&c.id, update).await.unwrap();

    // B had only completed dependencies and was pending, so it advances
    assert_eq!(changed, vec![b.id.clone()]);
    let b_now = storage.get(&b.id).await.unwrap().unwrap();
    assert_eq!(b_now.status, TaskStatus::InProgress);

    // A still waits on B
    let a_now = storage.get(&a.id).await.unwrap().unwrap();
    assert_eq!(a_now.status, TaskStatus::Pending);
}

#[tokio::test]
async fn test_blocked_dependency_dominates() {
    let mut storage = new_in_memory_storage("test".to_string());

    // X depends on Y and Z
    let y = storage.create(create_test_task("Y")).await.unwrap();
    let z = storage.create(create_test_task("Z")).await.unwrap();
    let x = storage
        .create(create_task_with_deps("X", vec![y.id.clone(), z.id.clone()]))
        .await
        .unwrap();

    let complete = TaskUpdate {
        status: Some(TaskStatus::Completed),
        ..Default::default()
    };
    storage.update(&y.id, complete).await.unwrap();

    let block = TaskUpdate {
        status: Some(TaskStatus::Blocked),
        ..Default::default()
    };
    let (_, changed) = storage.update(&z.id, block).await.unwrap();
    assert_eq!(changed, vec![x.id.clone()]);

    let x_now = storage.get(&x.id).await.unwrap().unwrap();
    assert_eq!(x_now.status, TaskStatus::Blocked);
}

#[tokio::test]
async fn test_blocked_propagates_transitively() {
    let mut storage = new_in_memory_storage("test".to_string());

    // A depends on B, B depends on C; blocking C blocks both
    let c = storage.create(create_test_task("C")).await.unwrap();
    let b = storage
        .create(create_task_with_deps("B", vec![c.id.clone()]))
        .await
        .unwrap();
    let a = storage
        .create(create_task_with_deps("A", vec![b.id.clone()]))
        .await
        .unwrap();

    let block = TaskUpdate {
        status: Some(TaskStatus::Blocked),
        ..Default::default()
    };
    let (_, changed) = storage.update(&c.id, block).await.unwrap();

    assert_eq!(changed, vec![b.id.clone(), a.id.clone()]);
    let b_now = storage.get(&b.id).await.unwrap().unwrap();
    let a_now = storage.get(&a.id).await.unwrap().unwrap();
    assert_eq!(b_now.status, TaskStatus::Blocked);
    assert_eq!(a_now.status, TaskStatus::Blocked);
}

#[tokio::test]
async fn test_manual_status_without_dependencies_sticks() {
    let mut storage = new_in_memory_storage("test".to_string());

    let task = storage.create(create_test_task("Standalone")).await.unwrap();

    let update = TaskUpdate {
        status: Some(TaskStatus::InProgress),
        ..Default::default()
    };
    let (updated, changed) = storage.update(&task.id, update).await.unwrap();

    // No dependents, no dependencies: nothing to propagate, status stays user-set
    assert_eq!(updated.status, TaskStatus::InProgress);
    assert!(changed.is_empty());
}

#[tokio::test]
async fn test_removing_last_dependency_leaves_status() {
    let mut storage = new_in_memory_storage("test".to_string());

    let y = storage.create(create_test_task("Y")).await.unwrap();
    let x = storage
        .create(create_task_with_deps("X", vec![y.id.clone()]))
        .await
        .unwrap();

    let block = TaskUpdate {
        status: Some(TaskStatus::Blocked),
        ..Default::default()
    };
    storage.update(&y.id, block).await.unwrap();
    assert_eq!(
        storage.get(&x.id).await.unwrap().unwrap().status,
        TaskStatus::Blocked
    );

    // Removing the only dependency does not auto-clear the computed status
    storage.remove_dependency(&x.id, &y.id).await.unwrap();
    let x_now = storage.get(&x.id).await.unwrap().unwrap();
    assert_eq!(x_now.status, TaskStatus::Blocked);
    assert!(x_now.dependencies.is_empty());
}

#[tokio::test]
async fn test_unblocking_dependency_recovers_dependents() {
    let mut storage = new_in_memory_storage("test".to_string());

    let y = storage.create(create_test_task("Y")).await.unwrap();
    let x = storage
        .create(create_task_with_deps("X", vec![y.id.clone()]))
        .await
        .unwrap();

    let block = TaskUpdate {
        status: Some(TaskStatus::Blocked),
        ..Default::default()
    };
    storage.update(&y.id, block).await.unwrap();

    // Completing the previously blocked dependency advances X again
    let complete = TaskUpdate {
        status: Some(TaskStatus::Completed),
        ..Default::default()
    };
    let (_, changed) = storage.update(&y.id, complete).await.unwrap();
    assert_eq!(changed, vec![x.id.clone()]);

    let x_now = storage.get(&x.id).await.unwrap().unwrap();
    assert_eq!(x_now.status, TaskStatus::InProgress);
}

#[tokio::test]
async fn test_adding_dependency_recomputes_dependent() {
    let mut storage = new_in_memory_storage("test".to_string());

    let blocked = storage.create(create_test_task("Blocked dep")).await.unwrap();
    let block = TaskUpdate {
        status: Some(TaskStatus::Blocked),
        ..Default::default()
    };
    storage.update(&blocked.id, block).await.unwrap();

    let task = storage.create(create_test_task("Task")).await.unwrap();
    let changed = storage.add_dependency(&task.id, &blocked.id).await.unwrap();

    assert_eq!(changed, vec![task.id.clone()]);
    assert_eq!(
        storage.get(&task.id).await.unwrap().unwrap().status,
        TaskStatus::Blocked
    );
}

// ========== Listing and Export Tests ==========

#[tokio::test]
async fn test_list_with_status_filter() {
    let mut storage = new_in_memory_storage("test".to_string());

    let a = storage.create(create_test_task("A")).await.unwrap();
    storage.create(create_test_task("B")).await.unwrap();

    let complete = TaskUpdate {
        status: Some(TaskStatus::Completed),
        ..Default::default()
    };
    storage.update(&a.id, complete).await.unwrap();

    let filter = TaskFilter {
        status: Some(TaskStatus::Completed),
        limit: None,
    };
    let completed = storage.list(&filter).await.unwrap();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].id, a.id);

    let all = storage.list(&TaskFilter::default()).await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_list_respects_limit() {
    let mut storage = new_in_memory_storage("test".to_string());

    for i in 0..5 {
        storage
            .create(create_test_task(&format!("Task {}", i)))
            .await
            .unwrap();
    }

    let filter = TaskFilter {
        status: None,
        limit: Some(3),
    };
    let tasks = storage.list(&filter).await.unwrap();
    assert_eq!(tasks.len(), 3);
}

#[tokio::test]
async fn test_export_graph() {
    let mut storage = new_in_memory_storage("test".to_string());

    let a = storage.create(create_test_task("A")).await.unwrap();
    let b = storage.create(create_test_task("B")).await.unwrap();
    storage.add_dependency(&a.id, &b.id).await.unwrap();

    let graph = storage.export_graph().await.unwrap();
    assert_eq!(graph.nodes.len(), 2);
    assert_eq!(graph.edges.len(), 1);
    assert_eq!(graph.edges[0].from, a.id);
    assert_eq!(graph.edges[0].to, b.id);
}

#[tokio::test]
async fn test_cascade_depth_limit() {
    let mut storage = new_in_memory_storage("test".to_string());

    // A dependent chain longer than the traversal ceiling; blocking the
    // root flips every link, so the cascade must walk the full chain
    let mut prev = storage.create(create_test_task("root")).await.unwrap();
    let root_id = prev.id.clone();
    for i in 0..60 {
        let next = storage
            .create(create_task_with_deps(&format!("link {}", i), vec![prev.id.clone()]))
            .await
            .unwrap();
        prev = next;
    }

    let block = TaskUpdate {
        status: Some(TaskStatus::Blocked),
        ..Default::default()
    };
    let result = storage.update(&root_id, block).await;
    assert!(matches!(result, Err(Error::CascadeDepthExceeded { .. })));
}
