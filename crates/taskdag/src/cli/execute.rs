//! Command execution logic.
//!
//! This module contains the implementation of all CLI commands.

use anyhow::Result;

use super::args::{
    CreateArgs, DeleteArgs, DepAction, DepArgs, GraphArgs, InfoArgs, InitArgs, ListArgs, ShowArgs,
    UpdateArgs,
};
use crate::output::OutputMode;

/// Execute the init command
pub async fn execute_init(args: &InitArgs) -> Result<()> {
    use crate::commands::init;

    let current_dir = std::env::current_dir()?;

    if !args.quiet {
        println!(
            "Initializing taskdag tracker{}...",
            args.prefix
                .as_ref()
                .map(|p| format!(" with prefix '{}'", p))
                .unwrap_or_default()
        );
    }

    let result = init::init(&current_dir, args.prefix.as_deref()).await?;

    if !args.quiet {
        println!("Initialized taskdag in {}", result.taskdag_dir.display());
        println!("  Config: {}", result.config_file.display());
        println!("  Tasks:  {}", result.tasks_file.display());
        println!("  Task prefix: {}", result.prefix);
    }

    Ok(())
}

/// Execute the info command
pub async fn execute_info(
    app: &crate::app::App,
    _args: &InfoArgs,
    output_mode: OutputMode,
) -> Result<()> {
    use crate::domain::{TaskFilter, TaskStatus};
    use crate::output;

    let taskdag_dir = app.taskdag_dir();
    let database_path = taskdag_dir.join("tasks.jsonl");
    let task_prefix = app.prefix();

    // Get task counts in a single pass
    let all_tasks = app.storage().list(&TaskFilter::default()).await?;
    let (total, pending, in_progress, completed, blocked) = all_tasks.iter().fold(
        (0, 0, 0, 0, 0),
        |(t, p, ip, c, b), task| match task.status {
            TaskStatus::Pending => (t + 1, p + 1, ip, c, b),
            TaskStatus::InProgress => (t + 1, p, ip + 1, c, b),
            TaskStatus::Completed => (t + 1, p, ip, c + 1, b),
            TaskStatus::Blocked => (t + 1, p, ip, c, b + 1),
        },
    );

    match output_mode {
        OutputMode::Json => {
            output::print_json(&serde_json::json!({
                "database_path": database_path.display().to_string(),
                "task_prefix": task_prefix,
                "tasks": {
                    "total": total,
                    "pending": pending,
                    "in_progress": in_progress,
                    "completed": completed,
                    "blocked": blocked
                }
            }))?;
        }
        OutputMode::Text => {
            println!("Taskdag Tracker Information");
            println!("===========================");
            println!();
            println!("Database:    {}", database_path.display());
            println!("Task prefix: {}", task_prefix);
            println!();
            println!(
                "Tasks: {} total ({} pending, {} in progress, {} completed, {} blocked)",
                total, pending, in_progress, completed, blocked
            );
        }
    }

    Ok(())
}

/// Execute the create command
pub async fn execute_create(
    app: &mut crate::app::App,
    args: &CreateArgs,
    output_mode: OutputMode,
) -> Result<()> {
    use crate::domain::{NewTask, TaskId};
    use crate::output;

    let new_task = NewTask {
        title: args.title.clone(),
        description: args.description.clone().unwrap_or_default(),
        status: args.status.map(Into::into),
        dependencies: args.deps.iter().map(TaskId::new).collect(),
    };

    let task = app.storage_mut().create(new_task).await?;
    app.save().await?;

    match output_mode {
        OutputMode::Json => {
            output::print_json(&task)?;
        }
        OutputMode::Text => {
            println!("Created task: {}", task.id);
            if !task.dependencies.is_empty() {
                println!(
                    "  Depends on: {}",
                    task.dependencies
                        .iter()
                        .map(|d| d.depends_on_id.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
                println!("  Status: {}", task.status);
            }
        }
    }

    Ok(())
}

/// Execute the list command
pub async fn execute_list(
    app: &crate::app::App,
    args: &ListArgs,
    output_mode: OutputMode,
) -> Result<()> {
    use crate::domain::TaskFilter;
    use crate::output;

    let filter = TaskFilter {
        status: args.status.map(Into::into),
        limit: Some(args.limit),
    };

    let tasks = app.storage().list(&filter).await?;

    output::print_tasks(&tasks, output_mode)?;

    Ok(())
}

/// Execute the show command
pub async fn execute_show(
    app: &crate::app::App,
    args: &ShowArgs,
    output_mode: OutputMode,
) -> Result<()> {
    use crate::domain::TaskId;
    use crate::output;

    let mut results = Vec::new();

    for id_str in &args.task_ids {
        let task_id = TaskId::new(id_str);

        let task = app
            .storage()
            .get(&task_id)
            .await?
            .ok_or_else(|| crate::error::Error::TaskNotFound(task_id.clone()))?;

        let deps = app.storage().get_dependencies(&task_id).await?;
        let dependents = app.storage().get_dependents(&task_id).await?;

        results.push((task, deps, dependents));
    }

    match output_mode {
        OutputMode::Json => {
            // Always return an array for consistent programmatic usage
            let json_results: Vec<_> = results
                .iter()
                .map(|(task, deps, dependents)| {
                    serde_json::json!({
                        "id": task.id.to_string(),
                        "title": task.title,
                        "description": task.description,
                        "status": task.status.as_str(),
                        "created_at": task.created_at,
                        "updated_at": task.updated_at,
                        "dependencies": deps,
                        "dependents": dependents,
                    })
                })
                .collect();
            output::print_json(&json_results)?;
        }
        OutputMode::Text => {
            for (i, (task, deps, dependents)) in results.iter().enumerate() {
                if i > 0 {
                    println!();
                    println!("---");
                    println!();
                }
                output::print_task_details(task, deps, dependents, output_mode)?;
            }
        }
    }

    Ok(())
}

/// Execute the update command
///
/// When the status changes to completed or blocked, the statuses of
/// dependent tasks are re-derived and any changes are reported.
pub async fn execute_update(
    app: &mut crate::app::App,
    args: &UpdateArgs,
    output_mode: OutputMode,
) -> Result<()> {
    use crate::domain::{TaskId, TaskUpdate};
    use crate::output;

    let task_id = TaskId::new(&args.task_id);

    let update = TaskUpdate {
        title: args.title.clone(),
        description: args.description.clone(),
        status: args.status.map(Into::into),
    };

    let (task, changed) = app.storage_mut().update(&task_id, update).await?;
    app.save().await?;

    match output_mode {
        OutputMode::Json => {
            output::print_json(&serde_json::json!({
                "task": task,
                "propagated": changed,
            }))?;
        }
        OutputMode::Text => {
            println!("Updated task: {}", task.id);
            if !changed.is_empty() {
                println!(
                    "Propagation updated {} task(s): {}",
                    changed.len(),
                    changed
                        .iter()
                        .map(|id| id.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
        }
    }

    Ok(())
}

/// Execute the delete command
pub async fn execute_delete(
    app: &mut crate::app::App,
    args: &DeleteArgs,
    output_mode: OutputMode,
) -> Result<()> {
    use crate::domain::TaskId;
    use crate::output;

    let task_id = TaskId::new(&args.task_id);

    // Verify the task exists first
    let task = app
        .storage()
        .get(&task_id)
        .await?
        .ok_or_else(|| crate::error::Error::TaskNotFound(task_id.clone()))?;

    // Confirm deletion unless --force is used
    if !args.force {
        eprint!("Delete task '{}' ({})? [y/N]: ", task.id, task.title);
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        let response = input.trim().to_lowercase();
        if response != "y" && response != "yes" {
            println!("Deletion cancelled.");
            return Ok(());
        }
    }

    app.storage_mut().delete(&task_id).await?;
    app.save().await?;

    match output_mode {
        OutputMode::Json => {
            output::print_json(&serde_json::json!({
                "deleted": args.task_id,
                "status": "success"
            }))?;
        }
        OutputMode::Text => {
            println!("Deleted task: {}", args.task_id);
        }
    }

    Ok(())
}

/// Execute the dep command
pub async fn execute_dep(
    app: &mut crate::app::App,
    args: &DepArgs,
    output_mode: OutputMode,
) -> Result<()> {
    use crate::domain::TaskId;
    use crate::output;

    match &args.action {
        DepAction::Add { from, to } => {
            let from_id = TaskId::new(from);
            let to_id = TaskId::new(to);

            let changed = app.storage_mut().add_dependency(&from_id, &to_id).await?;
            app.save().await?;

            match output_mode {
                OutputMode::Json => {
                    output::print_json(&serde_json::json!({
                        "action": "add",
                        "from": from,
                        "to": to,
                        "propagated": changed,
                        "status": "success"
                    }))?;
                }
                OutputMode::Text => {
                    println!("Added dependency: {} --> {}", from, to);
                    if !changed.is_empty() {
                        println!(
                            "Propagation updated {} task(s): {}",
                            changed.len(),
                            changed
                                .iter()
                                .map(|id| id.to_string())
                                .collect::<Vec<_>>()
                                .join(", ")
                        );
                    }
                }
            }
        }
        DepAction::Remove { from, to } => {
            let from_id = TaskId::new(from);
            let to_id = TaskId::new(to);

            let changed = app
                .storage_mut()
                .remove_dependency(&from_id, &to_id)
                .await?;
            app.save().await?;

            match output_mode {
                OutputMode::Json => {
                    output::print_json(&serde_json::json!({
                        "action": "remove",
                        "from": from,
                        "to": to,
                        "propagated": changed,
                        "status": "success"
                    }))?;
                }
                OutputMode::Text => {
                    println!("Removed dependency: {} --> {}", from, to);
                    if !changed.is_empty() {
                        println!(
                            "Propagation updated {} task(s): {}",
                            changed.len(),
                            changed
                                .iter()
                                .map(|id| id.to_string())
                                .collect::<Vec<_>>()
                                .join(", ")
                        );
                    }
                }
            }
        }
        DepAction::Check { from, to } => {
            let from_id = TaskId::new(from);
            let to_id = TaskId::new(to);

            let cycle = app
                .storage()
                .would_create_cycle(&from_id, &to_id)
                .await?;

            match output_mode {
                OutputMode::Json => {
                    output::print_json(&serde_json::json!({
                        "from": from,
                        "to": to,
                        "would_create_cycle": cycle.is_some(),
                        "cycle_path": cycle,
                    }))?;
                }
                OutputMode::Text => match cycle {
                    Some(path) => {
                        println!(
                            "Adding {} --> {} would create a cycle: {}",
                            from,
                            to,
                            path.iter()
                                .map(|id| id.to_string())
                                .collect::<Vec<_>>()
                                .join(" -> ")
                        );
                    }
                    None => {
                        println!("Adding {} --> {} would not create a cycle", from, to);
                    }
                },
            }
        }
        DepAction::List { task_id, reverse } => {
            let id = TaskId::new(task_id);

            match output_mode {
                OutputMode::Json => {
                    if *reverse {
                        let dependents = app.storage().get_dependents(&id).await?;
                        output::print_json(&dependents)?;
                    } else {
                        let deps = app.storage().get_dependencies(&id).await?;
                        output::print_json(&deps)?;
                    }
                }
                OutputMode::Text => {
                    if *reverse {
                        let dependents = app.storage().get_dependents(&id).await?;
                        if dependents.is_empty() {
                            println!("No tasks depend on {}", task_id);
                        } else {
                            println!("Tasks depending on {} ({}):", task_id, dependents.len());
                            for dep in &dependents {
                                println!("  └── {}", dep);
                            }
                        }
                    } else {
                        let deps = app.storage().get_dependencies(&id).await?;
                        if deps.is_empty() {
                            println!("{} has no dependencies", task_id);
                        } else {
                            println!("Dependencies of {} ({}):", task_id, deps.len());
                            for dep in &deps {
                                println!("  └── {}", dep.depends_on_id);
                            }
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

/// Execute the graph command
pub async fn execute_graph(
    app: &crate::app::App,
    _args: &GraphArgs,
    output_mode: OutputMode,
) -> Result<()> {
    use crate::output;

    let graph = app.storage().export_graph().await?;
    output::print_graph(&graph, output_mode)?;

    Ok(())
}
