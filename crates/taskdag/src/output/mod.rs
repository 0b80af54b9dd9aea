//! Output formatting for CLI commands.
//!
//! This module provides utilities for formatting command output in both
//! human-readable text format and JSON format for programmatic use.

mod color;

use crate::domain::{Dependency, GraphExport, Task, TaskId};
use serde::Serialize;
use std::env;
use std::io::{self, Write};

use color::{bold, colored_status_icon, colorize_id, colorize_status, dimmed};

/// Configuration for output formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Whether to use ASCII-only icons instead of Unicode.
    pub use_ascii: bool,
    /// Whether to use colors in output.
    pub use_colors: bool,
}

impl OutputConfig {
    /// Create an OutputConfig by reading from environment variables.
    ///
    /// Reads:
    /// - `TASKDAG_ASCII`: Set to "1" or "true" for ASCII-only icons (default: false)
    /// - `NO_COLOR`: Standard env var to disable colors (any value disables colors)
    /// - `TASKDAG_COLOR`: Set to "0" or "false" to disable colors (default: true)
    pub fn from_env() -> Self {
        let use_ascii = match env::var("TASKDAG_ASCII") {
            Ok(v) if v == "1" || v.eq_ignore_ascii_case("true") => true,
            Ok(v) if v == "0" || v.eq_ignore_ascii_case("false") || v.is_empty() => false,
            Ok(v) => {
                tracing::warn!(
                    env_var = "TASKDAG_ASCII",
                    value = %v,
                    "Invalid value (expected '1', 'true', '0', or 'false'), using default"
                );
                false
            }
            Err(_) => false,
        };

        // Respect the NO_COLOR standard (https://no-color.org/); TASKDAG_COLOR
        // gives explicit control.
        let use_colors = env::var("NO_COLOR").is_err()
            && env::var("TASKDAG_COLOR")
                .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                .unwrap_or(true);

        Self {
            use_ascii,
            use_colors,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            use_ascii: false,
            use_colors: true,
        }
    }
}

/// Output format mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable text format
    Text,
    /// JSON format for programmatic use
    Json,
}

/// Print a one-line summary for each task.
pub fn print_tasks(tasks: &[Task], mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let config = OutputConfig::from_env();

    match mode {
        OutputMode::Text => print_tasks_text(&mut handle, tasks, &config),
        OutputMode::Json => print_json_to(&mut handle, tasks),
    }
}

/// Print a task with full details (for the show command).
pub fn print_task_details(
    task: &Task,
    deps: &[Dependency],
    dependents: &[TaskId],
    mode: OutputMode,
) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let config = OutputConfig::from_env();

    match mode {
        OutputMode::Text => print_task_details_text(&mut handle, task, deps, dependents, &config),
        OutputMode::Json => print_json_to(&mut handle, task),
    }
}

/// Print the whole dependency graph.
pub fn print_graph(graph: &GraphExport, mode: OutputMode) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let config = OutputConfig::from_env();

    match mode {
        OutputMode::Text => print_graph_text(&mut handle, graph, &config),
        OutputMode::Json => print_json_to(&mut handle, graph),
    }
}

/// Print a JSON-formatted result for any serializable value
pub fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    print_json_to(&mut handle, value)
}

fn print_json_to<W: Write, T: Serialize + ?Sized>(w: &mut W, value: &T) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(w, "{}", json)
}

fn print_task_line<W: Write>(w: &mut W, task: &Task, config: &OutputConfig) -> io::Result<()> {
    writeln!(
        w,
        "{} {}  {}  {}",
        colored_status_icon(task.status, config),
        colorize_id(task.id.as_str(), config),
        colorize_status(task.status, config),
        task.title
    )
}

fn print_tasks_text<W: Write>(w: &mut W, tasks: &[Task], config: &OutputConfig) -> io::Result<()> {
    if tasks.is_empty() {
        writeln!(w, "No tasks found.")?;
        return Ok(());
    }

    writeln!(w, "Found {} task(s):", tasks.len())?;
    writeln!(w)?;

    for task in tasks {
        print_task_line(w, task, config)?;
    }

    Ok(())
}

fn print_task_details_text<W: Write>(
    w: &mut W,
    task: &Task,
    deps: &[Dependency],
    dependents: &[TaskId],
    config: &OutputConfig,
) -> io::Result<()> {
    // Header: status icon, id and title
    writeln!(
        w,
        "{} {}: {}",
        colored_status_icon(task.status, config),
        colorize_id(task.id.as_str(), config),
        task.title
    )?;

    writeln!(
        w,
        "{}  {}",
        dimmed("Status:", config),
        colorize_status(task.status, config)
    )?;

    writeln!(
        w,
        "{} {}    {} {}",
        dimmed("Created:", config),
        task.created_at.format("%Y-%m-%d %H:%M"),
        dimmed("Updated:", config),
        task.updated_at.format("%Y-%m-%d %H:%M")
    )?;

    if !task.description.is_empty() {
        writeln!(w)?;
        writeln!(w, "{}:", bold("Description", config))?;
        for line in task.description.lines() {
            writeln!(w, "  {line}")?;
        }
    }

    if !deps.is_empty() {
        writeln!(w)?;
        writeln!(w, "{} ({}):", bold("Depends on", config), deps.len())?;
        for dep in deps {
            writeln!(
                w,
                "  → {}",
                colorize_id(dep.depends_on_id.as_str(), config)
            )?;
        }
    }

    if !dependents.is_empty() {
        writeln!(w)?;
        writeln!(w, "{} ({}):", bold("Depended on by", config), dependents.len())?;
        for id in dependents {
            writeln!(w, "  ← {}", colorize_id(id.as_str(), config))?;
        }
    }

    Ok(())
}

fn print_graph_text<W: Write>(
    w: &mut W,
    graph: &GraphExport,
    config: &OutputConfig,
) -> io::Result<()> {
    if graph.nodes.is_empty() {
        writeln!(w, "Graph is empty.")?;
        return Ok(());
    }

    writeln!(
        w,
        "{} node(s), {} edge(s):",
        graph.nodes.len(),
        graph.edges.len()
    )?;
    writeln!(w)?;

    for node in &graph.nodes {
        writeln!(
            w,
            "{} {}  {}  {}",
            colored_status_icon(node.status, config),
            colorize_id(node.id.as_str(), config),
            colorize_status(node.status, config),
            node.title
        )?;
        for edge in graph.edges.iter().filter(|e| e.from == node.id) {
            writeln!(w, "    → {}", colorize_id(edge.to.as_str(), config))?;
        }
    }

    Ok(())
}
