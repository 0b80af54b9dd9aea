//! Color and styling helpers for CLI output.
//!
//! Semantic Color Theme:
//!   - Done:          green   (completed status)
//!   - Active:        yellow  (in_progress status)
//!   - Error/Blocked: red     (blocked status)
//!   - Info/Reference: cyan   (task ids)
//!   - Muted:         dimmed  (field labels, connectors)
//!   - Emphasis:      bold    (section headers)
//!   - Default:       white   (pending status)

use crate::domain::TaskStatus;
use colored::Colorize;

use super::OutputConfig;

/// Apply color to status text based on task status.
pub(crate) fn colorize_status(status: TaskStatus, config: &OutputConfig) -> String {
    let text = status.as_str().to_string();
    if !config.use_colors {
        return text;
    }
    match status {
        TaskStatus::Pending => text.white().to_string(),
        TaskStatus::InProgress => text.yellow().to_string(),
        TaskStatus::Blocked => text.red().to_string(),
        TaskStatus::Completed => text.green().to_string(),
    }
}

/// Colorize a task id (cyan).
pub(crate) fn colorize_id(id: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return id.to_string();
    }
    id.cyan().to_string()
}

/// Get a colored status icon, with ASCII fallback support.
pub(crate) fn colored_status_icon(status: TaskStatus, config: &OutputConfig) -> String {
    let icon = if config.use_ascii {
        match status {
            TaskStatus::Pending => "o",
            TaskStatus::InProgress => ">",
            TaskStatus::Blocked => "x",
            TaskStatus::Completed => "+",
        }
    } else {
        match status {
            TaskStatus::Pending => "○",
            TaskStatus::InProgress => "▶",
            TaskStatus::Blocked => "✗",
            TaskStatus::Completed => "✓",
        }
    };

    if !config.use_colors {
        return icon.to_string();
    }

    match status {
        TaskStatus::Pending => icon.white().to_string(),
        TaskStatus::InProgress => icon.yellow().to_string(),
        TaskStatus::Blocked => icon.red().to_string(),
        TaskStatus::Completed => icon.green().to_string(),
    }
}

/// Dim muted text such as field labels.
pub(crate) fn dimmed(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.dimmed().to_string()
}

/// Bold emphasis for section headers.
pub(crate) fn bold(text: &str, config: &OutputConfig) -> String {
    if !config.use_colors {
        return text.to_string();
    }
    text.bold().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_color_config_passes_text_through() {
        let config = OutputConfig {
            use_ascii: false,
            use_colors: false,
        };
        assert_eq!(colorize_status(TaskStatus::Blocked, &config), "blocked");
        assert_eq!(colorize_id("task-ab12", &config), "task-ab12");
        assert_eq!(dimmed("Status:", &config), "Status:");
        assert_eq!(bold("Dependencies", &config), "Dependencies");
    }

    #[test]
    fn ascii_icons_avoid_unicode() {
        let config = OutputConfig {
            use_ascii: true,
            use_colors: false,
        };
        for status in [
            TaskStatus::Pending,
            TaskStatus::InProgress,
            TaskStatus::Blocked,
            TaskStatus::Completed,
        ] {
            assert!(colored_status_icon(status, &config).is_ascii());
        }
    }
}
