//! CLI input validation functions.
//!
//! These validators are used by clap's `value_parser` attribute to validate
//! user input at parse time, providing immediate feedback for invalid values.

use crate::domain::MAX_TITLE_LENGTH;

/// Validate task id prefix format.
///
/// Delegates to the validator in `commands::init` so the rules live in
/// one place.
pub fn validate_prefix(s: &str) -> Result<String, String> {
    use crate::commands::init;

    let trimmed = s.trim();
    init::validate_prefix(trimmed).map_err(|e| e.to_string())?;
    Ok(trimmed.to_string())
}

/// Validate task id format.
///
/// Expected format: `prefix-suffix` where:
/// - prefix: 2-20 alphanumeric characters
/// - suffix: 1+ alphanumeric characters, hyphens allowed between segments
///
/// Examples: `task-ab3f`, `proj-12x`, `test-a-1`
pub fn validate_task_id(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Task id cannot be empty".to_string());
    }

    let parts: Vec<&str> = s.splitn(2, '-').collect();
    if parts.len() != 2 {
        return Err(format!(
            "Invalid task id format: '{}'. Expected format: prefix-suffix (e.g., task-ab3f)",
            s
        ));
    }

    let prefix = parts[0];
    let suffix = parts[1];

    validate_prefix(prefix).map_err(|e| format!("Task id {}", e.to_lowercase()))?;

    if suffix.is_empty() {
        return Err("Task id suffix cannot be empty".to_string());
    }

    if !suffix
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err("Task id suffix must contain only alphanumerics and hyphens".to_string());
    }

    // No leading/trailing or consecutive hyphens in the suffix.
    if suffix.starts_with('-') {
        return Err("Task id suffix cannot start with a hyphen".to_string());
    }

    if suffix.ends_with('-') {
        return Err("Task id suffix cannot end with a hyphen".to_string());
    }

    if suffix.contains("--") {
        return Err("Task id suffix cannot contain consecutive hyphens".to_string());
    }

    Ok(s.to_string())
}

/// Validate title length and content.
///
/// Titles are single-line and capped at MAX_TITLE_LENGTH characters.
pub fn validate_title(s: &str) -> Result<String, String> {
    let s = s.trim();

    if s.is_empty() {
        return Err("Title cannot be empty".to_string());
    }

    if s.len() > MAX_TITLE_LENGTH {
        return Err(format!(
            "Title cannot exceed {} characters, got {} characters",
            MAX_TITLE_LENGTH,
            s.len()
        ));
    }

    if s.contains('\n') || s.contains('\r') {
        return Err("Title cannot contain newline characters".to_string());
    }

    // Control characters (other than tab) cause display problems.
    if let Some(pos) = s.chars().position(|c| {
        let code = c as u32;
        (code < 0x20 && code != 0x09) || (0x7F..=0x9F).contains(&code)
    }) {
        return Err(format!(
            "Title contains invalid control character at position {}",
            pos
        ));
    }

    Ok(s.to_string())
}

/// Validate description text.
///
/// Multi-line text is fine; control characters other than tab and line
/// breaks are rejected.
pub fn validate_description(s: &str) -> Result<String, String> {
    if let Some(pos) = s.chars().position(|c| {
        let code = c as u32;
        (code < 0x20 && code != 0x09 && code != 0x0A && code != 0x0D)
            || (0x7F..=0x9F).contains(&code)
    }) {
        return Err(format!(
            "Description contains invalid control character at position {}",
            pos
        ));
    }

    Ok(s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_accepts_alphanumerics_and_trims() {
        assert!(validate_prefix("task").is_ok());
        assert!(validate_prefix("AB").is_ok());
        assert_eq!(validate_prefix("  proj  ").unwrap(), "proj");
    }

    #[test]
    fn prefix_rejects_bad_lengths_and_chars() {
        assert!(validate_prefix("a").is_err());
        assert!(validate_prefix("a".repeat(21).as_str()).is_err());
        assert!(validate_prefix("my-proj").is_err());
        assert!(validate_prefix("my proj").is_err());
    }

    #[test]
    fn task_id_accepts_standard_forms() {
        assert!(validate_task_id("task-ab3f").is_ok());
        assert!(validate_task_id("proj-123").is_ok());
        assert!(validate_task_id("test-a-b-c").is_ok());
        assert!(validate_task_id("TEST-xyz").is_ok());
    }

    #[test]
    fn task_id_requires_prefix_suffix_shape() {
        assert!(validate_task_id("").is_err());
        assert!(validate_task_id("taskab3f").is_err());
        assert!(validate_task_id("task-").is_err());
        assert!(validate_task_id("a-123").is_err()); // prefix too short
    }

    #[test]
    fn task_id_rejects_hyphen_edge_cases() {
        assert!(validate_task_id("task--abc").is_err()); // leading hyphen in suffix
        assert!(validate_task_id("task-abc-").is_err()); // trailing
        assert!(validate_task_id("task-a--b").is_err()); // consecutive
        assert!(validate_task_id("task-ab_c").is_err()); // underscore
    }

    #[test]
    fn title_boundary_lengths() {
        assert!(validate_title("A".repeat(200).as_str()).is_ok());
        assert!(validate_title("A".repeat(201).as_str()).is_err());
        assert!(validate_title("").is_err());
        assert!(validate_title("   ").is_err());
    }

    #[test]
    fn title_rejects_newlines_and_control_chars() {
        assert!(validate_title("two\nlines").is_err());
        assert!(validate_title("weird\x00char").is_err());
        assert!(validate_title("tab\tok").is_ok());
    }

    #[test]
    fn description_allows_multiline() {
        assert!(validate_description("Line1\n\tIndented").is_ok());
        assert!(validate_description("").is_ok());
        assert!(validate_description("bad\x00char").is_err());
    }
}
