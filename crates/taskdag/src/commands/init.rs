//! Implementation of the `init` command.
//!
//! Sets up the `.taskdag/` directory that marks a tracker root: the YAML
//! config, the empty JSONL data file and a `.gitignore`.

use crate::error::{Error, Result};
use crate::storage::StorageBackend;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Default task id prefix if none specified
pub const DEFAULT_PREFIX: &str = "task";

/// Name of the taskdag directory
pub const TASKDAG_DIR_NAME: &str = ".taskdag";

/// Name of the configuration file
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Name of the tasks data file
pub const TASKS_FILE_NAME: &str = "tasks.jsonl";

/// Name of the gitignore file within .taskdag
pub const GITIGNORE_FILE_NAME: &str = ".gitignore";

/// Minimum prefix length
pub const MIN_PREFIX_LENGTH: usize = 2;

/// Maximum prefix length
pub const MAX_PREFIX_LENGTH: usize = 20;

/// Maximum directory depth to traverse when searching for the tracker root
pub const MAX_TRAVERSAL_DEPTH: usize = 256;

/// Configuration file structure for taskdag
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskdagConfig {
    /// Task id prefix (e.g., "task" for "task-ab12")
    #[serde(rename = "task-prefix")]
    pub task_prefix: String,

    /// Storage configuration
    pub storage: StorageConfig,
}

/// Storage configuration section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StorageConfig {
    /// Storage backend type ("jsonl" for in-memory with JSONL persistence)
    pub backend: String,

    /// Path to the data file, relative to the tracker root
    pub data_file: String,
}

impl StorageConfig {
    /// Resolve this configuration into a concrete storage backend, with
    /// the data file path anchored at the tracker root.
    pub fn to_backend(&self, root_dir: &Path) -> Result<StorageBackend> {
        match self.backend.as_str() {
            "memory" => Ok(StorageBackend::InMemory),
            "jsonl" => Ok(StorageBackend::Jsonl(root_dir.join(&self.data_file))),
            other => Err(Error::Config(format!(
                "Unknown storage backend '{}' (expected 'jsonl' or 'memory')",
                other
            ))),
        }
    }
}

impl TaskdagConfig {
    /// Create a new configuration with the given prefix
    pub fn new(prefix: &str) -> Self {
        Self {
            task_prefix: prefix.to_string(),
            storage: StorageConfig {
                backend: "jsonl".to_string(),
                data_file: format!("{}/{}", TASKDAG_DIR_NAME, TASKS_FILE_NAME),
            },
        }
    }

    /// Load configuration from a file
    pub async fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).await?;
        serde_yaml::from_str(&content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Save configuration to a file
    pub async fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("YAML error: {}", e)))?;
        fs::write(path, content).await?;
        Ok(())
    }
}

impl Default for TaskdagConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX)
    }
}

/// Result of the init command
#[derive(Debug)]
pub struct InitResult {
    /// Path to the created taskdag directory
    pub taskdag_dir: PathBuf,
    /// Path to the created config file
    pub config_file: PathBuf,
    /// Path to the created tasks file
    pub tasks_file: PathBuf,
    /// Path to the created gitignore file
    pub gitignore_file: PathBuf,
    /// The prefix used for task ids
    pub prefix: String,
}

/// Validate a task id prefix: 2-20 ASCII alphanumeric characters.
///
/// Expects pre-trimmed input; callers should trim whitespace first.
pub fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.len() < MIN_PREFIX_LENGTH {
        return Err(Error::Config(format!(
            "Prefix must be at least {} characters",
            MIN_PREFIX_LENGTH
        )));
    }

    if prefix.len() > MAX_PREFIX_LENGTH {
        return Err(Error::Config(format!(
            "Prefix cannot exceed {} characters",
            MAX_PREFIX_LENGTH
        )));
    }

    if !prefix.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(Error::Config(
            "Prefix must contain only alphanumeric characters".to_string(),
        ));
    }

    Ok(())
}

/// Initialize a new taskdag tracker in the given directory.
///
/// Creates `.taskdag/` with a config file, an empty `tasks.jsonl` and a
/// `.gitignore`. Refuses when the directory is already initialized.
///
/// # Errors
///
/// - `Error::Config` if `.taskdag/` already exists or the prefix is invalid
/// - `Error::Io` when file system operations fail
pub async fn init(base_dir: &Path, prefix: Option<&str>) -> Result<InitResult> {
    let prefix = prefix.unwrap_or(DEFAULT_PREFIX).trim();
    validate_prefix(prefix)?;

    let taskdag_dir = base_dir.join(TASKDAG_DIR_NAME);

    if taskdag_dir.exists() {
        return Err(Error::Config(format!(
            "Taskdag is already initialized in this directory. Found existing '{}'",
            TASKDAG_DIR_NAME
        )));
    }

    fs::create_dir_all(&taskdag_dir).await?;

    let config_file = taskdag_dir.join(CONFIG_FILE_NAME);
    let config = TaskdagConfig::new(prefix);
    config.save(&config_file).await?;

    let tasks_file = taskdag_dir.join(TASKS_FILE_NAME);
    fs::write(&tasks_file, "").await?;

    let gitignore_file = taskdag_dir.join(GITIGNORE_FILE_NAME);
    let gitignore_content = "\
# Taskdag metadata files that should not be tracked
# The tasks.jsonl file should be tracked for collaboration
";
    fs::write(&gitignore_file, gitignore_content).await?;

    Ok(InitResult {
        taskdag_dir,
        config_file,
        tasks_file,
        gitignore_file,
        prefix: prefix.to_string(),
    })
}

/// Check whether a directory has been initialized with taskdag.
pub fn is_initialized(base_dir: &Path) -> bool {
    base_dir.join(TASKDAG_DIR_NAME).exists()
}

/// Find the tracker root by searching up the directory tree.
///
/// Returns `Some(path)` with the directory containing `.taskdag/`, or
/// `None` if no tracker is found within the depth limit.
pub fn find_taskdag_root(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    let mut depth = 0;

    loop {
        if current.join(TASKDAG_DIR_NAME).exists() {
            return Some(current);
        }

        depth += 1;
        if depth > MAX_TRAVERSAL_DEPTH || !current.pop() {
            return None;
        }
    }
}
