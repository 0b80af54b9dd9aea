//! Application context for CLI command execution.
//!
//! The `App` struct owns the storage for one invocation: it finds the
//! tracker root, loads configuration and initializes the backend, then
//! hands commands a place to read and mutate tasks.

use crate::commands::init::{find_taskdag_root, TaskdagConfig, CONFIG_FILE_NAME, TASKDAG_DIR_NAME};
use crate::error::{Error, Result};
use crate::storage::{create_storage, TaskStorage};
use std::path::{Path, PathBuf};

/// Application context for CLI operations.
///
/// Storage is loaded from the tracker directory on creation; mutating
/// commands call [`App::save`] when they're done.
pub struct App {
    /// The storage backend (trait object for polymorphism)
    storage: Box<dyn TaskStorage>,

    /// Path to the taskdag directory (.taskdag)
    taskdag_dir: PathBuf,

    /// Task id prefix from configuration
    prefix: String,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("taskdag_dir", &self.taskdag_dir)
            .field("prefix", &self.prefix)
            .field("storage", &"<dyn TaskStorage>")
            .finish()
    }
}

impl App {
    /// Create an App instance from the given working directory.
    ///
    /// Searches up the directory tree for a `.taskdag/` directory, loads
    /// its configuration and initializes storage.
    ///
    /// # Errors
    ///
    /// - `Error::Config` if no tracker is found or the config is invalid
    /// - Storage errors from loading the data file
    pub async fn from_directory(working_dir: &Path) -> Result<Self> {
        let root_dir = find_taskdag_root(working_dir).ok_or_else(|| {
            Error::Config("Not a taskdag tracker (run 'taskdag init' first)".to_string())
        })?;

        let taskdag_dir = root_dir.join(TASKDAG_DIR_NAME);
        let config_path = taskdag_dir.join(CONFIG_FILE_NAME);

        let config = TaskdagConfig::load(&config_path).await?;

        let backend = config.storage.to_backend(&root_dir)?;
        let storage = create_storage(backend, config.task_prefix.clone()).await?;

        Ok(Self {
            storage,
            taskdag_dir,
            prefix: config.task_prefix,
        })
    }

    /// Get a mutable reference to the storage.
    pub fn storage_mut(&mut self) -> &mut dyn TaskStorage {
        self.storage.as_mut()
    }

    /// Get an immutable reference to the storage.
    pub fn storage(&self) -> &dyn TaskStorage {
        self.storage.as_ref()
    }

    /// Get the task id prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Get the path to the taskdag directory.
    pub fn taskdag_dir(&self) -> &Path {
        &self.taskdag_dir
    }

    /// Save storage state to persistent storage.
    ///
    /// Called after any mutating operation.
    pub async fn save(&self) -> Result<()> {
        self.storage.save().await
    }
}
