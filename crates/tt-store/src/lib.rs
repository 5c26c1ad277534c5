//! Storage layer for the time tracker.
//!
//! All projects live in a single JSON document (see [`document`] for the
//! format). Every command follows the same shape: load the whole document,
//! change it in memory, write the whole document back.
//!
//! # Loading
//!
//! A missing file is a fresh install. A file that cannot be read or does not
//! decode is treated the same way: [`Store::load`] logs a warning and starts
//! empty. Use [`Store::try_load_with_clock`] to see the failure instead.
//!
//! # Atomic Writes
//!
//! [`Store::save`] writes to a temp file in the target directory and renames
//! it over the target, so an interrupted save leaves the previous file intact.
//!
//! # Concurrency
//!
//! There is no locking. Two processes saving at the same time race, and the
//! last rename wins.

mod document;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tt_core::{
    Clock, FormatError, Project, ProjectError, StartOutcome, StopOutcome, SystemClock, Timestamp,
};

use crate::document::Document;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store file exists but could not be read.
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The store file could not be written.
    #[error("failed to write {}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The file is not a valid store document.
    #[error("malformed store document: {0}")]
    Decode(#[source] serde_json::Error),
    /// The in-memory projects could not be encoded.
    #[error("failed to encode store document: {0}")]
    Encode(#[source] serde_json::Error),
    /// A persisted time value is invalid.
    #[error(transparent)]
    Format(#[from] FormatError),
    /// Persisted sessions break a project invariant.
    #[error(transparent)]
    Project(#[from] ProjectError),
    /// A persisted session records a duration but no stop time.
    #[error("session starting at {start} has a duration but no stop time")]
    DurationWithoutStop { start: Timestamp },
    /// No project with this name exists.
    #[error("no such project '{name}'")]
    ProjectNotFound { name: String },
}

impl StoreError {
    /// Whether the error only means the named project does not exist.
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ProjectNotFound { .. })
    }
}

/// The collection of projects backed by one JSON file.
#[derive(Debug)]
pub struct Store<C = SystemClock> {
    path: PathBuf,
    projects: Vec<Project>,
    clock: C,
}

impl Store<SystemClock> {
    /// Loads the store at `path` using the system clock.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        Self::load_with_clock(path, SystemClock)
    }
}

impl<C: Clock> Store<C> {
    /// Loads the store at `path`, starting empty if the file is missing or
    /// cannot be decoded.
    pub fn load_with_clock(path: impl Into<PathBuf>, clock: C) -> Self {
        let path = path.into();
        let projects = match read_projects(&path) {
            Ok(projects) => projects,
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "ignoring unreadable store");
                Vec::new()
            }
        };
        Self {
            path,
            projects,
            clock,
        }
    }

    /// Loads the store at `path`, failing on unreadable or malformed files.
    ///
    /// A missing file still yields an empty store.
    pub fn try_load_with_clock(path: impl Into<PathBuf>, clock: C) -> Result<Self, StoreError> {
        let path = path.into();
        let projects = read_projects(&path)?;
        Ok(Self {
            path,
            projects,
            clock,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current time according to the store's clock.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// All projects, in creation order.
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name() == name)
    }

    pub fn active_projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter().filter(|p| p.is_active())
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.projects.iter().position(|p| p.name() == name)
    }

    /// Starts `name`, creating the project if needed, and saves.
    pub fn start_tracking(&mut self, name: &str) -> Result<StartOutcome, StoreError> {
        let now = self.clock.now();
        let outcome = if let Some(index) = self.position(name) {
            self.projects[index].start(now)
        } else {
            let mut project = Project::new(name);
            let outcome = project.start(now);
            self.projects.push(project);
            tracing::info!("created project '{name}'");
            outcome
        };

        self.save()?;
        Ok(outcome)
    }

    /// Stops `name` and saves.
    ///
    /// An unknown name is logged and returned as
    /// [`StoreError::ProjectNotFound`] without touching the file.
    pub fn stop_tracking(&mut self, name: &str) -> Result<StopOutcome, StoreError> {
        let Some(index) = self.position(name) else {
            tracing::warn!("no such project '{name}'");
            return Err(StoreError::ProjectNotFound {
                name: name.to_string(),
            });
        };

        let now = self.clock.now();
        let outcome = self.projects[index].stop(now);
        if let StopOutcome::Stopped { duration } = outcome {
            tracing::debug!(project = name, seconds = duration.num_seconds(), "stopped");
        }

        self.save()?;
        Ok(outcome)
    }

    /// Removes `name` and saves. Performs no confirmation.
    pub fn delete_project(&mut self, name: &str) -> Result<Project, StoreError> {
        let Some(index) = self.position(name) else {
            tracing::warn!("no such project '{name}'");
            return Err(StoreError::ProjectNotFound {
                name: name.to_string(),
            });
        };

        let project = self.projects.remove(index);
        self.save()?;
        tracing::info!("deleted project '{name}'");
        Ok(project)
    }

    /// The document as it would be written by [`Store::save`].
    pub fn to_document_string(&self) -> Result<String, StoreError> {
        let mut content = serde_json::to_string_pretty(&Document::from_projects(&self.projects))
            .map_err(StoreError::Encode)?;
        content.push('\n');
        Ok(content)
    }

    /// Replaces the store file with the current projects.
    pub fn save(&self) -> Result<(), StoreError> {
        let content = self.to_document_string()?;
        let write_error = |source: io::Error| StoreError::Write {
            path: self.path.clone(),
            source,
        };

        let parent_dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent_dir).map_err(write_error)?;

        // Dropping the temp file on any early return removes it.
        let mut temp_file = NamedTempFile::new_in(parent_dir).map_err(write_error)?;
        temp_file
            .write_all(content.as_bytes())
            .map_err(write_error)?;
        temp_file.as_file().sync_all().map_err(write_error)?;
        temp_file
            .persist(&self.path)
            .map_err(|e| write_error(e.error))?;

        tracing::debug!(path = %self.path.display(), projects = self.projects.len(), "saved store");
        Ok(())
    }
}

/// Reads and decodes the store file. A missing file decodes as empty.
fn read_projects(path: &Path) -> Result<Vec<Project>, StoreError> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no store file yet");
            return Ok(Vec::new());
        }
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let document: Document = serde_json::from_str(&content).map_err(StoreError::Decode)?;
    document.into_projects()
}
