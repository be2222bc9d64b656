//! Error types for bfbuild
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

use crate::core::stage::Project;

/// Child process errors
///
/// Never surfaced past a runner: they are logged and turned into a failed
/// stage outcome.
#[derive(Error, Debug)]
pub enum ProcessError {
    /// The tool could not be started
    #[error("Failed to start '{program}': {error}")]
    Spawn { program: String, error: String },

    /// A standard stream was not captured
    #[error("Failed to capture {stream} of '{program}'")]
    MissingPipe {
        program: String,
        stream: &'static str,
    },

    /// The shared output pipe could not be created
    #[error("Failed to create output pipe for '{program}': {error}")]
    Pipe { program: String, error: String },

    /// Reading from a stream failed
    #[error("Failed to read output of '{program}': {error}")]
    Read { program: String, error: String },

    /// Waiting for the exit status failed
    #[error("Failed to wait for '{program}': {error}")]
    Wait { program: String, error: String },
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to remove directory
    #[error("Failed to remove directory '{path}': {error}")]
    RemoveDir { path: PathBuf, error: String },
}

/// Stage failures reported by the sequencer
#[derive(Error, Debug)]
pub enum StageError {
    /// The configuration tool exited unsuccessfully
    #[error("Failed to generate the {project} Makefiles")]
    Configure { project: Project },

    /// The build tool exited unsuccessfully
    #[error("Failed to build the {project}")]
    Build { project: Project },

    /// Preparing a build workspace failed
    #[error("Failed to prepare the build workspace: {0}")]
    Workspace(#[from] FilesystemError),
}

/// Tool resolution errors
#[derive(Error, Debug)]
pub enum ToolError {
    /// Tool is not on PATH and not a valid path
    #[error("{tool} not found: {error}")]
    NotFound { tool: String, error: String },
}
