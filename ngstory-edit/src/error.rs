//! Error types for ngstory-edit.
//!
//! Load and mutation errors are unrecoverable for a run. A failed write is the one case the caller can
//! retry, which is why [`WriteFailure`] hands the pending workspace back.

use crate::MutatedWorkspace;
use camino::Utf8PathBuf;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("workspace file not found: {path}")]
    ConfigNotFound { path: Utf8PathBuf },

    #[error("could not read workspace file {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("workspace file {path} is malformed: {message}")]
    ConfigMalformed { path: Utf8PathBuf, message: String },

    #[error("project '{name}' is not declared in {path}")]
    UnknownProject { name: String, path: Utf8PathBuf },

    #[error("could not serialize target '{target}': {source}")]
    Serialize {
        target: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {path}: {source}")]
    WriteFailed {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WorkspaceError {
    /// Only write failures leave something worth retrying.
    pub fn is_write_failure(&self) -> bool {
        matches!(self, WorkspaceError::WriteFailed { .. })
    }
}

/// Result type alias using WorkspaceError.
pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

/// A failed commit. The file on disk is untouched and the pending edit can be written again.
pub struct WriteFailure {
    pub(crate) workspace: Box<MutatedWorkspace>,
    pub(crate) error: WorkspaceError,
}

impl WriteFailure {
    pub fn error(&self) -> &WorkspaceError {
        &self.error
    }

    /// Recover the pending workspace for another `write()`.
    pub fn into_workspace(self) -> MutatedWorkspace {
        *self.workspace
    }

    pub fn into_parts(self) -> (MutatedWorkspace, WorkspaceError) {
        (*self.workspace, self.error)
    }
}

impl fmt::Debug for WriteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteFailure")
            .field("path", &self.workspace.path())
            .field("error", &self.error)
            .finish()
    }
}

impl fmt::Display for WriteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

impl std::error::Error for WriteFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
