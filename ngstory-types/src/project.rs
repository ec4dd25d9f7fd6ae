use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized `projectType` of an Angular project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    #[default]
    Application,
    Library,
}

impl ProjectType {
    /// Absent or unrecognized values fall back to `Application`.
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some("library") => ProjectType::Library,
            _ => ProjectType::Application,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ProjectType::Application => "application",
            ProjectType::Library => "library",
        }
    }
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only view of one entry under `projects`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub name: String,
    /// Relative to the workspace root; empty means the root itself.
    pub root: String,
    pub project_type: ProjectType,
    pub has_addon: bool,
}
