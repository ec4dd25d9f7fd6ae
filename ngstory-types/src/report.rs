use crate::entry::Variant;
use crate::handoff::Handoff;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationReport {
    pub schema: String,
    pub tool: ToolInfo,
    pub workspace_file: String,
    pub project: String,
    pub config_folder: String,
    pub variant: Variant,
    pub dependency_version: semver::Version,

    /// False for dry runs.
    pub applied: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_change: Option<FileChange>,

    pub handoff: Handoff,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolInfo {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileChange {
    pub path: String,
    pub before_sha256: String,
    pub after_sha256: String,
    pub before_bytes: u64,
    pub after_bytes: u64,
}
