//! Clap-free settings for the integrate pipeline.

use camino::{Utf8Path, Utf8PathBuf};
use ngstory_domain::{DEFAULT_COMPODOC_VERSION, WEBPACK5_THRESHOLD};
use ngstory_edit::DEFAULT_WORKSPACE_FILE;
use ngstory_types::ToolInfo;
use semver::Version;

/// Package whose installed version decides the pipeline variant.
pub const DEFAULT_DEPENDENCY: &str = "@angular/core";

#[derive(Debug, Clone)]
pub struct IntegrateSettings {
    pub workspace_root: Utf8PathBuf,
    /// Relative to `workspace_root` unless absolute.
    pub workspace_file: Utf8PathBuf,

    // Variant selection
    pub dependency: String,
    pub threshold: Version,

    /// Integrate this project instead of asking. It must exist and not be integrated yet.
    pub project: Option<String>,

    /// Docs tool switch. `None` asks the prompt once the project is chosen.
    pub use_compodoc: Option<bool>,
    pub compodoc_version: String,

    /// Compute the edit and its diff, write nothing.
    pub dry_run: bool,

    pub tool: ToolInfo,
}

impl IntegrateSettings {
    pub fn workspace_path(&self) -> Utf8PathBuf {
        crate::adapters::resolve_under(&self.workspace_root, &self.workspace_file)
    }

    pub fn with_root(root: impl AsRef<Utf8Path>) -> Self {
        Self {
            workspace_root: root.as_ref().to_path_buf(),
            ..Self::default()
        }
    }
}

impl Default for IntegrateSettings {
    fn default() -> Self {
        Self {
            workspace_root: Utf8PathBuf::from("."),
            workspace_file: Utf8PathBuf::from(DEFAULT_WORKSPACE_FILE),
            dependency: DEFAULT_DEPENDENCY.to_string(),
            threshold: WEBPACK5_THRESHOLD,
            project: None,
            use_compodoc: None,
            compodoc_version: DEFAULT_COMPODOC_VERSION.to_string(),
            dry_run: false,
            tool: ToolInfo {
                name: "ngstory".to_string(),
                version: None,
            },
        }
    }
}
