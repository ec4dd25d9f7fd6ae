use crate::entry::Variant;
use serde::{Deserialize, Serialize};

/// Everything the package-manager and template-copy collaborators need after the workspace edit.
///
/// This is data only; nothing here has been executed when an integration returns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Handoff {
    /// Scripts to register in `package.json`. Only filled for single-project workspaces.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scripts: Vec<PackageScript>,

    /// Additional `name@version` packages to install.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_packages: Vec<String>,

    /// Template directory, relative to the template store (`templates/angular/<type>`).
    pub template_dir: String,

    /// Where templates land; `None` means the workspace root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_destination: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components_destination: Option<String>,

    pub config_folder: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_prefix: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub core_builder: Option<Variant>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageScript {
    pub name: String,
    pub command: String,
}
