use serde::{Deserialize, Serialize};
use std::fmt;

/// Build-pipeline variant the add-on targets are wired for.
///
/// Chosen from the installed framework version; see `ngstory_domain::select_variant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Webpack4,
    Webpack5,
}

impl Variant {
    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Webpack4 => "webpack4",
            Variant::Webpack5 => "webpack5",
        }
    }

    pub fn is_webpack5(self) -> bool {
        matches!(self, Variant::Webpack5)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The pair of targets merged into a project's target map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddonEntry {
    pub serve: TargetEntry,
    pub build: TargetEntry,
}

impl AddonEntry {
    /// Target key whose presence marks a project as already integrated.
    pub const SERVE_TARGET: &'static str = "storybook";
    pub const BUILD_TARGET: &'static str = "build-storybook";

    /// Targets in the order they are written.
    pub fn targets(&self) -> [(&'static str, &TargetEntry); 2] {
        [
            (Self::SERVE_TARGET, &self.serve),
            (Self::BUILD_TARGET, &self.build),
        ]
    }
}

/// One Angular target (`{ "builder": ..., "options": {...} }`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetEntry {
    pub builder: String,
    pub options: TargetOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetOptions {
    pub config_dir: String,
    pub browser_target: String,
    pub compodoc: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compodoc_args: Option<Vec<String>>,

    pub pipeline: Variant,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
}
