//! Default port implementations.

use crate::ports::DependencySource;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use ngstory_domain::VersionPair;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

pub const PACKAGE_MANIFEST: &str = "package.json";

/// Reads `<root>/package.json`.
#[derive(Debug, Clone)]
pub struct PackageJsonSource {
    pub workspace_root: Utf8PathBuf,
}

impl PackageJsonSource {
    pub fn new(workspace_root: impl Into<Utf8PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
        }
    }

    fn manifest_path(&self) -> Utf8PathBuf {
        self.workspace_root.join(PACKAGE_MANIFEST)
    }
}

impl DependencySource for PackageJsonSource {
    fn versions(&self, package: &str) -> anyhow::Result<VersionPair> {
        let path = self.manifest_path();
        if !path.exists() {
            debug!(path = %path, "no package manifest");
            return Ok(VersionPair::default());
        }

        let text = fs::read_to_string(&path).with_context(|| format!("read {}", path))?;
        let manifest: Value =
            serde_json::from_str(&text).with_context(|| format!("parse {}", path))?;
        Ok(versions_from_manifest(&manifest, package))
    }
}

/// Pull one package's declared versions out of a parsed manifest.
///
/// Non-string values (workspace protocol objects, nulls) count as undeclared.
pub fn versions_from_manifest(manifest: &Value, package: &str) -> VersionPair {
    let declared = |section: &str| {
        manifest
            .get(section)
            .and_then(|deps| deps.get(package))
            .and_then(Value::as_str)
    };
    VersionPair::new(declared("dependencies"), declared("devDependencies"))
}

/// In-memory dependency source for embedding and testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDependencySource {
    versions: HashMap<String, VersionPair>,
}

impl InMemoryDependencySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, package: impl Into<String>, pair: VersionPair) -> Self {
        self.versions.insert(package.into(), pair);
        self
    }

    /// Shorthand for a package declared only under `dependencies`.
    pub fn with_regular(self, package: impl Into<String>, version: &str) -> Self {
        self.with(package, VersionPair::new(Some(version), None))
    }
}

impl DependencySource for InMemoryDependencySource {
    fn versions(&self, package: &str) -> anyhow::Result<VersionPair> {
        Ok(self.versions.get(package).cloned().unwrap_or_default())
    }
}

/// Resolve `path` against `root` unless it is already absolute.
pub fn resolve_under(root: &Utf8Path, path: &Utf8Path) -> Utf8PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}
