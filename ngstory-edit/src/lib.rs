//! Edit engine for `angular.json`.
//!
//! Responsibilities:
//! - Load the workspace file into an immutable snapshot.
//! - Derive a mutated copy with add-on targets merged into exactly one project. The targets are
//!   spliced into the source text, so every other byte keeps its original formatting.
//! - Commit the mutated copy atomically (temp file + rename) and fingerprint the change.
//! - Generate a unified diff preview for dry runs.
//!
//! The lifecycle is encoded in types: [`LoadedWorkspace`] -> [`MutatedWorkspace`] -> [`WrittenWorkspace`].
//! There is no way back, and a [`MutatedWorkspace`] cannot be mutated a second time.

mod error;
mod projects;
mod splice;
mod style;

pub use error::{WorkspaceError, WorkspaceResult, WriteFailure};

use camino::{Utf8Path, Utf8PathBuf};
use diffy::{DiffOptions, PatchFormatter};
use fs_err as fs;
use ngstory_types::{AddonEntry, FileChange, ProjectSummary};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::io::Write;
use style::JsonStyle;
use tracing::{debug, info, warn};

/// Conventional workspace file name at the workspace root.
pub const DEFAULT_WORKSPACE_FILE: &str = "angular.json";

/// A parsed workspace file, exactly as it was on disk.
#[derive(Debug, Clone)]
pub struct LoadedWorkspace {
    path: Utf8PathBuf,
    source: String,
    doc: Map<String, Value>,
    style: JsonStyle,
}

impl LoadedWorkspace {
    pub fn load(path: &Utf8Path) -> WorkspaceResult<Self> {
        let source = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(WorkspaceError::ConfigNotFound {
                    path: path.to_path_buf(),
                });
            }
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                return Err(WorkspaceError::ConfigMalformed {
                    path: path.to_path_buf(),
                    message: format!("not valid UTF-8: {e}"),
                });
            }
            Err(source) => {
                return Err(WorkspaceError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        Self::parse(path.to_path_buf(), source)
    }

    /// Parse already-read contents; `path` is where a later commit will write.
    pub fn parse(path: Utf8PathBuf, source: String) -> WorkspaceResult<Self> {
        let value: Value = serde_json::from_str(JsonStyle::body(&source)).map_err(|e| {
            WorkspaceError::ConfigMalformed {
                path: path.clone(),
                message: e.to_string(),
            }
        })?;
        let Value::Object(doc) = value else {
            return Err(WorkspaceError::ConfigMalformed {
                path,
                message: "top-level value is not an object".to_string(),
            });
        };

        let style = JsonStyle::detect(&source);
        debug!(
            path = %path,
            projects = projects::projects(&doc).map_or(0, Map::len),
            "loaded workspace"
        );
        Ok(Self {
            path,
            source,
            doc,
            style,
        })
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Projects in declaration order. Empty when `projects` is missing or not an object.
    pub fn list_projects(&self) -> Vec<ProjectSummary> {
        projects::list(&self.doc)
    }

    pub fn project(&self, name: &str) -> Option<ProjectSummary> {
        projects::projects(&self.doc)?
            .get(name)
            .map(|v| projects::summarize(name, v))
    }

    pub fn projects_without_addon(&self) -> Vec<String> {
        self.list_projects()
            .into_iter()
            .filter(|p| !p.has_addon)
            .map(|p| p.name)
            .collect()
    }

    /// Derive a new document with `entry`'s targets set on `project_name`.
    ///
    /// Existing add-on targets are replaced wholesale. Nothing else on the project changes. When the
    /// project has no target map yet, an `architect` map is created. Only the add-on targets are
    /// rendered; the rest of the source is carried over byte for byte.
    pub fn add_entries(
        &self,
        project_name: &str,
        entry: &AddonEntry,
    ) -> WorkspaceResult<MutatedWorkspace> {
        let mut doc = self.doc.clone();

        let project = doc
            .get_mut(projects::PROJECTS_KEY)
            .and_then(Value::as_object_mut)
            .and_then(|p| p.get_mut(project_name))
            .ok_or_else(|| WorkspaceError::UnknownProject {
                name: project_name.to_string(),
                path: self.path.clone(),
            })?;
        let project = project
            .as_object_mut()
            .ok_or_else(|| self.malformed(format!("project '{project_name}' is not an object")))?;

        let targets = self.target_map_mut(project_name, project)?;
        let mut values = Vec::new();
        for (name, target) in entry.targets() {
            let value = serde_json::to_value(target).map_err(|source| WorkspaceError::Serialize {
                target: name.to_string(),
                source,
            })?;
            if targets.insert(name.to_string(), value.clone()).is_some() {
                debug!(project = project_name, target = name, "replaced existing target");
            }
            values.push((name, value));
        }

        let spliced = splice::set_targets(&self.source, &self.style, project_name, &values)
            .filter(|text| same_document(text, &doc));
        let rendered = match spliced {
            Some(text) => text,
            None => {
                debug!(path = %self.path, "cannot edit in place; re-rendering the whole document");
                self.style
                    .render(&doc)
                    .map_err(|e| self.malformed(e.to_string()))?
            }
        };

        Ok(MutatedWorkspace {
            path: self.path.clone(),
            before: self.source.clone(),
            doc,
            rendered,
        })
    }

    /// Commit without a mutation. Performs no I/O, so the file stays byte-identical.
    pub fn write(self) -> WrittenWorkspace {
        warn!(path = %self.path, "write requested without any edit; nothing to do");
        WrittenWorkspace {
            path: self.path,
            contents: self.source,
            change: None,
        }
    }

    fn target_map_mut<'a>(
        &self,
        project_name: &str,
        project: &'a mut Map<String, Value>,
    ) -> WorkspaceResult<&'a mut Map<String, Value>> {
        let existing = projects::TARGET_MAP_KEYS
            .iter()
            .copied()
            .find(|key| project.get(*key).is_some_and(Value::is_object));

        let key = match existing {
            Some(key) => key,
            None => {
                let key = projects::TARGET_MAP_KEYS[0];
                if project.get(key).is_some_and(|v| !v.is_null()) {
                    return Err(self.malformed(format!(
                        "project '{project_name}' has a non-object '{key}' entry"
                    )));
                }
                project.insert(key.to_string(), Value::Object(Map::new()));
                key
            }
        };

        project
            .get_mut(key)
            .and_then(Value::as_object_mut)
            .ok_or_else(|| self.malformed(format!("project '{project_name}' lost its '{key}' map")))
    }

    fn malformed(&self, message: String) -> WorkspaceError {
        WorkspaceError::ConfigMalformed {
            path: self.path.clone(),
            message,
        }
    }
}

/// A workspace with one project's add-on targets applied, not yet on disk.
#[derive(Debug, Clone)]
pub struct MutatedWorkspace {
    path: Utf8PathBuf,
    before: String,
    doc: Map<String, Value>,
    rendered: String,
}

impl MutatedWorkspace {
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Serialized contents that a commit will write.
    pub fn rendered(&self) -> &str {
        &self.rendered
    }

    pub fn list_projects(&self) -> Vec<ProjectSummary> {
        projects::list(&self.doc)
    }

    pub fn has_changes(&self) -> bool {
        self.before != self.rendered
    }

    /// Unified diff between the loaded and the pending contents; empty when nothing changed.
    pub fn preview_patch(&self) -> String {
        let mut out = String::new();
        if !self.has_changes() {
            return out;
        }

        let display = self.path.file_name().unwrap_or(self.path.as_str());
        out.push_str(&format!("diff --git a/{0} b/{0}\n", display));

        let patch = DiffOptions::new()
            .set_original_filename(format!("a/{display}"))
            .set_modified_filename(format!("b/{display}"))
            .create_patch(&self.before, &self.rendered);
        let formatter = PatchFormatter::new();
        out.push_str(&formatter.fmt_patch(&patch).to_string());
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out
    }

    /// Atomically replace the file on disk.
    ///
    /// On failure the original file is untouched and the returned [`WriteFailure`] holds this
    /// workspace, so only the write needs to be retried.
    pub fn write(self) -> Result<WrittenWorkspace, WriteFailure> {
        let change = file_change(&self.path, &self.before, &self.rendered);

        if !self.has_changes() {
            debug!(path = %self.path, "rendered contents identical to source; skipping write");
        } else if let Err(source) = persist_atomically(&self.path, &self.rendered) {
            let error = WorkspaceError::WriteFailed {
                path: self.path.clone(),
                source,
            };
            return Err(WriteFailure {
                workspace: Box::new(self),
                error,
            });
        } else {
            info!(
                path = %self.path,
                bytes = self.rendered.len(),
                "wrote workspace"
            );
        }

        Ok(WrittenWorkspace {
            path: self.path,
            contents: self.rendered,
            change: Some(change),
        })
    }
}

/// Terminal state: the workspace has been committed (or there was nothing to commit).
#[derive(Debug, Clone)]
pub struct WrittenWorkspace {
    path: Utf8PathBuf,
    contents: String,
    change: Option<FileChange>,
}

impl WrittenWorkspace {
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    pub fn contents(&self) -> &str {
        &self.contents
    }

    /// Before/after fingerprints; `None` when no edit was made.
    pub fn file_change(&self) -> Option<&FileChange> {
        self.change.as_ref()
    }
}

/// Whether `text` parses to exactly `doc`.
fn same_document(text: &str, doc: &Map<String, Value>) -> bool {
    matches!(
        serde_json::from_str::<Value>(JsonStyle::body(text)),
        Ok(Value::Object(parsed)) if parsed == *doc
    )
}

fn persist_atomically(path: &Utf8Path, contents: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_str().is_empty() => p,
        _ => Utf8Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".ngstory-")
        .suffix(".json.tmp")
        .tempfile_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.as_file().sync_all()?;

    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file().set_permissions(meta.permissions())?;
    }

    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn file_change(path: &Utf8Path, before: &str, after: &str) -> FileChange {
    FileChange {
        path: path.to_string(),
        before_sha256: sha256_hex(before.as_bytes()),
        after_sha256: sha256_hex(after.as_bytes()),
        before_bytes: before.len() as u64,
        after_bytes: after.len() as u64,
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
