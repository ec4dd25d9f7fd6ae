//! Read-side helpers over the `projects` mapping.

use ngstory_types::{AddonEntry, ProjectSummary, ProjectType};
use serde_json::{Map, Value};

pub(crate) const PROJECTS_KEY: &str = "projects";

/// Target map keys, in lookup order. Newer workspaces use `targets`.
pub(crate) const TARGET_MAP_KEYS: [&str; 2] = ["architect", "targets"];

pub(crate) fn projects(doc: &Map<String, Value>) -> Option<&Map<String, Value>> {
    doc.get(PROJECTS_KEY).and_then(Value::as_object)
}

pub(crate) fn target_map(project: &Map<String, Value>) -> Option<&Map<String, Value>> {
    TARGET_MAP_KEYS
        .iter()
        .find_map(|key| project.get(*key).and_then(Value::as_object))
}

pub(crate) fn summarize(name: &str, project: &Value) -> ProjectSummary {
    let Some(project) = project.as_object() else {
        return ProjectSummary {
            name: name.to_string(),
            root: String::new(),
            project_type: ProjectType::default(),
            has_addon: false,
        };
    };

    let has_addon = target_map(project)
        .and_then(|targets| targets.get(AddonEntry::SERVE_TARGET))
        .is_some_and(|v| !v.is_null());

    ProjectSummary {
        name: name.to_string(),
        root: project
            .get("root")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        project_type: ProjectType::from_raw(project.get("projectType").and_then(Value::as_str)),
        has_addon,
    }
}

pub(crate) fn list(doc: &Map<String, Value>) -> Vec<ProjectSummary> {
    projects(doc)
        .map(|p| p.iter().map(|(name, v)| summarize(name, v)).collect())
        .unwrap_or_default()
}
