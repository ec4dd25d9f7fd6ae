//! The integrate pipeline, extracted from the CLI.
//!
//! Every step before the commit is side-effect free: a failure while loading, resolving the
//! variant, or selecting the project leaves the workspace file untouched.

use crate::ports::DependencySource;
use crate::settings::IntegrateSettings;
use camino::Utf8PathBuf;
use ngstory_domain::{
    EntryRequest, HandoffRequest, ProjectPrompt, SelectError, VersionError, config_folder_for,
    plan_addon_entry, plan_handoff, select_project_name, select_variant,
};
use ngstory_edit::{LoadedWorkspace, MutatedWorkspace, WorkspaceError, WrittenWorkspace};
use ngstory_types::{Handoff, IntegrationReport, ProjectSummary, Variant};
use tracing::{debug, info};

/// Error type for pipeline results. Exit code 2 = nothing to do, 1 = everything else.
#[derive(Debug, thiserror::Error)]
pub enum IntegrateError {
    #[error("{path} declares no projects")]
    NoProjects { path: Utf8PathBuf },

    #[error("every project in {path} already has the add-on")]
    AlreadyIntegrated { path: Utf8PathBuf },

    #[error("project '{project}' already has the add-on")]
    ProjectAlreadyIntegrated { project: String },

    #[error("cannot choose a build pipeline: '{package}' is not declared with a usable version")]
    MissingDependency { package: String },

    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error(transparent)]
    Select(#[from] SelectError),

    #[error("{source}")]
    WriteFailed {
        source: WorkspaceError,
        pending: Box<PendingIntegration>,
    },

    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl IntegrateError {
    pub fn exit_code(&self) -> i32 {
        match self {
            IntegrateError::AlreadyIntegrated { .. }
            | IntegrateError::ProjectAlreadyIntegrated { .. } => 2,
            _ => 1,
        }
    }

    /// True only when the edit was computed but could not be committed.
    pub fn is_retryable_write(&self) -> bool {
        matches!(self, IntegrateError::WriteFailed { .. })
    }

    /// Take back the pending edit of a failed write.
    pub fn into_pending(self) -> Option<PendingIntegration> {
        match self {
            IntegrateError::WriteFailed { pending, .. } => Some(*pending),
            _ => None,
        }
    }
}

/// Outcome of `integrate`.
#[derive(Debug, Clone)]
pub struct IntegrateOutcome {
    pub project_name: String,
    pub config_folder: String,
    pub variant: Variant,
    pub report: IntegrationReport,
    pub handoff: Handoff,
    /// Unified diff of the workspace file; empty when nothing changed.
    pub patch: String,
}

/// A computed edit whose commit failed. Pass it to [`retry_write`].
#[derive(Debug)]
pub struct PendingIntegration {
    workspace: MutatedWorkspace,
    outcome: IntegrateOutcome,
}

impl PendingIntegration {
    pub fn workspace(&self) -> &MutatedWorkspace {
        &self.workspace
    }

    /// What the retried write will report once it succeeds.
    pub fn outcome(&self) -> &IntegrateOutcome {
        &self.outcome
    }
}

/// Add the add-on targets to one project of the workspace and commit the file once.
///
/// In dry-run mode the outcome carries the patch and `report.applied` is false.
pub fn integrate(
    settings: &IntegrateSettings,
    deps: &dyn DependencySource,
    prompt: &dyn ProjectPrompt,
) -> Result<IntegrateOutcome, IntegrateError> {
    let path = settings.workspace_path();
    let loaded = LoadedWorkspace::load(&path)?;

    let projects = loaded.list_projects();
    if projects.is_empty() {
        return Err(IntegrateError::NoProjects { path });
    }

    let eligible = eligible_projects(settings, &loaded, &projects)?;
    if eligible.is_empty() {
        return Err(IntegrateError::AlreadyIntegrated { path });
    }

    let pair = deps.versions(&settings.dependency)?;
    let choice = select_variant(&pair, &settings.threshold).map_err(|e| match e {
        VersionError::MissingDependency => IntegrateError::MissingDependency {
            package: settings.dependency.clone(),
        },
    })?;
    debug!(
        dependency = %settings.dependency,
        version = %choice.version,
        variant = %choice.variant,
        "resolved pipeline variant"
    );

    let name = select_project_name(&eligible, prompt)?;
    let project = projects
        .iter()
        .find(|p| p.name == name)
        .ok_or_else(|| WorkspaceError::UnknownProject {
            name: name.clone(),
            path: path.clone(),
        })?;

    let use_compodoc = match settings.use_compodoc {
        Some(decided) => decided,
        None => prompt.use_compodoc(&project.name)?,
    };

    let config_folder = config_folder_for(&project.root);
    let compodoc_version = use_compodoc.then_some(settings.compodoc_version.as_str());

    let entry = plan_addon_entry(&EntryRequest {
        project: &project.name,
        root: &project.root,
        config_folder: &config_folder,
        variant: choice.variant,
        use_compodoc,
        project_count: projects.len(),
    });
    let handoff = plan_handoff(&HandoffRequest {
        project,
        config_folder: &config_folder,
        variant: choice.variant,
        compodoc_version,
        project_count: projects.len(),
    });

    let mutated = loaded.add_entries(&project.name, &entry)?;
    let patch = mutated.preview_patch();

    let outcome = IntegrateOutcome {
        project_name: project.name.clone(),
        config_folder: config_folder.clone(),
        variant: choice.variant,
        report: IntegrationReport {
            schema: ngstory_types::schema::NGSTORY_REPORT_V1.to_string(),
            tool: settings.tool.clone(),
            workspace_file: path.to_string(),
            project: project.name.clone(),
            config_folder,
            variant: choice.variant,
            dependency_version: choice.version,
            applied: false,
            file_change: None,
            handoff: handoff.clone(),
        },
        handoff,
        patch,
    };

    if settings.dry_run {
        info!(project = %outcome.project_name, "dry run; workspace not written");
        return Ok(outcome);
    }

    commit(PendingIntegration {
        workspace: mutated,
        outcome,
    })
}

/// Re-attempt only the commit of an edit whose write failed.
pub fn retry_write(pending: PendingIntegration) -> Result<IntegrateOutcome, IntegrateError> {
    debug!(path = %pending.workspace.path(), "retrying workspace write");
    commit(pending)
}

fn commit(pending: PendingIntegration) -> Result<IntegrateOutcome, IntegrateError> {
    let PendingIntegration { workspace, outcome } = pending;
    match workspace.write() {
        Ok(written) => Ok(finish(outcome, &written)),
        Err(failure) => {
            let (workspace, source) = failure.into_parts();
            Err(IntegrateError::WriteFailed {
                source,
                pending: Box::new(PendingIntegration { workspace, outcome }),
            })
        }
    }
}

fn finish(mut outcome: IntegrateOutcome, written: &WrittenWorkspace) -> IntegrateOutcome {
    outcome.report.applied = true;
    outcome.report.file_change = written.file_change().cloned();
    info!(
        project = %outcome.project_name,
        variant = %outcome.variant,
        path = %written.path(),
        "integrated add-on"
    );
    outcome
}

/// Names of the projects `integrate` may pick from, in declaration order.
///
/// With a requested project the list is that project alone.
fn eligible_projects(
    settings: &IntegrateSettings,
    loaded: &LoadedWorkspace,
    projects: &[ProjectSummary],
) -> Result<Vec<String>, IntegrateError> {
    let Some(requested) = settings.project.as_deref() else {
        return Ok(loaded.projects_without_addon());
    };

    match projects.iter().find(|p| p.name == requested) {
        None => Err(WorkspaceError::UnknownProject {
            name: requested.to_string(),
            path: loaded.path().to_path_buf(),
        }
        .into()),
        Some(p) if p.has_addon => Err(IntegrateError::ProjectAlreadyIntegrated {
            project: p.name.clone(),
        }),
        Some(p) => Ok(vec![p.name.clone()]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn exit_codes() {
        let blocked = IntegrateError::AlreadyIntegrated {
            path: "angular.json".into(),
        };
        assert_eq!(blocked.exit_code(), 2);
        assert!(!blocked.is_retryable_write());

        let missing = IntegrateError::MissingDependency {
            package: "@angular/core".to_string(),
        };
        assert_eq!(missing.exit_code(), 1);
        assert!(missing.to_string().contains("@angular/core"));

        let malformed = IntegrateError::from(WorkspaceError::ConfigMalformed {
            path: "angular.json".into(),
            message: "eof".to_string(),
        });
        assert_eq!(malformed.exit_code(), 1);
        assert!(malformed.into_pending().is_none());
    }

    #[test]
    fn internal_errors_show_context_chain() {
        let err = IntegrateError::from(
            anyhow::Error::new(io::Error::other("denied")).context("read package.json"),
        );
        assert_eq!(err.to_string(), "read package.json: denied");
    }
}
