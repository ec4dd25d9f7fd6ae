use crate::ports::ProjectPrompt;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum SelectError {
    #[error("no eligible project to select")]
    NoEligibleProject,

    #[error("selected project '{0}' is not one of the eligible projects")]
    NotACandidate(String),

    #[error("project prompt failed: {0:#}")]
    Prompt(#[from] anyhow::Error),
}

/// Pick the target project.
///
/// A single candidate is returned without consulting `prompt`.
pub fn select_project_name(
    candidates: &[String],
    prompt: &dyn ProjectPrompt,
) -> Result<String, SelectError> {
    match candidates {
        [] => Err(SelectError::NoEligibleProject),
        [only] => {
            debug!(project = %only, "single eligible project, no prompt needed");
            Ok(only.clone())
        }
        many => {
            debug!(candidates = many.len(), "asking for a project");
            let chosen = prompt.choose_project(many)?;
            if !many.contains(&chosen) {
                return Err(SelectError::NotACandidate(chosen));
            }
            Ok(chosen)
        }
    }
}
