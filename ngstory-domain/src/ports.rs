use anyhow::bail;

/// Interactive questions about the project being integrated.
pub trait ProjectPrompt {
    /// Only consulted when there is more than one candidate, so implementations may assume
    /// `candidates.len() >= 2`.
    fn choose_project(&self, candidates: &[String]) -> anyhow::Result<String>;

    /// Whether `project` should generate component docs with compodoc.
    ///
    /// Asked at most once, after the project is chosen, and only when the caller left it undecided.
    fn use_compodoc(&self, _project: &str) -> anyhow::Result<bool> {
        Ok(false)
    }
}

/// Non-interactive prompt that always answers with a preset project name.
///
/// Used for `--project` and in tests.
#[derive(Debug, Clone, Default)]
pub struct FixedPrompt {
    answer: Option<String>,
    compodoc: bool,
}

impl FixedPrompt {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: Some(answer.into()),
            compodoc: false,
        }
    }

    /// A prompt that fails if it is ever asked to choose a project.
    pub fn unanswered() -> Self {
        Self::default()
    }

    /// Answer the compodoc question with `enabled` instead of `false`.
    pub fn with_compodoc(mut self, enabled: bool) -> Self {
        self.compodoc = enabled;
        self
    }
}

impl ProjectPrompt for FixedPrompt {
    fn choose_project(&self, candidates: &[String]) -> anyhow::Result<String> {
        match &self.answer {
            Some(answer) => Ok(answer.clone()),
            None => bail!(
                "a project choice is required but no prompt is available (candidates: {})",
                candidates.join(", ")
            ),
        }
    }

    fn use_compodoc(&self, _project: &str) -> anyhow::Result<bool> {
        Ok(self.compodoc)
    }
}
