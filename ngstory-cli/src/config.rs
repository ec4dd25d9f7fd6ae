//! Configuration file loading for ngstory.
//!
//! Discovers and loads `ngstory.toml` from the workspace root.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use ngstory_core::settings::DEFAULT_DEPENDENCY;
use ngstory_domain::{DEFAULT_COMPODOC_VERSION, WEBPACK5_THRESHOLD};
use ngstory_edit::DEFAULT_WORKSPACE_FILE;
use semver::Version;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "ngstory.toml";

/// Top-level configuration from ngstory.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NgstoryConfig {
    pub workspace: WorkspaceConfig,
    pub dependency: DependencyConfig,
    pub compodoc: CompodocConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct WorkspaceConfig {
    /// Workspace file, relative to the workspace root.
    pub file: Option<Utf8PathBuf>,
}

/// Which package decides the build pipeline, and where the cut-over is.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DependencyConfig {
    pub name: Option<String>,

    /// Loose version string; coerced like a manifest entry.
    pub threshold: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CompodocConfig {
    /// Unset means "ask" on a terminal and "no" otherwise.
    pub enabled: Option<bool>,
    pub version: Option<String>,
}

/// Discover the ngstory.toml config file.
///
/// Returns `None` if there is no config file in the workspace root.
pub fn discover_config(workspace_root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = workspace_root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

pub fn load_config(path: &Utf8Path) -> anyhow::Result<NgstoryConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

pub fn parse_config(contents: &str) -> anyhow::Result<NgstoryConfig> {
    let config: NgstoryConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from the workspace root, or return default if not found.
pub fn load_or_default(workspace_root: &Utf8Path) -> anyhow::Result<NgstoryConfig> {
    match discover_config(workspace_root) {
        Some(path) => load_config(&path),
        None => Ok(NgstoryConfig::default()),
    }
}

/// Merged configuration combining config file and CLI arguments.
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub workspace_file: Utf8PathBuf,
    pub dependency: String,
    pub threshold: Version,

    /// `None` when neither the file nor a flag decided it.
    pub use_compodoc: Option<bool>,
    pub compodoc_version: String,
}

/// Compodoc-related flags of `init`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompodocFlags {
    pub compodoc: bool,
    pub no_compodoc: bool,
    pub yes: bool,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: NgstoryConfig,
}

impl ConfigMerger {
    pub fn new(config: NgstoryConfig) -> Self {
        Self { config }
    }

    /// Merge with `init` arguments.
    ///
    /// `--compodoc`/`--no-compodoc` override the file. `--yes` only fills in what is still
    /// undecided, so an explicit `enabled = false` in the file survives it.
    pub fn merge_init_args(
        self,
        cli_workspace_file: Option<&Utf8Path>,
        flags: CompodocFlags,
    ) -> anyhow::Result<MergedConfig> {
        let threshold = match self.config.dependency.threshold.as_deref() {
            Some(raw) => ngstory_domain::coerce_version(raw)
                .with_context(|| format!("dependency.threshold '{raw}' is not a version"))?,
            None => WEBPACK5_THRESHOLD,
        };

        let use_compodoc = if flags.compodoc {
            Some(true)
        } else if flags.no_compodoc {
            Some(false)
        } else {
            match self.config.compodoc.enabled {
                Some(enabled) => Some(enabled),
                None if flags.yes => Some(true),
                None => None,
            }
        };

        Ok(MergedConfig {
            workspace_file: cli_workspace_file
                .map(Utf8Path::to_path_buf)
                .or(self.config.workspace.file)
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_WORKSPACE_FILE)),
            dependency: self
                .config
                .dependency
                .name
                .unwrap_or_else(|| DEFAULT_DEPENDENCY.to_string()),
            threshold,
            use_compodoc,
            compodoc_version: self
                .config
                .compodoc
                .version
                .unwrap_or_else(|| DEFAULT_COMPODOC_VERSION.to_string()),
        })
    }

    /// Workspace file for commands that only read.
    pub fn workspace_file(&self, cli_workspace_file: Option<&Utf8Path>) -> Utf8PathBuf {
        cli_workspace_file
            .map(Utf8Path::to_path_buf)
            .or_else(|| self.config.workspace.file.clone())
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_WORKSPACE_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let contents = r#"
[workspace]
file = "config/angular.json"

[dependency]
name = "@angular/cli"
threshold = "^12.1"

[compodoc]
enabled = true
version = "1.1.21"
"#;

        let config = parse_config(contents).unwrap();
        assert_eq!(
            config.workspace.file.as_deref(),
            Some(Utf8Path::new("config/angular.json"))
        );
        assert_eq!(config.dependency.name.as_deref(), Some("@angular/cli"));
        assert_eq!(config.compodoc.enabled, Some(true));

        let merged = ConfigMerger::new(config)
            .merge_init_args(None, CompodocFlags::default())
            .unwrap();
        assert_eq!(merged.workspace_file, "config/angular.json");
        assert_eq!(merged.dependency, "@angular/cli");
        assert_eq!(merged.threshold, Version::new(12, 1, 0));
        assert_eq!(merged.use_compodoc, Some(true));
        assert_eq!(merged.compodoc_version, "1.1.21");
    }

    #[test]
    fn test_parse_empty_config() {
        let merged = ConfigMerger::new(parse_config("").unwrap())
            .merge_init_args(None, CompodocFlags::default())
            .unwrap();
        assert_eq!(merged.workspace_file, "angular.json");
        assert_eq!(merged.dependency, "@angular/core");
        assert_eq!(merged.threshold, WEBPACK5_THRESHOLD);
        assert_eq!(merged.use_compodoc, None);
        assert_eq!(merged.compodoc_version, "1.1.19");
    }

    #[test]
    fn test_wrong_value_type_is_invalid_toml() {
        let err = parse_config("[compodoc]\nenabled = \"yes\"\n").expect_err("bool expected");
        assert!(format!("{err:#}").contains("invalid TOML"));
    }

    #[test]
    fn test_bad_threshold_is_an_error() {
        let config = parse_config("[dependency]\nthreshold = \"next\"\n").unwrap();
        let err = ConfigMerger::new(config)
            .merge_init_args(None, CompodocFlags::default())
            .expect_err("not a version");
        assert!(err.to_string().contains("next"));
    }

    #[test]
    fn test_cli_workspace_file_wins() {
        let config = parse_config("[workspace]\nfile = \"a.json\"\n").unwrap();
        let merger = ConfigMerger::new(config);
        assert_eq!(merger.workspace_file(Some(Utf8Path::new("b.json"))), "b.json");
        assert_eq!(merger.workspace_file(None), "a.json");
    }

    #[test]
    fn test_compodoc_flags_override_file() {
        let config = parse_config("[compodoc]\nenabled = true\n").unwrap();
        let merged = ConfigMerger::new(config)
            .merge_init_args(
                None,
                CompodocFlags {
                    no_compodoc: true,
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(merged.use_compodoc, Some(false));
    }

    #[test]
    fn test_yes_does_not_override_explicit_false() {
        let config = parse_config("[compodoc]\nenabled = false\n").unwrap();
        let merged = ConfigMerger::new(config)
            .merge_init_args(
                None,
                CompodocFlags {
                    yes: true,
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(merged.use_compodoc, Some(false));

        let merged = ConfigMerger::new(NgstoryConfig::default())
            .merge_init_args(
                None,
                CompodocFlags {
                    yes: true,
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(merged.use_compodoc, Some(true));
    }

    #[test]
    fn test_discover_config_some_and_none() {
        let temp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf8");
        assert!(discover_config(&root).is_none());

        std::fs::write(root.join(CONFIG_FILE_NAME), "").expect("write config");
        assert!(discover_config(&root).is_some());
    }
}
