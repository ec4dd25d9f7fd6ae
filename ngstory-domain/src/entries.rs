use ngstory_types::{AddonEntry, TargetEntry, TargetOptions, Variant};

/// Name of the add-on configuration folder inside a project root.
pub const CONFIG_FOLDER_NAME: &str = ".storybook";

const SERVE_BUILDER: &str = "@storybook/angular:start-storybook";
const BUILD_BUILDER: &str = "@storybook/angular:build-storybook";
const SERVE_PORT: u16 = 6006;
const SINGLE_PROJECT_OUTPUT_DIR: &str = "storybook-static";

/// `<root>/.storybook`, or `.storybook` when the project lives at the workspace root.
pub fn config_folder_for(root: &str) -> String {
    let root = root.trim_end_matches('/');
    if root.is_empty() {
        CONFIG_FOLDER_NAME.to_string()
    } else {
        format!("{root}/{CONFIG_FOLDER_NAME}")
    }
}

/// Inputs for [`plan_addon_entry`].
#[derive(Debug, Clone)]
pub struct EntryRequest<'a> {
    pub project: &'a str,
    pub root: &'a str,
    pub config_folder: &'a str,
    pub variant: Variant,
    pub use_compodoc: bool,
    /// Number of projects declared in the workspace, integrated or not.
    pub project_count: usize,
}

/// Build the serve and build targets for one project.
pub fn plan_addon_entry(req: &EntryRequest<'_>) -> AddonEntry {
    let root = req.root.trim_end_matches('/');
    let compodoc_args = req.use_compodoc.then(|| {
        let docs_root = if root.is_empty() { "." } else { root };
        ["-e", "json", "-d", docs_root]
            .into_iter()
            .map(str::to_string)
            .collect()
    });

    let base = TargetOptions {
        config_dir: req.config_folder.to_string(),
        browser_target: format!("{}:build", req.project),
        compodoc: req.use_compodoc,
        compodoc_args,
        pipeline: req.variant,
        port: None,
        output_dir: None,
    };

    let output_dir = if req.project_count == 1 {
        SINGLE_PROJECT_OUTPUT_DIR.to_string()
    } else {
        format!("dist/storybook/{}", req.project)
    };

    AddonEntry {
        serve: TargetEntry {
            builder: SERVE_BUILDER.to_string(),
            options: TargetOptions {
                port: Some(SERVE_PORT),
                ..base.clone()
            },
        },
        build: TargetEntry {
            builder: BUILD_BUILDER.to_string(),
            options: TargetOptions {
                output_dir: Some(output_dir),
                ..base
            },
        },
    }
}
