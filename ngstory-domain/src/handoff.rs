use ngstory_types::{Handoff, PackageScript, ProjectSummary, Variant};

pub const COMPODOC_PACKAGE: &str = "@compodoc/compodoc";
pub const DEFAULT_COMPODOC_VERSION: &str = "1.1.19";

/// Lines prepended to the generated `preview.js` when compodoc is enabled.
pub const COMPODOC_PREVIEW_PREFIX: &str = r#"import { setCompodocJson } from "@storybook/addon-docs/angular";
import docJson from "../documentation.json";
setCompodocJson(docJson);
"#;

#[derive(Debug, Clone)]
pub struct HandoffRequest<'a> {
    pub project: &'a ProjectSummary,
    pub config_folder: &'a str,
    pub variant: Variant,
    /// `Some(version)` when compodoc is enabled.
    pub compodoc_version: Option<&'a str>,
    pub project_count: usize,
}

/// Describe the follow-up work for the package-manager and template-copy collaborators.
pub fn plan_handoff(req: &HandoffRequest<'_>) -> Handoff {
    let name = &req.project.name;
    let root = req.project.root.trim_end_matches('/');
    let root = (!root.is_empty()).then(|| root.to_string());

    // Script names are global to package.json; only claim them when there is no ambiguity.
    let scripts = if req.project_count == 1 {
        vec![
            PackageScript {
                name: "storybook".to_string(),
                command: format!("ng run {name}:storybook"),
            },
            PackageScript {
                name: "build-storybook".to_string(),
                command: format!("ng run {name}:build-storybook"),
            },
        ]
    } else {
        Vec::new()
    };

    let extra_packages = req
        .compodoc_version
        .map(|v| vec![format!("{COMPODOC_PACKAGE}@{v}")])
        .unwrap_or_default();

    Handoff {
        scripts,
        extra_packages,
        template_dir: format!("templates/angular/{}", req.project.project_type),
        components_destination: root.as_ref().map(|r| format!("{r}/src/stories")),
        template_destination: root,
        config_folder: req.config_folder.to_string(),
        preview_prefix: req
            .compodoc_version
            .map(|_| COMPODOC_PREVIEW_PREFIX.to_string()),
        core_builder: req.variant.is_webpack5().then_some(Variant::Webpack5),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ngstory_types::ProjectType;

    fn project(name: &str, root: &str, project_type: ProjectType) -> ProjectSummary {
        ProjectSummary {
            name: name.to_string(),
            root: root.to_string(),
            project_type,
            has_addon: false,
        }
    }

    #[test]
    fn single_project_gets_scripts() {
        let p = project("my-app", "", ProjectType::Application);
        let handoff = plan_handoff(&HandoffRequest {
            project: &p,
            config_folder: ".storybook",
            variant: Variant::Webpack5,
            compodoc_version: None,
            project_count: 1,
        });

        let scripts: Vec<(&str, &str)> = handoff
            .scripts
            .iter()
            .map(|s| (s.name.as_str(), s.command.as_str()))
            .collect();
        assert_eq!(
            scripts,
            vec![
                ("storybook", "ng run my-app:storybook"),
                ("build-storybook", "ng run my-app:build-storybook"),
            ]
        );
        assert_eq!(handoff.template_dir, "templates/angular/application");
        assert_eq!(handoff.template_destination, None);
        assert_eq!(handoff.components_destination, None);
        assert_eq!(handoff.core_builder, Some(Variant::Webpack5));
        assert!(handoff.extra_packages.is_empty());
        assert!(handoff.preview_prefix.is_none());
    }

    #[test]
    fn multi_project_library_with_compodoc() {
        let p = project("ui", "projects/ui/", ProjectType::Library);
        let handoff = plan_handoff(&HandoffRequest {
            project: &p,
            config_folder: "projects/ui/.storybook",
            variant: Variant::Webpack4,
            compodoc_version: Some(DEFAULT_COMPODOC_VERSION),
            project_count: 2,
        });

        assert!(handoff.scripts.is_empty());
        assert_eq!(handoff.extra_packages, vec!["@compodoc/compodoc@1.1.19"]);
        assert_eq!(handoff.template_dir, "templates/angular/library");
        assert_eq!(handoff.template_destination.as_deref(), Some("projects/ui"));
        assert_eq!(
            handoff.components_destination.as_deref(),
            Some("projects/ui/src/stories")
        );
        assert!(
            handoff
                .preview_prefix
                .as_deref()
                .is_some_and(|p| p.contains("setCompodocJson"))
        );
        assert_eq!(handoff.core_builder, None);
    }
}
