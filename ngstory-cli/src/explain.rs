//! Human-readable output: variant explanations, project tables, next steps.

use ngstory_domain::{VersionPair, select_variant};
use ngstory_types::{Handoff, ProjectSummary};
use semver::Version;
use std::fmt::Write;

/// Explain which pipeline a declared version maps to. `None` when the string holds no version.
pub fn explain_variant(raw: &str, threshold: &Version) -> Option<String> {
    let choice = select_variant(&VersionPair::new(Some(raw), None), threshold).ok()?;
    let (version, variant) = (choice.version, choice.variant);

    let relation = if variant.is_webpack5() {
        "at or above"
    } else {
        "below"
    };
    let mut out = String::new();
    let _ = writeln!(out, "declared:  {raw}");
    let _ = writeln!(out, "version:   {version}");
    let _ = writeln!(out, "threshold: {threshold}");
    let _ = writeln!(out, "variant:   {variant}");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{version} is {relation} {threshold}, so the Storybook targets use the {variant} pipeline."
    );
    Some(out)
}

pub fn render_projects(projects: &[ProjectSummary]) -> String {
    let width = projects
        .iter()
        .map(|p| p.name.len())
        .max()
        .unwrap_or(0)
        .max("PROJECT".len());

    let mut out = String::new();
    let _ = writeln!(out, "{:<width$}  {:<11}  {:<9}  ROOT", "PROJECT", "TYPE", "STORYBOOK");
    for p in projects {
        let root = if p.root.is_empty() { "." } else { &p.root };
        let status = if p.has_addon { "yes" } else { "no" };
        let _ = writeln!(
            out,
            "{:<width$}  {:<11}  {:<9}  {}",
            p.name,
            p.project_type.as_str(),
            status,
            root
        );
    }
    out
}

/// What the package-manager and template collaborators still have to do.
pub fn render_next_steps(handoff: &Handoff) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Next steps:");
    let _ = writeln!(
        out,
        "  - copy {} into {}",
        handoff.template_dir,
        handoff.template_destination.as_deref().unwrap_or("the workspace root")
    );
    if let Some(dest) = &handoff.components_destination {
        let _ = writeln!(out, "  - place example stories in {dest}");
    }
    if let Some(builder) = handoff.core_builder {
        let _ = writeln!(
            out,
            "  - set core.builder to \"{builder}\" in {}/main.js",
            handoff.config_folder
        );
    }
    for pkg in &handoff.extra_packages {
        let _ = writeln!(out, "  - install {pkg}");
    }
    if handoff.preview_prefix.is_some() {
        let _ = writeln!(
            out,
            "  - prepend the compodoc setup to {}/preview.js",
            handoff.config_folder
        );
    }
    for script in &handoff.scripts {
        let _ = writeln!(
            out,
            "  - add script \"{}\": \"{}\" to package.json",
            script.name, script.command
        );
    }
    out
}
