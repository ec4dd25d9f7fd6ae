use anyhow::Context;
use clap::{Parser, Subcommand};
use fs_err as fs;
use serde_json::json;
use std::path::Path;
use std::process::Command as ProcessCommand;

#[derive(Debug, Parser)]
#[command(name = "xtask", about = "Workspace helper tasks")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print schema identifiers used by ngstory.
    PrintSchemas,
    /// Scaffold a throwaway Angular workspace (angular.json + package.json) to try `ngstory init` on.
    InitDemoWorkspace {
        #[arg(long, default_value = "demo-workspace")]
        dir: String,
        /// Declared @angular/core version.
        #[arg(long, default_value = "^13.2.0")]
        angular: String,
    },
    /// Run the golden fixture tests of the integrate pipeline.
    Golden,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::PrintSchemas => {
            println!("{}", ngstory_types::schema::NGSTORY_REPORT_V1);
        }
        Command::InitDemoWorkspace { dir, angular } => {
            init_demo_workspace(Path::new(&dir), &angular)?;
        }
        Command::Golden => {
            let status = ProcessCommand::new("cargo")
                .args(["test", "-p", "ngstory-core", "--test", "golden_fixtures"])
                .status()
                .context("run golden fixture tests")?;
            if !status.success() {
                anyhow::bail!("golden fixtures failed");
            }
        }
    }
    Ok(())
}

fn init_demo_workspace(dir: &Path, angular: &str) -> anyhow::Result<()> {
    let angular_json = dir.join("angular.json");
    if angular_json.exists() {
        anyhow::bail!("{} already exists", angular_json.display());
    }
    fs::create_dir_all(dir)?;

    let workspace = json!({
        "$schema": "./node_modules/@angular/cli/lib/config/schema.json",
        "version": 1,
        "newProjectRoot": "projects",
        "projects": {
            "shop": {
                "projectType": "application",
                "root": "",
                "sourceRoot": "src",
                "prefix": "app",
                "architect": {
                    "build": {
                        "builder": "@angular-devkit/build-angular:browser",
                        "options": { "outputPath": "dist/shop" }
                    }
                }
            },
            "design-system": {
                "projectType": "library",
                "root": "projects/design-system",
                "sourceRoot": "projects/design-system/src",
                "prefix": "ds",
                "architect": {
                    "build": {
                        "builder": "@angular-devkit/build-angular:ng-packagr",
                        "options": { "project": "projects/design-system/ng-package.json" }
                    }
                }
            }
        }
    });
    let package_json = json!({
        "name": "demo-workspace",
        "private": true,
        "dependencies": { "@angular/core": angular },
        "devDependencies": { "@angular/cli": angular }
    });

    for (name, value) in [("angular.json", workspace), ("package.json", package_json)] {
        let mut text = serde_json::to_string_pretty(&value).context("serialize demo file")?;
        text.push('\n');
        fs::write(dir.join(name), text)?;
    }
    println!("initialized {}/{{angular.json,package.json}}", dir.display());
    Ok(())
}
