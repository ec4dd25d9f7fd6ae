mod config;
mod explain;
mod prompt;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use config::{CompodocFlags, ConfigMerger};
use ngstory_core::adapters::{PackageJsonSource, resolve_under};
use ngstory_core::pipeline::{IntegrateError, IntegrateOutcome, integrate, retry_write};
use ngstory_core::settings::IntegrateSettings;
use ngstory_domain::{FixedPrompt, ProjectPrompt, WEBPACK5_THRESHOLD, coerce_version};
use ngstory_edit::LoadedWorkspace;
use ngstory_types::ToolInfo;
use prompt::StdinPrompt;
use std::io::IsTerminal;
use std::process::ExitCode;
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "ngstory",
    version,
    about = "Add Storybook targets to an Angular workspace."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Add the Storybook targets to one project of angular.json.
    Init(InitArgs),
    /// List the workspace's projects and whether they already have Storybook.
    Projects(ProjectsArgs),
    /// Show which build pipeline a framework version maps to.
    ExplainVariant(ExplainVariantArgs),
}

#[derive(Debug, Parser)]
struct InitArgs {
    /// Workspace root (default: current directory).
    #[arg(long, default_value = ".")]
    workspace_root: Utf8PathBuf,

    /// Workspace file, relative to the root (default: angular.json).
    #[arg(long)]
    workspace_file: Option<Utf8PathBuf>,

    /// Integrate this project instead of asking.
    #[arg(long)]
    project: Option<String>,

    /// Enable compodoc docs generation.
    #[arg(long, conflicts_with = "no_compodoc")]
    compodoc: bool,

    /// Disable compodoc docs generation.
    #[arg(long)]
    no_compodoc: bool,

    /// Accept defaults instead of asking.
    #[arg(long, short = 'y')]
    yes: bool,

    /// Print the patch instead of writing angular.json.
    #[arg(long)]
    dry_run: bool,

    /// Print the integration report as JSON on stdout.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Parser)]
struct ProjectsArgs {
    /// Workspace root (default: current directory).
    #[arg(long, default_value = ".")]
    workspace_root: Utf8PathBuf,

    /// Workspace file, relative to the root (default: angular.json).
    #[arg(long)]
    workspace_file: Option<Utf8PathBuf>,

    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Parser)]
struct ExplainVariantArgs {
    /// Declared version, e.g. "^13.2.0" or "~11".
    version: String,

    /// Cut-over version (default: 12.0.0).
    #[arg(long)]
    threshold: Option<String>,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match real_main() {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(1)
        }
    }
}

fn real_main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Init(args) => cmd_init(args),
        Command::Projects(args) => cmd_projects(args),
        Command::ExplainVariant(args) => cmd_explain_variant(args),
    }
}

fn interactive() -> bool {
    std::io::stdin().is_terminal() && std::io::stderr().is_terminal()
}

fn cmd_init(args: InitArgs) -> anyhow::Result<ExitCode> {
    let root = args.workspace_root;
    let file_config = config::load_or_default(&root).context("load ngstory.toml config")?;
    let merged = ConfigMerger::new(file_config).merge_init_args(
        args.workspace_file.as_deref(),
        CompodocFlags {
            compodoc: args.compodoc,
            no_compodoc: args.no_compodoc,
            yes: args.yes,
        },
    )?;
    debug!(?merged, "merged config");

    let settings = IntegrateSettings {
        workspace_root: root.clone(),
        workspace_file: merged.workspace_file,
        dependency: merged.dependency,
        threshold: merged.threshold,
        project: args.project,
        use_compodoc: merged.use_compodoc,
        compodoc_version: merged.compodoc_version,
        dry_run: args.dry_run,
        tool: ToolInfo {
            name: "ngstory".to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        },
    };

    let deps = PackageJsonSource::new(root);
    let stdin_prompt = StdinPrompt::stdin();
    let unanswered = FixedPrompt::unanswered();
    let prompt: &dyn ProjectPrompt = if interactive() {
        &stdin_prompt
    } else {
        &unanswered
    };

    let mut result = integrate(&settings, &deps, prompt);
    let outcome = loop {
        match result {
            Ok(outcome) => break outcome,
            Err(err) if err.is_retryable_write() && interactive() => {
                warn!("{}", err);
                let Some(pending) = err.into_pending() else {
                    return Ok(ExitCode::from(1));
                };
                let question = format!(
                    "Writing the Storybook targets for '{}' failed. Try again?",
                    pending.outcome().project_name
                );
                if !stdin_prompt.confirm(&question, true).context("ask about retry")? {
                    return Ok(ExitCode::from(1));
                }
                result = retry_write(pending);
            }
            Err(err) => return report_failure(err),
        }
    };

    print_outcome(&outcome, args.dry_run, args.json)?;
    Ok(ExitCode::SUCCESS)
}

fn report_failure(err: IntegrateError) -> anyhow::Result<ExitCode> {
    let code = err.exit_code();
    if code == 2 {
        eprintln!("{err}");
        return Ok(ExitCode::from(2));
    }
    Err(err.into())
}

fn print_outcome(outcome: &IntegrateOutcome, dry_run: bool, json: bool) -> anyhow::Result<()> {
    if json {
        let s = serde_json::to_string_pretty(&outcome.report).context("serialize report")?;
        println!("{s}");
        return Ok(());
    }

    if dry_run {
        print!("{}", outcome.patch);
        eprintln!(
            "dry run: would add Storybook to '{}' ({} pipeline, config in {})",
            outcome.project_name, outcome.variant, outcome.config_folder
        );
        return Ok(());
    }

    println!(
        "Added Storybook to '{}' ({} pipeline, config in {})",
        outcome.project_name, outcome.variant, outcome.config_folder
    );
    println!();
    print!("{}", explain::render_next_steps(&outcome.handoff));
    Ok(())
}

fn cmd_projects(args: ProjectsArgs) -> anyhow::Result<ExitCode> {
    let file_config =
        config::load_or_default(&args.workspace_root).context("load ngstory.toml config")?;
    let file = ConfigMerger::new(file_config).workspace_file(args.workspace_file.as_deref());
    let path = resolve_under(&args.workspace_root, &file);

    let workspace = LoadedWorkspace::load(&path)?;
    let projects = workspace.list_projects();

    match args.format {
        OutputFormat::Text => {
            if projects.is_empty() {
                println!("no projects in {}", workspace.path());
            } else {
                print!("{}", explain::render_projects(&projects));
            }
        }
        OutputFormat::Json => {
            let s = serde_json::to_string_pretty(&projects).context("serialize projects")?;
            println!("{s}");
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn cmd_explain_variant(args: ExplainVariantArgs) -> anyhow::Result<ExitCode> {
    let threshold = match args.threshold.as_deref() {
        Some(raw) => {
            coerce_version(raw).with_context(|| format!("threshold '{raw}' is not a version"))?
        }
        None => WEBPACK5_THRESHOLD,
    };

    match explain::explain_variant(&args.version, &threshold) {
        Some(text) => {
            print!("{text}");
            Ok(ExitCode::SUCCESS)
        }
        None => {
            anyhow::bail!(
                "'{}' does not contain a version; the pipeline cannot be chosen",
                args.version
            )
        }
    }
}
