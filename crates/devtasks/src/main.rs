//! devtasks CLI - repository maintenance tasks

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use colored::Colorize;
use devtasks_core::config::{self, LoadedProject};
use devtasks_core::copyright::{self, CopyrightTool, GitHistory, YearComputer};
use devtasks_core::generator::{
    self, GenerateMode, GenerateOutcome, RenderSession, COPYRIGHT_YEARS,
};
use devtasks_core::labels::{self, GithubLabels};
use devtasks_core::{ReplacementSchema, Scalar};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "devtasks")]
#[command(about = "Repository maintenance tasks: templates, copyright statements, labels")]
#[command(version)]
pub struct Args {
    /// Project root containing devtasks.yaml and package.json
    #[arg(long, global = true, default_value = ".")]
    pub dir: PathBuf,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render every template listed in devtasks.yaml
    Generate(GenerateArgs),
    /// Render a single template to stdout
    Render(RenderArgs),
    /// Maintain copyright statements
    #[command(subcommand)]
    Copyright(CopyrightCommand),
    /// Synchronize GitHub labels
    #[command(subcommand)]
    Labels(LabelsCommand),
}

#[derive(ClapArgs, Debug)]
pub struct ValueArgs {
    /// Set a runtime placeholder (repeatable)
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    pub set: Vec<(String, String)>,
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Fail if any generated file is out of date instead of writing it
    #[arg(long)]
    pub check: bool,

    #[command(flatten)]
    pub values: ValueArgs,
}

#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Template file
    pub template: PathBuf,

    /// Fail on placeholders with no schema entry
    #[arg(long)]
    pub strict: bool,

    #[command(flatten)]
    pub values: ValueArgs,
}

#[derive(Subcommand, Debug)]
pub enum CopyrightCommand {
    /// Print the expected copyright statement for a file
    Statement {
        file: PathBuf,
    },
    /// Rewrite outdated copyright statements
    Update {
        /// Files or directories (defaults to copyright.include)
        paths: Vec<String>,

        /// Auto-confirm all prompts (non-interactive mode)
        #[arg(short, long)]
        yes: bool,
    },
    /// Fail if any file has an outdated copyright statement
    Check {
        /// Files or directories (defaults to copyright.include)
        paths: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum LabelsCommand {
    /// Make the repository's labels match devtasks.yaml
    Sync {
        /// Show the plan without changing anything
        #[arg(long)]
        dry_run: bool,

        /// Auto-confirm all prompts (non-interactive mode)
        #[arg(short, long)]
        yes: bool,
    },
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", raw)),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("devtasks=debug,devtasks_core=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("devtasks=info,devtasks_core=info"))
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}

/// A fresh session for this invocation, with `--set` values registered
fn new_session(
    project: &LoadedProject,
    current_year: i32,
    values: &[(String, String)],
) -> Result<RenderSession> {
    let schema = ReplacementSchema::standard(current_year);
    let mut session = RenderSession::new(schema, project.store.clone());
    for (name, value) in values {
        session.register_runtime_value(name, Scalar::from(value.as_str()))?;
    }
    Ok(session)
}

/// `generate` computes `COPYRIGHT_YEARS` per destination file
fn check_generate_values(values: &[(String, String)]) -> Result<()> {
    if values.iter().any(|(name, _)| name == COPYRIGHT_YEARS) {
        anyhow::bail!(
            "{} is computed from each generated file's history and cannot be set with --set",
            COPYRIGHT_YEARS
        );
    }
    Ok(())
}

fn run_generate(project: &LoadedProject, args: GenerateArgs) -> Result<()> {
    check_generate_values(&args.values.set)?;
    let years = YearComputer::new(GitHistory::new(&project.root));
    let mut session = new_session(project, years.current_year(), &args.values.set)?;
    let mode = if args.check {
        GenerateMode::Check
    } else {
        GenerateMode::Write
    };

    if project.config.templates.is_empty() {
        println!("{}", "No templates configured in devtasks.yaml".yellow());
        return Ok(());
    }

    let outcomes = generator::generate_all(project, &mut session, &years, mode)?;

    let mut stale = 0;
    for (entry, outcome) in &outcomes {
        let status = match outcome {
            GenerateOutcome::Written => "written".green(),
            GenerateOutcome::Unchanged => "unchanged".dimmed(),
            GenerateOutcome::Stale => {
                stale += 1;
                "out of date".red()
            }
        };
        println!("  {} {} ({})", "->".blue(), entry.dest, status);
    }

    if stale > 0 {
        anyhow::bail!(
            "{} generated file(s) are out of date; run `devtasks generate`",
            stale
        );
    }
    Ok(())
}

fn run_render(project: &LoadedProject, args: RenderArgs) -> Result<()> {
    let years = YearComputer::new(GitHistory::new(&project.root));
    let mut session = new_session(project, years.current_year(), &args.values.set)?;
    let text = std::fs::read_to_string(&args.template)
        .with_context(|| format!("Failed to read {}", args.template.display()))?;
    let rendered = if args.strict {
        generator::render_strict(&mut session, &text)?
    } else {
        generator::render(&mut session, &text)?
    };
    print!("{}", rendered);
    Ok(())
}

fn copyright_files(project: &LoadedProject, paths: Vec<String>) -> Result<Vec<PathBuf>> {
    let mut settings = project.config.copyright.clone();
    if !paths.is_empty() {
        settings.include = paths;
    }
    copyright::collect_files(&project.root, &settings)
}

fn relative<'a>(root: &Path, path: &'a Path) -> std::path::Display<'a> {
    path.strip_prefix(root).unwrap_or(path).display()
}

fn run_copyright(project: &LoadedProject, command: CopyrightCommand) -> Result<()> {
    let years = YearComputer::new(GitHistory::new(&project.root));
    let mut session = new_session(project, years.current_year(), &[])?;
    let mut tool = CopyrightTool::new(&mut session, &years);

    match command {
        CopyrightCommand::Statement { file } => {
            println!("{}", tool.generate_statement(&project.root.join(file))?);
            Ok(())
        }
        CopyrightCommand::Update { paths, yes } => {
            let files = copyright_files(project, paths)?;
            devtasks_core::tui::run_copyright_update(&mut tool, &project.root, &files, yes)
        }
        CopyrightCommand::Check { paths } => {
            let files = copyright_files(project, paths)?;
            let mismatched = tool.check_all(&files)?;
            if mismatched.is_empty() {
                println!(
                    "{} {} file(s) have current copyright statements",
                    "OK".green().bold(),
                    files.len()
                );
                return Ok(());
            }
            for file in &mismatched {
                eprintln!("  {} {}", "x".red(), relative(&project.root, file));
            }
            let summary = format!(
                "{} file(s) have outdated copyright statements",
                mismatched.len()
            );
            // Report the first mismatch in full
            match tool.check_file(&mismatched[0], true) {
                Err(e) => Err(e.context(summary)),
                Ok(_) => Err(anyhow::anyhow!(summary)),
            }
        }
    }
}

async fn run_labels(project: &LoadedProject, command: LabelsCommand) -> Result<()> {
    let LabelsCommand::Sync { dry_run, yes } = command;
    let settings = &project.config.labels;
    let years = YearComputer::new(GitHistory::new(&project.root));

    let slug = match &settings.repo {
        Some(repo) => repo.clone(),
        None => new_session(project, years.current_year(), &[])?
            .get_value("GITHUB_REPO")
            .context("Set labels.repo in devtasks.yaml or repository.url in package.json")?
            .to_string(),
    };

    let desired = labels::load_desired(project)?;
    let client = GithubLabels::from_env(
        settings.api_url.as_deref(),
        &slug,
        devtasks_core::USER_AGENT,
    )?;
    let existing = client.list().await?;
    let plan = labels::plan(&desired, &existing, settings.delete_unknown);

    devtasks_core::tui::run_label_sync(&client, &slug, &plan, dry_run, yes).await
}

#[tokio::main]
async fn main() -> Result<()> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    init_logging(args.verbose);

    let project = config::load_project(&args.dir)?;
    tracing::debug!(root = %project.root.display(), sources = ?project.store.source_names(), "loaded project");

    let result = match args.command {
        Command::Generate(generate_args) => run_generate(&project, generate_args),
        Command::Render(render_args) => run_render(&project, render_args),
        Command::Copyright(command) => run_copyright(&project, command),
        Command::Labels(command) => run_labels(&project, command).await,
    };

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    result
}
