//! Testgen: automated test generator CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use globset::GlobSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use testgen::config::{build_ignore_set, is_ignored, load_config, write_config, ProjectConfig, Settings};
use testgen::generator::{write_tests, GenerateError, LocalOnly, Orchestrator, RemoteGenerator};
use testgen::reporter::{ConsoleReporter, ProjectSummary};
use testgen::scanner::scan_target;
use testgen::watcher::SourceWatcher;
use testgen::Framework;
use tracing_subscriber::EnvFilter;

/// Testgen: generate unit tests for JavaScript and TypeScript projects
#[derive(Parser, Debug)]
#[command(name = "testgen")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Base URL of the remote generation service
    #[arg(long, global = true, env = "TESTGEN_API_URL")]
    api_url: Option<String>,

    /// Number of parallel workers (default: number of CPU cores)
    #[arg(long, global = true, value_name = "N")]
    jobs: Option<usize>,

    /// Skip the remote service and use local templates only
    #[arg(long, global = true)]
    offline: bool,

    /// Quiet mode (no analysis summary)
    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a project and generate tests
    Analyze {
        /// Project directory or single source file (default: current)
        path: Option<PathBuf>,

        /// Test framework: jest, vitest, mocha
        #[arg(long, short)]
        framework: Option<String>,

        /// Output directory for generated tests
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Watch a project and regenerate tests on change
    Watch {
        /// Project directory (default: current)
        path: Option<PathBuf>,

        /// Test framework: jest, vitest, mocha
        #[arg(long, short)]
        framework: Option<String>,

        /// Output directory for generated tests
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Create .testgenrc.json with sensible defaults
    Init {
        /// Test framework: jest, vitest, mocha
        #[arg(long, short)]
        framework: Option<String>,

        /// Output directory recorded in the config
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("testgen=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();

    let mut settings = Settings::default();
    if let Some(ref url) = args.api_url {
        settings = settings.with_api_url(url);
    }
    if let Some(jobs) = args.jobs {
        settings = settings.with_jobs(jobs);
    }

    match args.command {
        Commands::Analyze {
            ref path,
            ref framework,
            ref output,
        } => {
            let target = resolve_target(path.as_deref())?;
            let config = project_config(&target, framework.as_deref(), output.clone())?;
            if args.offline {
                run_analyze(&Orchestrator::new(LocalOnly, &settings), &target, &config, args.quiet)
            } else {
                let orchestrator = Orchestrator::from_settings(&settings)
                    .context("Failed to create remote client")?;
                run_analyze(&orchestrator, &target, &config, args.quiet)
            }
        }
        Commands::Watch {
            ref path,
            ref framework,
            ref output,
        } => {
            let target = resolve_target(path.as_deref())?;
            let config = project_config(&target, framework.as_deref(), output.clone())?;
            if args.offline {
                run_watch(&Orchestrator::new(LocalOnly, &settings), &target, &config)
            } else {
                let orchestrator = Orchestrator::from_settings(&settings)
                    .context("Failed to create remote client")?;
                run_watch(&orchestrator, &target, &config)
            }
        }
        Commands::Init {
            framework,
            output_dir,
            dir,
        } => run_init(framework.as_deref(), output_dir, dir.as_deref()),
    }
}

fn resolve_target(path: Option<&Path>) -> Result<PathBuf> {
    match path {
        Some(p) => Ok(p.to_path_buf()),
        None => std::env::current_dir().context("Failed to get current directory"),
    }
}

/// Load `.testgenrc.json` for the target and apply CLI flags on top
fn project_config(
    target: &Path,
    framework: Option<&str>,
    output: Option<PathBuf>,
) -> Result<ProjectConfig> {
    let work_dir = if target.is_file() {
        target.parent().unwrap_or(Path::new("."))
    } else {
        target
    };
    Ok(load_config(work_dir)?.merge_with_cli(framework.map(Framework::from_name), output))
}

fn exclude_set(config: &ProjectConfig) -> Result<Option<GlobSet>> {
    if config.exclude_patterns.is_empty() {
        Ok(None)
    } else {
        Ok(Some(build_ignore_set(&config.exclude_patterns)?))
    }
}

fn run_analyze<R: RemoteGenerator>(
    orchestrator: &Orchestrator<R>,
    target: &Path,
    config: &ProjectConfig,
    quiet: bool,
) -> Result<ExitCode> {
    let exclude = exclude_set(config)?;
    let files = scan_target(target, exclude.as_ref()).map_err(GenerateError::from)?;

    if files.is_empty() {
        eprintln!(
            "{}: No JavaScript/TypeScript files found in {}",
            "Warning".yellow(),
            target.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let reporter = if quiet {
        ConsoleReporter::new().quiet()
    } else {
        ConsoleReporter::new()
    };
    if !quiet {
        reporter.report_summary(&ProjectSummary::build(&files, config.framework));
    }

    let tests = orchestrator.generate_tests(&files, config.framework);
    write_tests(&config.output_dir, &tests).with_context(|| {
        format!("Failed to write tests to {}", config.output_dir.display())
    })?;
    reporter.report_written(&tests, &config.output_dir);
    Ok(ExitCode::SUCCESS)
}

fn run_watch<R: RemoteGenerator>(
    orchestrator: &Orchestrator<R>,
    target: &Path,
    config: &ProjectConfig,
) -> Result<ExitCode> {
    let exclude = exclude_set(config)?;
    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("Failed to create {}", config.output_dir.display())
    })?;
    let watcher = SourceWatcher::watch(target)
        .context("Failed to create file watcher")?
        .ignoring_output(&config.output_dir);
    let reporter = ConsoleReporter::new().quiet();
    eprintln!(
        "{}: Watching {} for changes... (Ctrl+C to stop)",
        "Info".blue(),
        target.display()
    );

    loop {
        let paths = watcher.next_changes();
        let changed: Vec<PathBuf> = paths
            .into_iter()
            .filter(|p| {
                exclude
                    .as_ref()
                    .map(|set| !is_ignored(p.strip_prefix(target).unwrap_or(p), set))
                    .unwrap_or(true)
            })
            .collect();
        if changed.is_empty() {
            continue;
        }
        for path in &changed {
            eprintln!("{}: {} changed", "Info".blue(), path.display());
        }

        // regenerate the whole target so relative names stay consistent
        let result = scan_target(target, exclude.as_ref())
            .map(|files| orchestrator.generate_tests(&files, config.framework));
        match result {
            Ok(tests) => match write_tests(&config.output_dir, &tests) {
                Ok(_) => reporter.report_written(&tests, &config.output_dir),
                Err(e) => eprintln!("{}: Failed to write tests: {}", "Error".red(), e),
            },
            Err(e) => eprintln!("{}: {}", "Error".red(), GenerateError::from(e)),
        }
    }
}

fn run_init(framework: Option<&str>, output_dir: Option<PathBuf>, dir: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);

    let config = ProjectConfig::default().merge_with_cli(framework.map(Framework::from_name), output_dir);
    let config_path = write_config(dir, &config)?;

    println!(
        "{}: Created {} with framework={}, outputDir={}",
        "Done".green().bold(),
        config_path.display(),
        config.framework.as_str(),
        config.output_dir.display()
    );
    println!(
        "   Next: {}",
        format!("npm install {} --save-dev", config.framework.package()).cyan()
    );
    Ok(ExitCode::SUCCESS)
}
