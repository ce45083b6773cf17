use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tourgen_analyzer::{GrammarRegistry, Language, StructuralAnalyzer};
use tourgen_tour::{
    write_tour, CancellationFlag, GeneratorOptions, LogProgress, TourError, TourGenerator,
};
use tourgen_workspace::{discover, FsWorkspace, WorkspaceFiles};

mod settings;

use settings::Settings;

#[derive(Parser)]
#[command(name = "tourgen")]
#[command(about = "Generate guided code tours from a source tree", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a tour and write it to .tours/
    Generate(GenerateArgs),

    /// Print the prioritized file list
    Discover(DiscoverArgs),

    /// Print the structural analysis of one file
    Analyze(AnalyzeArgs),
}

#[derive(Args)]
struct GenerateArgs {
    /// Workspace root
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Tour title
    #[arg(long)]
    title: Option<String>,

    /// Maximum number of files to discover (0 = unbounded)
    #[arg(long)]
    limit: Option<usize>,

    /// Maximum number of steps kept after validation
    #[arg(long)]
    max_steps: Option<usize>,

    /// Model id sent to the generation service
    #[arg(long)]
    model: Option<String>,

    /// Base URL of an OpenAI-compatible API
    #[arg(long)]
    base_url: Option<String>,

    /// Settings file (default: <root>/tourgen.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Run the pipeline but do not write the tour file
    #[arg(long)]
    dry_run: bool,

    /// Clamp step lines to the length of their file
    #[arg(long)]
    strict_lines: bool,
}

#[derive(Args)]
struct DiscoverArgs {
    /// Workspace root
    #[arg(default_value = ".")]
    root: PathBuf,

    /// Maximum number of files (0 = unbounded)
    #[arg(long)]
    limit: Option<usize>,

    /// Settings file (default: <root>/tourgen.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct AnalyzeArgs {
    /// File to analyze
    file: PathBuf,

    /// Language tag (default: from the file extension)
    #[arg(long)]
    language: Option<String>,
}

/// JSON printed by `generate`
#[derive(Debug, Serialize)]
struct RunReport {
    status: &'static str,
    steps: usize,
    failed_batches: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    match cli.command {
        Commands::Generate(args) => run_generate(args).await,
        Commands::Discover(args) => run_discover(args).await,
        Commands::Analyze(args) => run_analyze(args).await,
    }
}

async fn run_generate(args: GenerateArgs) -> Result<()> {
    let mut settings = Settings::load(&args.root, args.config.as_deref())?;
    if let Some(title) = args.title {
        settings.title = Some(title);
    }
    if let Some(limit) = args.limit {
        settings.discovery.limit = limit;
    }
    if let Some(max_steps) = args.max_steps {
        settings.validation.max_steps = max_steps;
    }
    if let Some(model) = args.model {
        settings.generation.model = model;
    }
    if let Some(base_url) = args.base_url {
        settings.generation.base_url = base_url;
    }
    if args.strict_lines {
        settings.validation.strict_line_bounds = true;
    }
    settings.validate()?;

    let workspace = Arc::new(open_workspace(&args.root)?);
    let root = workspace.root().to_path_buf();
    let options = GeneratorOptions {
        title: settings.title,
        model: None,
        discovery: settings.discovery,
        orchestrator: settings.orchestrator,
        validation: settings.validation,
    };
    let generator = TourGenerator::from_config(workspace, settings.generation, options)
        .map_err(|e| match e {
            TourError::ServiceNotConfigured(cause) if cause.is_configuration() => anyhow::anyhow!(
                "{} You can also set api_key under [generation] in tourgen.toml.",
                cause.user_message()
            ),
            TourError::ServiceNotConfigured(cause) => {
                anyhow::anyhow!("{} ({cause})", cause.user_message())
            }
            other => other.into(),
        })?;

    let cancel = CancellationFlag::new();
    let run = generator.run(&cancel, &LogProgress);
    tokio::pin!(run);
    let result = tokio::select! {
        result = &mut run => result,
        _ = tokio::signal::ctrl_c() => {
            log::warn!("Interrupted, cancelling");
            cancel.cancel();
            Err(TourError::Cancelled)
        }
    };

    let report = match result {
        Ok(report) => report,
        Err(TourError::Cancelled) => {
            return print_json(&RunReport {
                status: "cancelled",
                steps: 0,
                failed_batches: 0,
                path: None,
            });
        }
        Err(e) => return Err(e).context("Tour generation failed"),
    };

    let path = if args.dry_run {
        None
    } else {
        Some(
            write_tour(&root, &report.tour)
                .await
                .context("Failed to write tour file")?,
        )
    };

    if report.failed_batches > 0 {
        log::warn!(
            "{} of {} batches failed; the tour may be incomplete",
            report.failed_batches,
            report.total_batches
        );
    }

    print_json(&RunReport {
        status: "completed",
        steps: report.step_count(),
        failed_batches: report.failed_batches,
        path,
    })
}

async fn run_discover(args: DiscoverArgs) -> Result<()> {
    let mut settings = Settings::load(&args.root, args.config.as_deref())?;
    if let Some(limit) = args.limit {
        settings.discovery.limit = limit;
    }

    let workspace = open_workspace(&args.root)?;
    let files = discover(&workspace, &settings.discovery)
        .await
        .context("File discovery failed")?;
    print_json(&files)
}

async fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let content = tokio::fs::read_to_string(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let language = args
        .language
        .unwrap_or_else(|| Language::from_path(&args.file).as_str().to_string());

    let grammars = GrammarRegistry::with_defaults();
    if !grammars.supports(&language) {
        log::info!("No grammar for {language:?}; using the line scanner");
    }
    let analyzer = StructuralAnalyzer::new(&grammars);
    let path = args.file.to_string_lossy().replace('\\', "/");
    let analysis = analyzer.analyze(&path, &content, &language);
    print_json(&analysis)
}

fn open_workspace(root: &Path) -> Result<FsWorkspace> {
    FsWorkspace::new(root).with_context(|| format!("Cannot open workspace {}", root.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
