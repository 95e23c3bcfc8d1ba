use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use catalog_drift::DependencyInspector;
use catalog_drift::config::InspectorConfig;
use catalog_drift::report::{ReportStore, ReportView, interpret_report};
use catalog_drift::version::registries::maven_central::DISPLAY_NAME;

#[derive(Parser)]
#[command(name = "catalog-drift")]
#[command(version, about = "Check a Gradle version catalog for outdated libraries")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Report file to write or read (defaults to the configured file name in the
    /// current directory)
    #[arg(long, global = true)]
    report: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Write logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect the catalog under a project root and save the report
    Check { project_root: PathBuf },
    /// Print the saved report, optionally filtered by package alias
    Show {
        #[arg(long)]
        filter: Option<String>,
    },
    /// Print a one-line summary of the saved report
    Summary,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard =
        catalog_drift::logging::init(if cli.verbose { "debug" } else { "info" }, cli.log_json);

    let config = match &cli.config {
        Some(path) => InspectorConfig::from_file(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => InspectorConfig::default(),
    };
    let store = ReportStore::new(
        cli.report
            .unwrap_or_else(|| config.report_location(Path::new("."))),
    );

    match cli.command {
        Command::Check { project_root } => tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?
            .block_on(check(config, store, project_root)),
        Command::Show { filter } => {
            let view = ReportView::flatten(&store.load()?);
            let view = view.filter(filter.as_deref().unwrap_or_default());
            if view.is_empty() {
                println!("No matching packages.");
            } else {
                print!("{}", view);
            }
            Ok(())
        }
        Command::Summary => {
            println!("{}", interpret_report(&store, DISPLAY_NAME)?);
            Ok(())
        }
    }
}

async fn check(
    config: InspectorConfig,
    store: ReportStore,
    project_root: PathBuf,
) -> anyhow::Result<()> {
    let inspector = DependencyInspector::from_config(config)?;

    let cancel = CancellationToken::new();
    let ctrl_c = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });

    let result = inspector
        .check_dependencies_with_cancel(&project_root, cancel)
        .await;
    ctrl_c.abort();
    let report = result?;

    store
        .save(&report.records)
        .with_context(|| format!("failed to save report {}", store.path().display()))?;

    if !report.manifest_found() {
        println!(
            "No version catalog found at {}; nothing to check.",
            report.manifest.path().display()
        );
        return Ok(());
    }

    print!("{}", report.view());
    println!("{}", inspector.summarize(&report));
    Ok(())
}
