use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cleansight_engine::{WorkflowController, WorkflowError};
use cleansight_types::{ArtifactKind, DatasetFile};
use cleansight_util::{Settings, default_settings_path};
use tokio::io::AsyncReadExt;
use tracing::debug;

mod args;
mod session;
mod view;

use args::{AnalyzeArgs, Cli, Command, InputArgs};
use view::{TerminalNotifier, render_report};

const REPORT_WIDTH: usize = 80;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.global.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            // Workflow errors were already shown by the notifier.
            if error.downcast_ref::<WorkflowError>().is_none() {
                eprintln!("error: {error:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

async fn run(cli: Cli) -> Result<()> {
    let settings = Settings::resolve(cli.global.overrides()).context("resolve settings")?;
    debug!(?settings, "settings resolved");

    match cli.command {
        Command::Config => {
            println!("settings file: {}", default_settings_path().display());
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
        Command::Session => {
            let controller = build_controller(&settings)?;
            session::run(controller, REPORT_WIDTH).await
        }
        Command::Analyze(args) => run_analyze(&settings, args).await,
    }
}

fn build_controller(settings: &Settings) -> Result<WorkflowController> {
    WorkflowController::from_settings(settings, Arc::new(TerminalNotifier)).context("build workflow controller")
}

async fn run_analyze(settings: &Settings, args: AnalyzeArgs) -> Result<()> {
    let mut controller = build_controller(settings)?;
    apply_input(&mut controller, &args.input).await?;

    eprintln!("Analyzing dataset...");
    session::submit_interruptibly(&mut controller).await?;

    if let Some(stored) = controller.stored_report() {
        if args.json {
            println!("{}", serde_json::to_string_pretty(stored)?);
        } else {
            println!("{}", render_report(stored, REPORT_WIDTH));
        }
    }

    let report = args.download_report.then_some(ArtifactKind::ReportDocument);
    let dataset = args.download_preprocessed.then_some(ArtifactKind::PreprocessedDataset);
    // Downloads only read the report handle, so they can run side by side.
    let (report, dataset) = tokio::join!(download_if(&controller, report), download_if(&controller, dataset));
    report?;
    dataset?;
    Ok(())
}

async fn download_if(controller: &WorkflowController, kind: Option<ArtifactKind>) -> Result<(), WorkflowError> {
    match kind {
        Some(kind) => session::download_interruptibly(controller, kind).await.map(|_| ()),
        None => Ok(()),
    }
}

async fn apply_input(controller: &mut WorkflowController, input: &InputArgs) -> Result<()> {
    if let Some(path) = &input.file {
        let file = DatasetFile::from_path(path)
            .await
            .with_context(|| format!("read dataset file {}", path.display()))?;
        controller.select_file(file);
    } else if let Some(text) = &input.text {
        controller.set_pasted_text(text.clone());
    } else if input.stdin {
        let mut text = String::new();
        tokio::io::stdin()
            .read_to_string(&mut text)
            .await
            .context("read dataset from stdin")?;
        controller.set_pasted_text(text);
    }
    Ok(())
}
