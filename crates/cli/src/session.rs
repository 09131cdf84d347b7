//! Interactive session driving one [`WorkflowController`].

use std::future::Future;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::Result;
use cleansight_engine::{WorkflowController, WorkflowError};
use cleansight_types::{ArtifactKind, DatasetFile};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::view::{render_report, render_status};

const HELP: &str = "\
commands:
  file <path>     select a dataset file (replaces pasted text)
  paste           paste dataset text; finish with a line containing only '.'
  clear           clear pasted text
  submit          analyze the selected dataset (Ctrl-C cancels)
  show            reopen the last report
  close           close the report view
  report          download the PDF report
  preprocessed    download the preprocessed CSV
  status          show the current selection and report state
  help            show this help
  quit            leave the session";

/// A parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    File(String),
    Paste,
    Clear,
    Submit,
    Show,
    Close,
    Download(ArtifactKind),
    Status,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl SessionCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        match verb {
            "" => Self::Empty,
            "file" if !rest.trim().is_empty() => Self::File(rest.trim().to_string()),
            "paste" => Self::Paste,
            "clear" => Self::Clear,
            "submit" | "analyze" => Self::Submit,
            "show" | "open" => Self::Show,
            "close" => Self::Close,
            "report" | "pdf" => Self::Download(ArtifactKind::ReportDocument),
            "preprocessed" | "csv" => Self::Download(ArtifactKind::PreprocessedDataset),
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            _ => Self::Unknown(line.to_string()),
        }
    }
}

pub async fn run(mut controller: WorkflowController, width: usize) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("CleanSight session. Type 'help' for commands.");

    loop {
        prompt()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = SessionCommand::parse(&line);
        debug!(?command, "session command");

        match command {
            SessionCommand::Empty => {}
            SessionCommand::Quit => break,
            SessionCommand::Help => println!("{HELP}"),
            SessionCommand::Unknown(text) => println!("unknown command '{text}'; type 'help'"),
            SessionCommand::Status => print!("{}", render_status(&controller)),
            SessionCommand::File(path) => match DatasetFile::from_path(Path::new(&path)).await {
                Ok(file) => {
                    println!("selected {} ({} bytes)", file.file_name, file.bytes.len());
                    controller.select_file(file);
                }
                Err(error) => eprintln!("error: cannot read {path}: {error}"),
            },
            SessionCommand::Paste => {
                println!("paste the dataset; end with a line containing only '.'");
                let text = read_pasted_block(&mut lines).await?;
                controller.set_pasted_text(text);
                println!("input: {}", controller.input().describe());
            }
            SessionCommand::Clear => {
                controller.set_pasted_text("");
                println!("input: {}", controller.input().describe());
            }
            SessionCommand::Submit => {
                println!("Analyzing dataset...");
                if submit_interruptibly(&mut controller).await.is_ok() {
                    show_visible_report(&controller, width);
                }
            }
            SessionCommand::Show => {
                if controller.reopen_report_view().is_ok() {
                    show_visible_report(&controller, width);
                }
            }
            SessionCommand::Close => controller.close_report_view(),
            SessionCommand::Download(kind) => {
                // The notifier already reported the outcome.
                let _ = download_interruptibly(&controller, kind).await;
            }
        }
    }
    Ok(())
}

/// Submit while Ctrl-C cancels the controller's interrupt token.
pub async fn submit_interruptibly(controller: &mut WorkflowController) -> Result<(), WorkflowError> {
    let token = controller.cancellation_token();
    interruptible(token, controller.submit()).await
}

/// Download while Ctrl-C cancels the controller's interrupt token.
pub async fn download_interruptibly(
    controller: &WorkflowController,
    kind: ArtifactKind,
) -> Result<PathBuf, WorkflowError> {
    interruptible(controller.cancellation_token(), controller.download(kind)).await
}

/// Drive `call` to completion with a Ctrl-C watcher that cancels `token`.
/// The call itself observes the cancellation and settles normally.
async fn interruptible<T>(token: CancellationToken, call: impl Future<Output = T>) -> T {
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("interrupt requested");
            token.cancel();
        }
    });
    let outcome = call.await;
    watcher.abort();
    outcome
}

fn show_visible_report(controller: &WorkflowController, width: usize) {
    if !controller.is_report_visible() {
        return;
    }
    if let Some(stored) = controller.stored_report() {
        println!("{}", render_report(stored, width));
        println!("download with 'report' (PDF) or 'preprocessed' (CSV); 'close' hides the report");
    }
}

async fn read_pasted_block(lines: &mut Lines<BufReader<Stdin>>) -> Result<String> {
    let mut text = String::new();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == "." {
            break;
        }
        text.push_str(&line);
        text.push('\n');
    }
    Ok(text)
}

fn prompt() -> Result<()> {
    print!("cleansight> ");
    std::io::stdout().flush()?;
    Ok(())
}
