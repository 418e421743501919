use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use crate::config::Config;
use crate::models::resume::ResumeRecord;
use crate::render::export::{export_to_document, ExportSerializer};
use crate::render::preview::{PreviewRenderer, Viewport};
use crate::render::projector::project;
use crate::render::session::{PreviewFrame, PreviewSession};
use crate::render::sink::{CommandSink, DirectorySink, PrintSink};
use crate::server;

const WATCH_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Parser, Debug)]
#[command(
    name = "resume-builder",
    about = "Serve, preview and export résumés from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the section projection of a résumé JSON file
    Project(InputArgs),
    /// Print the live-preview markup of a résumé JSON file
    Preview(PreviewArgs),
    /// Produce a print-ready document from a résumé JSON file
    Export(ExportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Résumé record as JSON
    #[arg(long, short)]
    input: PathBuf,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Container width: desktop or mobile
    #[arg(long, default_value = "desktop", value_parser = parse_viewport)]
    viewport: Viewport,
    /// Keep running and re-render whenever the input file changes
    #[arg(long)]
    watch: bool,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    input: InputArgs,
    /// Directory that receives the exported file
    #[arg(long)]
    out_dir: Option<PathBuf>,
    /// External converter, e.g. "wkhtmltopdf {input} {output}"
    #[arg(long)]
    print_command: Option<String>,
}

fn parse_viewport(value: &str) -> Result<Viewport, String> {
    Viewport::parse(value).ok_or_else(|| format!("unknown viewport '{value}'"))
}

pub(crate) async fn run(config: Config) -> Result<()> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(config, args).await,
        Command::Project(args) => run_project(args).await,
        Command::Preview(args) => run_preview(args).await,
        Command::Export(args) => run_export(config, args).await,
    }
}

async fn read_record(path: &Path) -> Result<ResumeRecord> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("{} is not a résumé record", path.display()))
}

async fn run_project(args: InputArgs) -> Result<()> {
    let record = read_record(&args.input).await?;
    let projection = project(&record)?;
    println!("{}", serde_json::to_string_pretty(&projection)?);
    Ok(())
}

async fn run_preview(args: PreviewArgs) -> Result<()> {
    let record = read_record(&args.input.input).await?;
    let renderer = Arc::new(PreviewRenderer::new()?);

    if !args.watch {
        let markup = renderer.render(&project(&record)?, args.viewport)?;
        println!("{}", standalone(&markup));
        return Ok(());
    }

    let mut session = PreviewSession::new(renderer, record, args.viewport)?;
    print_frame(session.current());
    session.subscribe(print_frame);

    let mut ticker = tokio::time::interval(WATCH_INTERVAL);
    loop {
        ticker.tick().await;
        let record = match read_record(&args.input.input).await {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping unreadable input: {e:#}");
                continue;
            }
        };
        if &record != session.record() {
            session.replace(record)?;
        }
    }
}

fn print_frame(frame: &PreviewFrame) {
    match frame {
        PreviewFrame::Rendered { markup, .. } => println!("{}", standalone(markup)),
        PreviewFrame::Incomplete { revision, problems } => {
            warn!(revision, "Preview incomplete: {problems}");
        }
    }
}

/// Wraps preview markup with its stylesheet so the output opens directly in a browser.
fn standalone(markup: &str) -> String {
    format!("<style>\n{}</style>\n{markup}", PreviewRenderer::stylesheet())
}

async fn run_export(config: Config, args: ExportArgs) -> Result<()> {
    let record = read_record(&args.input.input).await?;
    let out_dir = args.out_dir.unwrap_or_else(|| config.export_output_dir.clone());

    let sink: Box<dyn PrintSink> = match args
        .print_command
        .or_else(|| config.export_print_command.clone())
    {
        Some(command_line) => Box::new(
            CommandSink::from_command_line(&command_line, &out_dir)
                .context("Print command is empty")?,
        ),
        None => Box::new(DirectorySink::new(&out_dir)),
    };
    info!(sink = sink.name(), out_dir = %out_dir.display(), "Exporting résumé");

    let serializer = ExportSerializer::new()?;
    let receipt =
        export_to_document(&record, &serializer, sink.as_ref(), &config.export_options()).await?;
    println!("{}", serde_json::to_string_pretty(&receipt)?);
    Ok(())
}
