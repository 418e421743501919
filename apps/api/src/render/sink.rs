//! Print collaborators. The export path hands a staged HTML document to a `PrintSink`
//! and never learns how (or whether) it becomes paper or PDF.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

/// A document written to the export staging area, valid until the export completes.
#[derive(Debug, Clone)]
pub struct StagedDocument {
    pub path: PathBuf,
    pub title: String,
    /// Filesystem-safe stem for whatever the sink produces.
    pub file_stem: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dispatched {
    pub sink: String,
    /// Where the sink left its output, if it produces a file.
    pub output: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("print target unavailable: {0}")]
    Unavailable(String),

    #[error("print dispatch failed: {0}")]
    Failed(String),
}

#[async_trait]
pub trait PrintSink: Send + Sync {
    fn name(&self) -> &str;

    async fn dispatch(&self, staged: &StagedDocument) -> Result<Dispatched, SinkError>;
}

// ────────────────────────────────────────────────────────────────────────────
// DirectorySink
// ────────────────────────────────────────────────────────────────────────────

/// Copies the print-ready HTML into an output directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    out_dir: PathBuf,
}

impl DirectorySink {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        DirectorySink {
            out_dir: out_dir.into(),
        }
    }
}

#[async_trait]
impl PrintSink for DirectorySink {
    fn name(&self) -> &str {
        "directory"
    }

    async fn dispatch(&self, staged: &StagedDocument) -> Result<Dispatched, SinkError> {
        tokio::fs::create_dir_all(&self.out_dir).await.map_err(|e| {
            SinkError::Unavailable(format!("cannot create {}: {e}", self.out_dir.display()))
        })?;

        let target = self.out_dir.join(format!("{}.html", staged.file_stem));
        tokio::fs::copy(&staged.path, &target)
            .await
            .map_err(|e| SinkError::Failed(format!("copy to {}: {e}", target.display())))?;

        info!(output = %target.display(), "Export written");
        Ok(Dispatched {
            sink: self.name().to_string(),
            output: Some(target),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// CommandSink
// ────────────────────────────────────────────────────────────────────────────

const INPUT_PLACEHOLDER: &str = "{input}";
const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Runs an external HTML→PDF converter, e.g. `wkhtmltopdf {input} {output}`.
#[derive(Debug, Clone)]
pub struct CommandSink {
    program: String,
    args: Vec<String>,
    out_dir: PathBuf,
}

impl CommandSink {
    pub fn new(program: impl Into<String>, args: Vec<String>, out_dir: impl Into<PathBuf>) -> Self {
        CommandSink {
            program: program.into(),
            args,
            out_dir: out_dir.into(),
        }
    }

    /// Splits a whitespace-separated command line. Without any placeholder the input
    /// and output paths are appended, in that order.
    pub fn from_command_line(command_line: &str, out_dir: impl Into<PathBuf>) -> Option<Self> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts.next()?;
        let mut args: Vec<String> = parts.collect();
        if !args
            .iter()
            .any(|a| a.contains(INPUT_PLACEHOLDER) || a.contains(OUTPUT_PLACEHOLDER))
        {
            args.push(INPUT_PLACEHOLDER.to_string());
            args.push(OUTPUT_PLACEHOLDER.to_string());
        }
        Some(CommandSink::new(program, args, out_dir))
    }

    fn expand_args(&self, input: &Path, output: &Path) -> Vec<String> {
        let input = input.to_string_lossy();
        let output = output.to_string_lossy();
        self.args
            .iter()
            .map(|a| {
                a.replace(INPUT_PLACEHOLDER, &input)
                    .replace(OUTPUT_PLACEHOLDER, &output)
            })
            .collect()
    }
}

#[async_trait]
impl PrintSink for CommandSink {
    fn name(&self) -> &str {
        &self.program
    }

    async fn dispatch(&self, staged: &StagedDocument) -> Result<Dispatched, SinkError> {
        tokio::fs::create_dir_all(&self.out_dir).await.map_err(|e| {
            SinkError::Unavailable(format!("cannot create {}: {e}", self.out_dir.display()))
        })?;

        let output_path = self.out_dir.join(format!("{}.pdf", staged.file_stem));
        let args = self.expand_args(&staged.path, &output_path);
        debug!(program = %self.program, ?args, "Running print command");

        let output = Command::new(&self.program)
            .args(&args)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| SinkError::Unavailable(format!("cannot run {}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SinkError::Failed(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        info!(program = %self.program, output = %output_path.display(), "Print command finished");
        Ok(Dispatched {
            sink: self.name().to_string(),
            output: Some(output_path),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn staged_in(dir: &Path) -> StagedDocument {
        let path = dir.join("document.html");
        tokio::fs::write(&path, "<html><body>Ada</body></html>").await.unwrap();
        StagedDocument {
            path,
            title: "Resume - Ada Lovelace".to_string(),
            file_stem: "Resume_Ada_Lovelace".to_string(),
        }
    }

    #[tokio::test]
    async fn test_directory_sink_copies_document() {
        let staging = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let staged = staged_in(staging.path()).await;

        let sink = DirectorySink::new(out.path().join("nested"));
        let dispatched = sink.dispatch(&staged).await.unwrap();

        let target = out.path().join("nested").join("Resume_Ada_Lovelace.html");
        assert_eq!(dispatched.output.as_deref(), Some(target.as_path()));
        let copied = tokio::fs::read_to_string(&target).await.unwrap();
        assert!(copied.contains("Ada"));
    }

    #[tokio::test]
    async fn test_directory_sink_unavailable_when_dir_cannot_be_created() {
        let staging = tempfile::tempdir().unwrap();
        let staged = staged_in(staging.path()).await;
        // A regular file where the output directory should be.
        let blocker = staging.path().join("blocker");
        tokio::fs::write(&blocker, "x").await.unwrap();

        let sink = DirectorySink::new(blocker.join("out"));
        let err = sink.dispatch(&staged).await.unwrap_err();
        assert!(matches!(err, SinkError::Unavailable(_)), "got {err:?}");
    }

    #[test]
    fn test_command_line_appends_placeholders() {
        let sink = CommandSink::from_command_line("wkhtmltopdf --quiet", "/tmp/out").unwrap();
        assert_eq!(sink.program, "wkhtmltopdf");
        assert_eq!(sink.args, vec!["--quiet", "{input}", "{output}"]);
        assert!(CommandSink::from_command_line("   ", "/tmp/out").is_none());
    }

    #[test]
    fn test_placeholders_expanded() {
        let sink = CommandSink::from_command_line("conv --in={input} {output}", "/tmp").unwrap();
        let args = sink.expand_args(Path::new("/s/doc.html"), Path::new("/o/doc.pdf"));
        assert_eq!(args, vec!["--in=/s/doc.html", "/o/doc.pdf"]);
    }

    #[tokio::test]
    async fn test_command_sink_runs_program() {
        let staging = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let staged = staged_in(staging.path()).await;

        let sink = CommandSink::from_command_line("cp {input} {output}", out.path()).unwrap();
        let dispatched = sink.dispatch(&staged).await.unwrap();
        let output = dispatched.output.unwrap();
        assert!(output.ends_with("Resume_Ada_Lovelace.pdf"));
        assert!(tokio::fs::metadata(&output).await.is_ok());
    }

    #[tokio::test]
    async fn test_command_sink_missing_program_is_unavailable() {
        let staging = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let staged = staged_in(staging.path()).await;

        let sink = CommandSink::new("definitely-not-a-real-converter", vec![], out.path());
        let err = sink.dispatch(&staged).await.unwrap_err();
        assert!(matches!(err, SinkError::Unavailable(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_command_sink_nonzero_exit_fails() {
        let staging = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let staged = staged_in(staging.path()).await;

        let sink = CommandSink::new("sh", vec!["-c".to_string(), "exit 3".to_string()], out.path());
        let err = sink.dispatch(&staged).await.unwrap_err();
        assert!(matches!(err, SinkError::Failed(_)), "got {err:?}");
    }
}
